//! Core types for the docstore data-access layer
//!
//! This crate provides the foundational abstractions shared by the docstore
//! crates:
//!
//! - **Error handling**: the generic data-access error taxonomy that all
//!   storage operations surface, independent of any concrete driver
//! - **Configuration**: system configuration management
//!

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, StorageConfig};
pub use error::{Error, Result, ResultExt};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result, ResultExt};
}
