#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Data-access layer for document databases
//!
//! This crate provides index-management operations against a remote document
//! collection behind pluggable provider seams:
//!
//! - [`ConnectionProvider`] / [`DatabaseHandle`] / [`Collection`] abstract the
//!   underlying driver; a handle is resolved fresh for every operation
//! - [`IndexOperations`] is the per-collection facade: create, drop-one,
//!   drop-all, and list, each a single remote round trip
//! - [`ExceptionTranslator`] maps raw [`DriverError`]s into the generic
//!   taxonomy in `docstore_core::error`; callers never see driver failures
//!   except through the explicit pass-through channel
//!
//! Raw wire documents are [`bson::Document`]s, which preserve field order.

pub mod error;
mod factory;
pub mod index;
mod mem;
mod mock;
mod ops;

pub use error::{DefaultExceptionTranslator, DriverError, ExceptionTranslator};
pub use factory::create_connection_provider;
pub use index::{Direction, Index, IndexInfo, IndexOptions};
pub use mem::MemClient;
pub use mock::{CollectionCall, MockCollection, MockConnectionProvider};
pub use ops::IndexOperations;

pub use bson::Document;

use async_trait::async_trait;
use std::sync::Arc;

/// Result type for raw driver calls, before exception translation
pub type DriverResult<T> = std::result::Result<T, DriverError>;

// ==== Provider seams ====

/// Source of database handles and of the exception-translation policy.
///
/// Implementations are bound to one logical database and are cheap to ask
/// repeatedly; nothing at this layer caches the handles they return.
pub trait ConnectionProvider: Send + Sync {
    /// Resolve the database this provider is bound to
    fn database(&self) -> DriverResult<Arc<dyn DatabaseHandle>>;

    /// The policy used to translate driver failures surfaced by this
    /// provider's collections
    fn exception_translator(&self) -> &dyn ExceptionTranslator;
}

/// An open database, from which collection handles are resolved by name.
pub trait DatabaseHandle: Send + Sync {
    /// Open a handle to a named collection. No remote call is made; the
    /// collection need not exist yet.
    fn collection(&self, name: &str) -> Arc<dyn Collection>;
}

/// A remote collection exposing the native index commands.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Create an index from a key specification only
    async fn create_index(&self, keys: Document) -> DriverResult<()>;

    /// Create an index from a key specification plus native options
    async fn create_index_with_options(
        &self,
        keys: Document,
        options: Document,
    ) -> DriverResult<()>;

    /// Drop the index with the given name. The name `"*"` is the server's
    /// convention for "all indexes except the primary-key index" and is
    /// passed through untouched.
    async fn drop_index(&self, name: &str) -> DriverResult<()>;

    /// Enumerate the collection's indexes as raw documents
    async fn list_indexes(&self) -> DriverResult<Box<dyn DocumentCursor>>;
}

/// Forward-only cursor over raw server documents.
///
/// Concrete cursors own a server-side resource; dropping the cursor releases
/// it regardless of how far the cursor was driven.
#[async_trait]
pub trait DocumentCursor: Send {
    /// Advance the cursor, returning the next document or `None` once
    /// exhausted
    async fn advance(&mut self) -> DriverResult<Option<Document>>;
}
