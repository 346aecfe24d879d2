//! In-memory connection provider
//!
//! Stands in for a live document-database server: each collection carries an
//! index catalog with the server's observable create/drop/list semantics,
//! and every open list-indexes cursor is registered in the store so its
//! release can be observed from tests.

mod catalog;
mod provider;

pub use provider::MemClient;
