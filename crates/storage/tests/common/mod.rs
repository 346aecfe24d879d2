//! Test utilities for storage integration tests

use docstore_storage::{IndexOperations, MemClient};
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Initialize test logging once; respects `RUST_LOG`
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A facade bound to `collection` over a fresh in-memory store.
///
/// The returned client shares the store with the facade, so tests can
/// observe state (e.g. open cursor counts) while driving the facade.
#[allow(dead_code)]
pub fn mem_index_ops(collection: &str) -> (MemClient, IndexOperations) {
    let client = MemClient::new("testdb");
    let ops = IndexOperations::new(Arc::new(client.clone()), collection)
        .expect("collection name is valid");
    (client, ops)
}
