use crate::mem::MemClient;
use crate::mock::MockConnectionProvider;
use crate::ConnectionProvider;
use docstore_core::{config::StorageConfig, Error};
use std::sync::Arc;

/// Creates a connection provider based on configuration.
///
/// Returns a trait object so callers stay independent of the concrete
/// backend; the provider can be shared across any number of
/// [`crate::IndexOperations`] facades.
///
/// # Errors
/// Returns a configuration error for an unknown provider type
pub fn create_connection_provider(
    config: &StorageConfig,
) -> Result<Arc<dyn ConnectionProvider>, Error> {
    match config.provider.as_str() {
        "memory" => Ok(Arc::new(MemClient::new(config.database.as_str()))),
        "mock" => Ok(Arc::new(MockConnectionProvider::new())),
        other => Err(Error::config(format!(
            "Unknown storage provider '{other}'. Must be one of: [\"memory\", \"mock\"]"
        ))),
    }
}
