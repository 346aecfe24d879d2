//! Index-management operations against one named collection

use crate::index::{Index, IndexInfo};
use crate::{Collection, ConnectionProvider, DriverResult};
use docstore_core::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::debug;

/// Index-management facade bound to one named collection.
///
/// Every operation resolves a fresh collection handle from the connection
/// provider, performs a single remote round trip, and maps any driver
/// failure through the provider's exception translator. The facade holds no
/// mutable state, caches nothing, and is safe to share across concurrent
/// callers; ordering between racing operations is whatever the server
/// provides.
pub struct IndexOperations {
    provider: Arc<dyn ConnectionProvider>,
    collection_name: String,
}

impl std::fmt::Debug for IndexOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexOperations")
            .field("collection_name", &self.collection_name)
            .finish_non_exhaustive()
    }
}

impl IndexOperations {
    /// Creates a new `IndexOperations` bound to `collection_name`.
    ///
    /// Fails with [`Error::InvalidInput`] if the collection name is empty or
    /// blank. No remote interaction happens here.
    pub fn new(
        provider: Arc<dyn ConnectionProvider>,
        collection_name: impl Into<String>,
    ) -> Result<Self> {
        let collection_name = collection_name.into();
        if collection_name.trim().is_empty() {
            return Err(Error::invalid_input("Collection name must not be empty"));
        }

        Ok(Self {
            provider,
            collection_name,
        })
    }

    /// The collection this facade operates on
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Runs a unit of work against a live handle to the bound collection.
    ///
    /// The handle is resolved fresh from the provider and lives exactly as
    /// long as the call. A driver failure raised while resolving the handle
    /// or inside the unit of work is rethrown through the provider's
    /// exception translator; failures the policy declines are re-raised
    /// unchanged inside [`Error::Other`], where they remain downcastable to
    /// [`crate::DriverError`].
    ///
    /// This is also the escape hatch for callers needing direct collection
    /// access beyond the index operations.
    pub async fn execute<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn Collection>) -> BoxFuture<'static, DriverResult<T>> + Send,
    {
        let outcome = match self.provider.database() {
            Ok(database) => {
                let collection = database.collection(&self.collection_name);
                work(collection).await
            }
            Err(e) => Err(e),
        };

        outcome.map_err(|driver_error| {
            match self.provider.exception_translator().translate(&driver_error) {
                Some(translated) => translated,
                None => Error::Other(anyhow::Error::new(driver_error)),
            }
        })
    }

    /// Creates the index described by `definition`.
    ///
    /// A definition carrying an options container -- even an empty one --
    /// is converted once into the provider's native option representation
    /// and sent through the options create path; a bare definition goes
    /// through the keys-only path. Success is the absence of an error.
    pub async fn create_index(&self, definition: &Index) -> Result<()> {
        debug!(
            "Creating index on collection '{}': {:?}",
            self.collection_name,
            definition.keys()
        );

        let keys = definition.keys().clone();
        let options = definition.options().map(|options| options.to_document());

        self.execute(move |collection| {
            async move {
                match options {
                    Some(options) => {
                        collection
                            .create_index_with_options(keys, options)
                            .await
                    }
                    None => collection.create_index(keys).await,
                }
            }
            .boxed()
        })
        .await
    }

    /// Drops the index with the given name.
    ///
    /// The name is passed through without validation; `"*"` is the server's
    /// own convention for "all indexes except the primary-key index".
    pub async fn drop_index(&self, name: &str) -> Result<()> {
        debug!(
            "Dropping index '{}' on collection '{}'",
            name, self.collection_name
        );

        let name = name.to_string();
        self.execute(move |collection| {
            async move { collection.drop_index(&name).await }.boxed()
        })
        .await
    }

    /// Drops every index except the primary-key index
    pub async fn drop_all_indexes(&self) -> Result<()> {
        self.drop_index("*").await
    }

    /// Lists the collection's indexes in server enumeration order.
    ///
    /// The listing cursor is drained eagerly, converting one raw document
    /// into one [`IndexInfo`]. A collection with no indexes yields an empty
    /// vec, never an error.
    pub async fn index_info(&self) -> Result<Vec<IndexInfo>> {
        debug!("Listing indexes on collection '{}'", self.collection_name);

        self.execute(|collection| {
            async move {
                // The cursor is dropped on every exit path, including a
                // decode failure mid-drain, releasing its server-side
                // resource.
                let mut cursor = collection.list_indexes().await?;

                let mut infos = Vec::new();
                while let Some(document) = cursor.advance().await? {
                    infos.push(IndexInfo::from_document(&document)?);
                }
                Ok(infos)
            }
            .boxed()
        })
        .await
    }

    /// Formerly flushed a client-side index cache. Index caches are no
    /// longer maintained; the call resolves the collection but performs no
    /// remote action.
    #[deprecated(note = "index caches are no longer maintained; this call has no effect")]
    pub async fn reset_index_cache(&self) -> Result<()> {
        self.execute(|_collection| async move { Ok::<(), crate::DriverError>(()) }.boxed())
            .await
    }
}
