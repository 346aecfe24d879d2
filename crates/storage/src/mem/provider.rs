//! Provider, collection, and cursor types of the in-memory backend

use super::catalog::Catalog;
use crate::error::{DefaultExceptionTranslator, ExceptionTranslator};
use crate::{Collection, ConnectionProvider, DatabaseHandle, DocumentCursor, DriverResult};
use async_trait::async_trait;
use bson::Document;
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory connection provider bound to one logical database.
///
/// Cloning is cheap and every clone shares the same store, so a test can
/// hold the client for inspection while a facade owns another handle.
#[derive(Clone)]
pub struct MemClient {
    catalog: Arc<Catalog>,
    database: String,
    translator: DefaultExceptionTranslator,
}

impl MemClient {
    /// Creates a provider over a fresh, empty store
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            catalog: Arc::new(Catalog::default()),
            database: database.into(),
            translator: DefaultExceptionTranslator,
        }
    }

    /// Number of list-indexes cursors currently held open against this
    /// store. Exposed so tests can assert cursors are released on every
    /// exit path.
    pub fn open_cursors(&self) -> usize {
        self.catalog.open_cursors()
    }
}

impl Default for MemClient {
    fn default() -> Self {
        Self::new("docstore")
    }
}

impl ConnectionProvider for MemClient {
    fn database(&self) -> DriverResult<Arc<dyn DatabaseHandle>> {
        Ok(Arc::new(MemDatabase {
            catalog: Arc::clone(&self.catalog),
            name: self.database.clone(),
        }))
    }

    fn exception_translator(&self) -> &dyn ExceptionTranslator {
        &self.translator
    }
}

struct MemDatabase {
    catalog: Arc<Catalog>,
    name: String,
}

impl DatabaseHandle for MemDatabase {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        Arc::new(MemCollection {
            catalog: Arc::clone(&self.catalog),
            database: self.name.clone(),
            name: name.to_string(),
        })
    }
}

struct MemCollection {
    catalog: Arc<Catalog>,
    database: String,
    name: String,
}

#[async_trait]
impl Collection for MemCollection {
    async fn create_index(&self, keys: Document) -> DriverResult<()> {
        self.catalog
            .create_index(&self.database, &self.name, keys, None)
    }

    async fn create_index_with_options(
        &self,
        keys: Document,
        options: Document,
    ) -> DriverResult<()> {
        self.catalog
            .create_index(&self.database, &self.name, keys, Some(options))
    }

    async fn drop_index(&self, name: &str) -> DriverResult<()> {
        self.catalog.drop_index(&self.database, &self.name, name)
    }

    async fn list_indexes(&self) -> DriverResult<Box<dyn DocumentCursor>> {
        let (cursor_id, documents) = self.catalog.open_list_cursor(&self.database, &self.name);
        Ok(Box::new(MemCursor {
            catalog: Arc::clone(&self.catalog),
            cursor_id,
            documents: documents.into(),
        }))
    }
}

struct MemCursor {
    catalog: Arc<Catalog>,
    cursor_id: Uuid,
    documents: VecDeque<Document>,
}

#[async_trait]
impl DocumentCursor for MemCursor {
    async fn advance(&mut self) -> DriverResult<Option<Document>> {
        Ok(self.documents.pop_front())
    }
}

// Releasing in Drop keeps the registry accurate on every exit path,
// including an abandoned half-drained cursor.
impl Drop for MemCursor {
    fn drop(&mut self) {
        self.catalog.release_cursor(self.cursor_id);
    }
}
