//! Recording mock provider for tests
//!
//! Records every collection call in order, can be armed to fail all calls
//! with a canned driver error, and serves canned list-indexes documents.
//! Used where tests need to observe exactly which native calls the facade
//! issued, independent of any backend semantics.

use crate::error::{DefaultExceptionTranslator, DriverError, ExceptionTranslator};
use crate::{Collection, ConnectionProvider, DatabaseHandle, DocumentCursor, DriverResult};
use async_trait::async_trait;
use bson::Document;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One recorded call against [`MockCollection`]
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionCall {
    CreateIndex { keys: Document },
    CreateIndexWithOptions { keys: Document, options: Document },
    DropIndex { name: String },
    ListIndexes,
}

/// Connection provider serving a single shared [`MockCollection`]
#[derive(Default)]
pub struct MockConnectionProvider {
    collection: Arc<MockCollection>,
    collection_requests: Arc<Mutex<Vec<String>>>,
    translator: DefaultExceptionTranslator,
}

impl MockConnectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every subsequent collection call with `error`
    pub fn fail_with(&self, error: DriverError) {
        self.collection.fail_with(error);
    }

    /// Documents served by subsequent list-indexes calls
    pub fn set_index_documents(&self, documents: Vec<Document>) {
        self.collection.set_index_documents(documents);
    }

    /// Collection calls recorded so far, in order
    pub fn calls(&self) -> Vec<CollectionCall> {
        self.collection.calls()
    }

    /// Collection names requested from the database handle, one per
    /// operation that resolved a handle
    pub fn collection_requests(&self) -> Vec<String> {
        lock(&self.collection_requests).clone()
    }

    /// Number of mock cursors currently alive
    pub fn open_cursors(&self) -> usize {
        self.collection.open_cursors.load(Ordering::SeqCst)
    }
}

impl ConnectionProvider for MockConnectionProvider {
    fn database(&self) -> DriverResult<Arc<dyn DatabaseHandle>> {
        Ok(Arc::new(MockDatabase {
            collection: Arc::clone(&self.collection),
            collection_requests: Arc::clone(&self.collection_requests),
        }))
    }

    fn exception_translator(&self) -> &dyn ExceptionTranslator {
        &self.translator
    }
}

struct MockDatabase {
    collection: Arc<MockCollection>,
    collection_requests: Arc<Mutex<Vec<String>>>,
}

impl DatabaseHandle for MockDatabase {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        lock(&self.collection_requests).push(name.to_string());
        Arc::clone(&self.collection) as Arc<dyn Collection>
    }
}

/// Collection double that records calls instead of talking to a server
#[derive(Default)]
pub struct MockCollection {
    calls: Mutex<Vec<CollectionCall>>,
    fail_with: Mutex<Option<DriverError>>,
    index_documents: Mutex<Vec<Document>>,
    // Behind an Arc so a live cursor can outlive its borrow of the
    // collection
    open_cursors: Arc<AtomicUsize>,
}

impl MockCollection {
    fn fail_with(&self, error: DriverError) {
        *lock(&self.fail_with) = Some(error);
    }

    fn set_index_documents(&self, documents: Vec<Document>) {
        *lock(&self.index_documents) = documents;
    }

    fn calls(&self) -> Vec<CollectionCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: CollectionCall) -> DriverResult<()> {
        lock(&self.calls).push(call);
        match &*lock(&self.fail_with) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Collection for MockCollection {
    async fn create_index(&self, keys: Document) -> DriverResult<()> {
        self.record(CollectionCall::CreateIndex { keys })
    }

    async fn create_index_with_options(
        &self,
        keys: Document,
        options: Document,
    ) -> DriverResult<()> {
        self.record(CollectionCall::CreateIndexWithOptions { keys, options })
    }

    async fn drop_index(&self, name: &str) -> DriverResult<()> {
        self.record(CollectionCall::DropIndex {
            name: name.to_string(),
        })
    }

    async fn list_indexes(&self) -> DriverResult<Box<dyn DocumentCursor>> {
        self.record(CollectionCall::ListIndexes)?;
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockCursor {
            documents: lock(&self.index_documents).clone().into(),
            open_cursors: Arc::clone(&self.open_cursors),
        }))
    }
}

struct MockCursor {
    documents: VecDeque<Document>,
    open_cursors: Arc<AtomicUsize>,
}

#[async_trait]
impl DocumentCursor for MockCursor {
    async fn advance(&mut self) -> DriverResult<Option<Document>> {
        Ok(self.documents.pop_front())
    }
}

impl Drop for MockCursor {
    fn drop(&mut self) {
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
