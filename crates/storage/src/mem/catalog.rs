//! Server-side state of the in-memory backend

use crate::error::DriverError;
use crate::DriverResult;
use bson::{doc, Bson, Document};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Name of the primary-key index every collection is born with
pub(super) const PRIMARY_INDEX_NAME: &str = "_id_";

// (database, collection)
type CollectionKey = (String, String);

/// Index catalogs per collection, plus the open list-cursor registry.
///
/// One mutex guards the whole catalog; every operation is a single short
/// critical section, mirroring the one-round-trip-per-call model of the
/// providers this stands in for.
#[derive(Default)]
pub(super) struct Catalog {
    inner: Mutex<CatalogInner>,
}

#[derive(Default)]
struct CatalogInner {
    // Index documents in creation order, primary index first
    collections: HashMap<CollectionKey, Vec<Document>>,
    open_cursors: HashSet<Uuid>,
}

impl Catalog {
    pub(super) fn create_index(
        &self,
        database: &str,
        collection: &str,
        keys: Document,
        options: Option<Document>,
    ) -> DriverResult<()> {
        if keys.is_empty() {
            return Err(DriverError::command(
                72,
                "InvalidOptions",
                "index keys cannot be empty",
            ));
        }

        let candidate = build_index_document(&keys, options.as_ref());
        let name = match candidate.get_str("name") {
            Ok(name) => name.to_string(),
            Err(_) => {
                return Err(DriverError::command(
                    72,
                    "InvalidOptions",
                    "index name must be a string",
                ))
            }
        };

        let mut inner = self.lock();
        let indexes = inner
            .collections
            .entry((database.to_string(), collection.to_string()))
            .or_insert_with(new_collection_indexes);

        if let Some(existing) = indexes.iter().find(|ix| index_name(ix) == name) {
            if existing.get_document("key").ok() != Some(&keys) {
                return Err(DriverError::command(
                    86,
                    "IndexKeySpecsConflict",
                    format!("an existing index has the same name '{name}' but a different key spec"),
                ));
            }
            if *existing != candidate {
                return Err(DriverError::command(
                    85,
                    "IndexOptionsConflict",
                    format!("index '{name}' already exists with different options"),
                ));
            }
            // Identical re-creation is a no-op
            return Ok(());
        }

        if indexes
            .iter()
            .any(|ix| ix.get_document("key").ok() == Some(&keys))
        {
            return Err(DriverError::command(
                85,
                "IndexOptionsConflict",
                "an index with the same key spec already exists under a different name",
            ));
        }

        indexes.push(candidate);
        Ok(())
    }

    pub(super) fn drop_index(
        &self,
        database: &str,
        collection: &str,
        name: &str,
    ) -> DriverResult<()> {
        let mut inner = self.lock();
        let key = (database.to_string(), collection.to_string());
        let Some(indexes) = inner.collections.get_mut(&key) else {
            return Err(DriverError::command(
                26,
                "NamespaceNotFound",
                format!("ns not found: {database}.{collection}"),
            ));
        };

        if name == "*" {
            indexes.retain(|ix| index_name(ix) == PRIMARY_INDEX_NAME);
            return Ok(());
        }

        if name == PRIMARY_INDEX_NAME {
            return Err(DriverError::command(
                72,
                "InvalidOptions",
                "cannot drop _id index",
            ));
        }

        let before = indexes.len();
        indexes.retain(|ix| index_name(ix) != name);
        if indexes.len() == before {
            return Err(DriverError::command(
                27,
                "IndexNotFound",
                format!("index not found with name [{name}]"),
            ));
        }

        Ok(())
    }

    /// Snapshot the collection's index documents and register an open
    /// cursor over them. An absent collection yields an empty snapshot.
    pub(super) fn open_list_cursor(
        &self,
        database: &str,
        collection: &str,
    ) -> (Uuid, Vec<Document>) {
        let mut inner = self.lock();

        let documents = inner
            .collections
            .get(&(database.to_string(), collection.to_string()))
            .cloned()
            .unwrap_or_default();

        let cursor_id = Uuid::new_v4();
        inner.open_cursors.insert(cursor_id);
        (cursor_id, documents)
    }

    pub(super) fn release_cursor(&self, cursor_id: Uuid) {
        self.lock().open_cursors.remove(&cursor_id);
    }

    pub(super) fn open_cursors(&self) -> usize {
        self.lock().open_cursors.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_collection_indexes() -> Vec<Document> {
    vec![doc! { "v": 2, "key": { "_id": 1 }, "name": PRIMARY_INDEX_NAME }]
}

fn index_name(index: &Document) -> &str {
    index.get_str("name").unwrap_or_default()
}

/// Assemble the stored index document: version, keys, name, then any
/// remaining caller options verbatim.
fn build_index_document(keys: &Document, options: Option<&Document>) -> Document {
    let name = options
        .and_then(|opts| opts.get("name").cloned())
        .unwrap_or_else(|| Bson::String(default_index_name(keys)));

    let mut document = doc! { "v": 2, "key": keys.clone(), "name": name };
    if let Some(options) = options {
        for (field, value) in options {
            if field != "name" {
                document.insert(field.clone(), value.clone());
            }
        }
    }
    document
}

/// Derive the server-convention default name, `field_1_other_-1`.
pub(super) fn default_index_name(keys: &Document) -> String {
    let mut parts = Vec::with_capacity(keys.len());
    for (field, value) in keys {
        let suffix = match value {
            Bson::Int32(v) => v.to_string(),
            Bson::Int64(v) => v.to_string(),
            Bson::Double(v) => v.to_string(),
            Bson::String(s) => s.clone(),
            other => other.to_string(),
        };
        parts.push(format!("{field}_{suffix}"));
    }
    parts.join("_")
}
