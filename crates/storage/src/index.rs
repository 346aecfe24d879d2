//! Index definitions and server-reported index metadata
//!
//! [`Index`] is what callers build and hand to
//! [`crate::IndexOperations::create_index`]; [`IndexInfo`] is the read-only
//! projection of one raw index document coming back from a listing. Both
//! sides of the wire use [`bson::Document`] so key order survives.

use crate::error::DriverError;
use crate::DriverResult;
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sort order of one key in an index, encoded as `1` / `-1` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn as_bson(self) -> Bson {
        match self {
            Direction::Ascending => Bson::Int32(1),
            Direction::Descending => Bson::Int32(-1),
        }
    }
}

/// A caller-built index definition: an ordered key specification plus an
/// optional set of index options.
///
/// The options container is deliberately tri-state: absent selects the
/// keys-only create path, while a present container -- even an empty one --
/// selects the options path. Presence is judged by the container, never by
/// whether it holds entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    keys: Document,
    options: Option<IndexOptions>,
}

impl Index {
    /// Starts a definition with a single key
    pub fn on(field: impl Into<String>, direction: Direction) -> Self {
        let mut keys = Document::new();
        keys.insert(field.into(), direction.as_bson());
        Self {
            keys,
            options: None,
        }
    }

    /// Appends another key; definition order is preserved on the wire
    pub fn and(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.keys.insert(field.into(), direction.as_bson());
        self
    }

    /// Sets an explicit index name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.options_mut().name = Some(name.into());
        self
    }

    /// Rejects documents whose key value duplicates an already-indexed value
    pub fn unique(mut self) -> Self {
        self.options_mut().unique = Some(true);
        self
    }

    /// Skips documents that lack the indexed fields
    pub fn sparse(mut self) -> Self {
        self.options_mut().sparse = Some(true);
        self
    }

    /// Expires indexed documents after `ttl`
    pub fn expire_after(mut self, ttl: Duration) -> Self {
        self.options_mut().expire_after = Some(ttl);
        self
    }

    /// Restricts the index to documents matching `filter`
    pub fn partial_filter(mut self, filter: Document) -> Self {
        self.options_mut().partial_filter = Some(filter);
        self
    }

    /// Replaces the options container wholesale. Passing
    /// `IndexOptions::default()` leaves a present-but-empty container in
    /// place, which still selects the options create path.
    pub fn with_options(mut self, options: IndexOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// The ordered key specification
    pub fn keys(&self) -> &Document {
        &self.keys
    }

    /// The options container, if one was materialized
    pub fn options(&self) -> Option<&IndexOptions> {
        self.options.as_ref()
    }

    fn options_mut(&mut self) -> &mut IndexOptions {
        self.options.get_or_insert_with(IndexOptions::default)
    }
}

/// Optional index attributes, converted to the provider's native
/// representation by [`IndexOptions::to_document`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexOptions {
    /// Explicit index name; the server derives one from the keys if unset
    pub name: Option<String>,
    /// Enforce uniqueness of indexed values
    pub unique: Option<bool>,
    /// Skip documents that lack the indexed fields
    pub sparse: Option<bool>,
    /// Expire indexed documents after this duration
    pub expire_after: Option<Duration>,
    /// Limit the index to documents matching this filter
    pub partial_filter: Option<Document>,
}

impl IndexOptions {
    /// Converts to the provider's native option document
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(name) = &self.name {
            doc.insert("name", name.clone());
        }
        if let Some(unique) = self.unique {
            doc.insert("unique", unique);
        }
        if let Some(sparse) = self.sparse {
            doc.insert("sparse", sparse);
        }
        if let Some(ttl) = self.expire_after {
            doc.insert("expireAfterSeconds", ttl.as_secs() as i64);
        }
        if let Some(filter) = &self.partial_filter {
            doc.insert("partialFilterExpression", filter.clone());
        }
        doc
    }
}

/// Read-only projection of one server-reported index document.
///
/// Constructed fresh per listing call; carries no identity beyond its
/// field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Index name, unique within its collection
    pub name: String,
    /// Ordered key pattern the index covers
    pub key: Document,
    /// Whether the index enforces uniqueness
    #[serde(default)]
    pub unique: bool,
    /// Whether documents lacking the indexed fields are skipped
    #[serde(default)]
    pub sparse: bool,
    /// TTL in seconds, for indexes that expire documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<i64>,
    /// Filter limiting the index to a subset of documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_filter_expression: Option<Document>,
}

impl IndexInfo {
    /// Converts one raw index document into an `IndexInfo`.
    ///
    /// Server index documents always carry `name` and `key`; a document
    /// missing either is malformed and yields a decode error.
    pub fn from_document(document: &Document) -> DriverResult<Self> {
        let name = document
            .get_str("name")
            .map_err(|_| DriverError::decode("index document is missing a string 'name' field"))?
            .to_string();
        let key = document
            .get_document("key")
            .map_err(|_| DriverError::decode("index document is missing a 'key' document"))?
            .clone();

        let unique = document.get_bool("unique").unwrap_or(false);
        let sparse = document.get_bool("sparse").unwrap_or(false);
        let expire_after_seconds = read_expire_after_seconds(document);
        let partial_filter_expression = document
            .get_document("partialFilterExpression")
            .ok()
            .cloned();

        Ok(Self {
            name,
            key,
            unique,
            sparse,
            expire_after_seconds,
            partial_filter_expression,
        })
    }
}

// Servers report the TTL as whichever numeric type the index was created
// with.
fn read_expire_after_seconds(document: &Document) -> Option<i64> {
    match document.get("expireAfterSeconds") {
        Some(Bson::Int32(v)) => Some(i64::from(*v)),
        Some(Bson::Int64(v)) => Some(*v),
        Some(Bson::Double(v)) => Some(*v as i64),
        _ => None,
    }
}
