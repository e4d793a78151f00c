//! Document-store abstraction for the remote backend.
//!
//! The remote event repository and profile store talk to a document
//! database only through these traits. `sodapop-firestore` implements them
//! over the Firestore REST API; `memory::MemoryDocumentStore` is the
//! in-process reference implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::error::SodapopResult;

pub type Fields = BTreeMap<String, FieldValue>;

/// A typed document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(Fields),
    /// Write-only: replaced by the store's clock when the write lands
    ServerTimestamp,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            FieldValue::Map(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(d: f64) -> Self {
        FieldValue::Double(d)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(ts)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Document {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Non-empty string field.
    pub fn str(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(FieldValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// String elements of an array field (non-strings are skipped).
    pub fn strings(&self, field: &str) -> Vec<String> {
        self.get(field)
            .and_then(FieldValue::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(FieldValue::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Live snapshots of one document, delivered after every change.
///
/// The producing side stops once this receiver is dropped.
pub struct DocumentSnapshots(mpsc::UnboundedReceiver<Document>);

impl DocumentSnapshots {
    pub fn channel() -> (mpsc::UnboundedSender<Document>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, DocumentSnapshots(rx))
    }

    pub async fn next(&mut self) -> Option<Document> {
        self.0.recv().await
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection.
    async fn list(&self, collection: &str) -> SodapopResult<Vec<Document>>;

    async fn get(&self, collection: &str, id: &str) -> SodapopResult<Option<Document>>;

    /// Insert a document under a store-assigned ID and return that ID.
    async fn add(&self, collection: &str, fields: Fields) -> SodapopResult<String>;

    /// Create or overwrite a document.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> SodapopResult<()>;

    /// Atomically append `value` to an array field unless already present.
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> SodapopResult<()>;

    /// Atomically remove every occurrence of `value` from an array field.
    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> SodapopResult<()>;

    /// Subscribe to a document. The current state (if any) arrives first.
    async fn watch(&self, collection: &str, id: &str) -> SodapopResult<DocumentSnapshots>;
}

/// Anonymous session identity for the remote backend.
#[async_trait]
pub trait AnonymousAuth: Send + Sync {
    async fn current_uid(&self) -> Option<String>;

    async fn sign_in_anonymously(&self) -> SodapopResult<String>;
}
