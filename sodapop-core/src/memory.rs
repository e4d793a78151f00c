//! In-process reference implementation of the document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::document::{AnonymousAuth, Document, DocumentSnapshots, DocumentStore, FieldValue, Fields};
use crate::error::{SodapopError, SodapopResult};

struct Watcher {
    collection: String,
    id: String,
    tx: mpsc::UnboundedSender<Document>,
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, IndexMap<String, Fields>>,
    watchers: Vec<Watcher>,
    session: Option<String>,
    sign_ins: u64,
    offline: bool,
}

impl MemoryState {
    fn check_online(&self) -> SodapopResult<()> {
        if self.offline {
            return Err(SodapopError::Remote("document store is unreachable".into()));
        }
        Ok(())
    }

    fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone()))
    }

    fn notify(&mut self, collection: &str, id: &str) {
        self.watchers.retain(|w| !w.tx.is_closed());

        let Some(doc) = self.document(collection, id) else {
            return;
        };
        for watcher in &self.watchers {
            if watcher.collection == collection && watcher.id == id {
                let _ = watcher.tx.send(doc.clone());
            }
        }
    }

    fn array_field(&mut self, collection: &str, id: &str, field: &str) -> SodapopResult<&mut Vec<FieldValue>> {
        let fields = self
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| SodapopError::Remote(format!("No document to update: {collection}/{id}")))?;

        let entry = fields
            .entry(field.to_string())
            .or_insert_with(|| FieldValue::Array(Vec::new()));
        if !matches!(entry, FieldValue::Array(_)) {
            *entry = FieldValue::Array(Vec::new());
        }
        match entry {
            FieldValue::Array(values) => Ok(values),
            _ => Err(SodapopError::Remote(format!("{field} is not an array"))),
        }
    }
}

/// Shared in-memory collections with live snapshot fan-out.
///
/// Clones share the same data. Also acts as its own anonymous-auth
/// provider, handing out `anon-N` identities.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already signed-in session.
    pub async fn with_session(self, uid: &str) -> Self {
        self.state.lock().await.session = Some(uid.to_string());
        self
    }

    /// Make every subsequent call fail as if the network were down.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    pub async fn count(&self, collection: &str) -> usize {
        let state = self.state.lock().await;
        state.collections.get(collection).map_or(0, IndexMap::len)
    }
}

fn resolve_server_timestamps(fields: Fields) -> Fields {
    fields
        .into_iter()
        .map(|(key, value)| (key, resolve_value(value)))
        .collect()
}

fn resolve_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::ServerTimestamp => FieldValue::Timestamp(Utc::now()),
        FieldValue::Map(fields) => FieldValue::Map(resolve_server_timestamps(fields)),
        FieldValue::Array(values) => FieldValue::Array(values.into_iter().map(resolve_value).collect()),
        other => other,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> SodapopResult<Vec<Document>> {
        let state = self.state.lock().await;
        state.check_online()?;

        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> SodapopResult<Option<Document>> {
        let state = self.state.lock().await;
        state.check_online()?;
        Ok(state.document(collection, id))
    }

    async fn add(&self, collection: &str, fields: Fields) -> SodapopResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.set(collection, &id, fields).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> SodapopResult<()> {
        let mut state = self.state.lock().await;
        state.check_online()?;

        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), resolve_server_timestamps(fields));
        state.notify(collection, id);
        Ok(())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> SodapopResult<()> {
        let mut state = self.state.lock().await;
        state.check_online()?;

        let values = state.array_field(collection, id, field)?;
        if values.contains(&value) {
            return Ok(());
        }
        values.push(value);
        state.notify(collection, id);
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> SodapopResult<()> {
        let mut state = self.state.lock().await;
        state.check_online()?;

        let values = state.array_field(collection, id, field)?;
        let before = values.len();
        values.retain(|v| v != &value);
        if values.len() != before {
            state.notify(collection, id);
        }
        Ok(())
    }

    async fn watch(&self, collection: &str, id: &str) -> SodapopResult<DocumentSnapshots> {
        let mut state = self.state.lock().await;
        state.check_online()?;

        let (tx, snapshots) = DocumentSnapshots::channel();
        if let Some(doc) = state.document(collection, id) {
            let _ = tx.send(doc);
        }
        state.watchers.push(Watcher {
            collection: collection.to_string(),
            id: id.to_string(),
            tx,
        });
        Ok(snapshots)
    }
}

#[async_trait]
impl AnonymousAuth for MemoryDocumentStore {
    async fn current_uid(&self) -> Option<String> {
        self.state.lock().await.session.clone()
    }

    async fn sign_in_anonymously(&self) -> SodapopResult<String> {
        let mut state = self.state.lock().await;
        state.check_online()?;

        state.sign_ins += 1;
        let uid = format!("anon-{}", state.sign_ins);
        state.session = Some(uid.clone());
        Ok(uid)
    }
}
