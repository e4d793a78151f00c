//! Firestore REST client implementing the core document-store traits.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::{Value, json};
use sodapop_core::config::FirebaseConfig;
use sodapop_core::document::{AnonymousAuth, Document, DocumentSnapshots, DocumentStore, FieldValue, Fields};
use sodapop_core::{SodapopError, SodapopResult};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::{self, Session, read_json};
use crate::value::{RawDocument, decode_document, encode_fields, encode_value};

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: FirebaseConfig,
    session: Mutex<Option<Session>>,
    session_file: Option<PathBuf>,
    poll_interval: Duration,
}

impl FirestoreClient {
    pub fn new(config: FirebaseConfig) -> Self {
        Self::build(config, None, DEFAULT_POLL_INTERVAL)
    }

    /// Keep the anonymous session in `path`, so the same profile is used
    /// across runs.
    pub fn with_session_file(self, path: impl Into<PathBuf>) -> Self {
        let inner = &self.inner;
        Self::build(inner.config.clone(), Some(path.into()), inner.poll_interval)
    }

    /// How often `watch` checks a document for changes.
    pub fn with_poll_interval(self, interval: Duration) -> Self {
        let inner = &self.inner;
        Self::build(inner.config.clone(), inner.session_file.clone(), interval)
    }

    fn build(config: FirebaseConfig, session_file: Option<PathBuf>, poll_interval: Duration) -> Self {
        let session = session_file.as_deref().and_then(Session::load);

        FirestoreClient {
            inner: Arc::new(Inner {
                http: reqwest::Client::new(),
                config,
                session: Mutex::new(session),
                session_file,
                poll_interval,
            }),
        }
    }

    /// `projects/{project}/databases/(default)`
    fn database(&self) -> String {
        format!("projects/{}/databases/(default)", self.inner.config.project_id)
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/documents/{collection}/{id}", self.database())
    }

    fn documents_url(&self) -> String {
        format!("{FIRESTORE_URL}/{}/documents", self.database())
    }

    /// Current ID token, refreshed first if it is about to expire.
    async fn id_token(&self) -> SodapopResult<Option<String>> {
        let mut session = self.inner.session.lock().await;
        let Some(current) = session.as_ref() else {
            return Ok(None);
        };

        if current.is_expired() {
            debug!("Refreshing Firebase ID token");
            let refreshed = auth::refresh(&self.inner.http, &self.inner.config.api_key, current).await?;
            self.persist(&refreshed);
            *session = Some(refreshed);
        }

        Ok(session.as_ref().map(|s| s.id_token.clone()))
    }

    fn persist(&self, session: &Session) {
        let Some(path) = &self.inner.session_file else {
            return;
        };
        if let Err(e) = session.save(path) {
            warn!("Failed to save Firebase session to {}: {e}", path.display());
        }
    }

    async fn request(&self, method: reqwest::Method, url: &str) -> SodapopResult<reqwest::RequestBuilder> {
        let mut request = self
            .inner
            .http
            .request(method, url)
            .query(&[("key", self.inner.config.api_key.as_str())]);
        if let Some(token) = self.id_token().await? {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn fetch(&self, collection: &str, id: &str) -> SodapopResult<Option<RawDocument>> {
        let url = format!("{}/{collection}/{id}", self.documents_url());
        let response = self
            .request(reqwest::Method::GET, &url)
            .await?
            .send()
            .await
            .map_err(|e| SodapopError::Remote(format!("Failed to fetch {collection}/{id}: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resource: Value = read_json(response, &format!("Failed to fetch {collection}/{id}")).await?;
        Ok(decode_document(&resource))
    }

    /// Apply writes atomically through the `:commit` endpoint.
    async fn commit(&self, writes: Vec<Value>, context: &str) -> SodapopResult<()> {
        let url = format!("{}:commit", self.documents_url());
        let response = self
            .request(reqwest::Method::POST, &url)
            .await?
            .json(&json!({ "writes": writes }))
            .send()
            .await
            .map_err(|e| SodapopError::Remote(format!("{context}: {e}")))?;

        let _: Value = read_json(response, context).await?;
        Ok(())
    }

    async fn transform_array(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        transform: &str,
        value: &FieldValue,
    ) -> SodapopResult<()> {
        let write = array_transform_write(&self.document_name(collection, id), field, transform, value);
        self.commit(vec![write], &format!("Failed to update {field} on {collection}/{id}"))
            .await
    }
}

fn set_write(name: &str, fields: &Fields) -> Value {
    let encoded = encode_fields(fields);
    let transforms: Vec<Value> = encoded
        .server_timestamps
        .iter()
        .map(|path| json!({ "fieldPath": path, "setToServerValue": "REQUEST_TIME" }))
        .collect();

    let mut write = json!({ "update": { "name": name, "fields": encoded.fields } });
    if !transforms.is_empty() {
        write["updateTransforms"] = Value::Array(transforms);
    }
    write
}

/// `transform` is `appendMissingElements` or `removeAllFromArray`. The
/// document must already exist.
fn array_transform_write(name: &str, field: &str, transform: &str, value: &FieldValue) -> Value {
    let mut field_transform = serde_json::Map::new();
    field_transform.insert("fieldPath".into(), json!(field));
    field_transform.insert(transform.into(), json!({ "values": [encode_value(value)] }));

    json!({
        "transform": {
            "document": name,
            "fieldTransforms": [field_transform],
        },
        "currentDocument": { "exists": true },
    })
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list(&self, collection: &str) -> SodapopResult<Vec<Document>> {
        let url = format!("{}/{collection}", self.documents_url());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(reqwest::Method::GET, &url)
                .await?
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| SodapopError::Remote(format!("Failed to list {collection}: {e}")))?;
            let page: Value = read_json(response, &format!("Failed to list {collection}")).await?;

            if let Some(resources) = page.get("documents").and_then(Value::as_array) {
                documents.extend(resources.iter().filter_map(decode_document).map(|raw| raw.document));
            }

            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(String::from);
            if page_token.is_none() {
                break;
            }
        }

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> SodapopResult<Option<Document>> {
        Ok(self.fetch(collection, id).await?.map(|raw| raw.document))
    }

    async fn add(&self, collection: &str, fields: Fields) -> SodapopResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.set(collection, &id, fields).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> SodapopResult<()> {
        let write = set_write(&self.document_name(collection, id), &fields);
        self.commit(vec![write], &format!("Failed to write {collection}/{id}"))
            .await
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> SodapopResult<()> {
        self.transform_array(collection, id, field, "appendMissingElements", &value)
            .await
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> SodapopResult<()> {
        self.transform_array(collection, id, field, "removeAllFromArray", &value)
            .await
    }

    /// Polls the document and forwards it whenever its update time moves.
    async fn watch(&self, collection: &str, id: &str) -> SodapopResult<DocumentSnapshots> {
        let initial = self.fetch(collection, id).await?;
        let (tx, snapshots) = DocumentSnapshots::channel();

        let mut last_update = None;
        if let Some(raw) = initial {
            last_update = raw.update_time;
            let _ = tx.send(raw.document);
        }

        let client = self.clone();
        let collection = collection.to_string();
        let id = id.to_string();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(client.inner.poll_interval).await;
                if tx.is_closed() {
                    break;
                }

                match client.fetch(&collection, &id).await {
                    Ok(Some(raw)) if raw.update_time != last_update => {
                        last_update = raw.update_time;
                        if tx.send(raw.document).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to poll {collection}/{id}: {e}"),
                }
            }
            debug!("Stopped watching {collection}/{id}");
        });

        Ok(snapshots)
    }
}

#[async_trait]
impl AnonymousAuth for FirestoreClient {
    async fn current_uid(&self) -> Option<String> {
        self.inner.session.lock().await.as_ref().map(|s| s.uid.clone())
    }

    async fn sign_in_anonymously(&self) -> SodapopResult<String> {
        let session = auth::sign_up(&self.inner.http, &self.inner.config.api_key).await?;
        self.persist(&session);

        let uid = session.uid.clone();
        *self.inner.session.lock().await = Some(session);
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FirebaseConfig {
        FirebaseConfig {
            api_key: "key".into(),
            auth_domain: "sodapop.firebaseapp.com".into(),
            project_id: "sodapop-dev".into(),
            storage_bucket: "sodapop-dev.appspot.com".into(),
            messaging_sender_id: "123".into(),
            app_id: "1:123:web:abc".into(),
        }
    }

    #[test]
    fn document_names_are_fully_qualified() {
        let client = FirestoreClient::new(config());
        assert_eq!(
            client.document_name("users", "u1"),
            "projects/sodapop-dev/databases/(default)/documents/users/u1"
        );
        assert_eq!(
            client.documents_url(),
            "https://firestore.googleapis.com/v1/projects/sodapop-dev/databases/(default)/documents"
        );
    }

    #[test]
    fn set_write_turns_server_timestamps_into_transforms() {
        let mut fields = Fields::new();
        fields.insert("title".into(), "Jazz Night".into());
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);

        let write = set_write("projects/p/databases/(default)/documents/events/e1", &fields);

        assert_eq!(write["update"]["fields"]["title"], json!({ "stringValue": "Jazz Night" }));
        assert!(write["update"]["fields"].get("createdAt").is_none());
        assert_eq!(
            write["updateTransforms"],
            json!([{ "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" }])
        );
    }

    #[test]
    fn plain_set_has_no_transforms() {
        let mut fields = Fields::new();
        fields.insert("name".into(), "Soda Popper".into());

        let write = set_write("n", &fields);
        assert!(write.get("updateTransforms").is_none());
    }

    #[test]
    fn array_union_requires_existing_document() {
        let write = array_transform_write("n", "savedEventIds", "appendMissingElements", &"7".into());

        assert_eq!(write["currentDocument"], json!({ "exists": true }));
        assert_eq!(
            write["transform"]["fieldTransforms"][0],
            json!({
                "fieldPath": "savedEventIds",
                "appendMissingElements": { "values": [{ "stringValue": "7" }] }
            })
        );
    }

    #[tokio::test]
    async fn session_file_is_loaded_on_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        Session {
            uid: "saved-uid".into(),
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        }
        .save(&path)
        .unwrap();

        let client = FirestoreClient::new(config()).with_session_file(&path);

        assert_eq!(client.current_uid().await, Some("saved-uid".to_string()));
        assert_eq!(client.id_token().await.unwrap(), Some("id".to_string()));
    }

    #[tokio::test]
    async fn no_session_means_signed_out() {
        let client = FirestoreClient::new(config());
        assert_eq!(client.current_uid().await, None);
        assert_eq!(client.id_token().await.unwrap(), None);
    }
}
