//! Profile kept as a document in the remote store.

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, warn};
use tokio::sync::watch;

use super::{ProfileState, ProfileStore};
use crate::constants::{DEFAULT_USER_NAME, USERS_COLLECTION, avatar_url};
use crate::document::{AnonymousAuth, Document, DocumentStore, FieldValue, Fields};
use crate::error::SodapopResult;
use crate::profile::UserProfile;
use crate::subscription::Subscription;

const CREATED_FIELD: &str = "createdEventIds";
const SAVED_FIELD: &str = "savedEventIds";
const PASSED_FIELD: &str = "passedEventIds";

/// Mutations are sent as atomic add-to-set / remove updates; local state
/// only changes when the live subscription delivers the new document.
pub struct RemoteProfileStore {
    docs: Arc<dyn DocumentStore>,
    auth: Arc<dyn AnonymousAuth>,
    state: Arc<watch::Sender<ProfileState>>,
}

impl RemoteProfileStore {
    /// Created in the loading state; call `connect` to load the profile.
    pub fn new(docs: Arc<dyn DocumentStore>, auth: Arc<dyn AnonymousAuth>) -> Self {
        let (state, _) = watch::channel(ProfileState {
            profile: UserProfile::default(),
            loading: true,
        });

        RemoteProfileStore {
            docs,
            auth,
            state: Arc::new(state),
        }
    }

    /// Establish the anonymous session, fetch or provision the profile
    /// document and subscribe to its changes.
    ///
    /// Loading ends even if this fails, leaving the default profile in place.
    pub async fn connect(&self) -> SodapopResult<Subscription> {
        let result = self.load().await;
        if let Err(e) = &result {
            error!("Failed to load remote profile: {e}");
            self.state.send_modify(|state| state.loading = false);
        }
        result
    }

    async fn load(&self) -> SodapopResult<Subscription> {
        let uid = match self.auth.current_uid().await {
            Some(uid) => uid,
            None => self.auth.sign_in_anonymously().await?,
        };

        let profile = match self.docs.get(USERS_COLLECTION, &uid).await? {
            Some(doc) => profile_from_document(&uid, &doc),
            None => {
                let profile = UserProfile::provisioned(&uid);
                self.docs
                    .set(USERS_COLLECTION, &uid, profile_fields(&profile))
                    .await?;
                profile
            }
        };

        let mut snapshots = self.docs.watch(USERS_COLLECTION, &uid).await?;

        self.state.send_replace(ProfileState {
            profile,
            loading: false,
        });

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            while let Some(doc) = snapshots.next().await {
                let profile = profile_from_document(&uid, &doc);
                state.send_if_modified(|state| {
                    if state.profile == profile {
                        return false;
                    }
                    state.profile = profile;
                    true
                });
            }
        });

        Ok(Subscription::new(handle))
    }

    /// The signed-in profile's document ID, unless still loading.
    fn document_id(&self, action: &str) -> Option<String> {
        let state = self.state.borrow();
        if state.loading {
            warn!("Ignoring {action} before the profile has loaded");
            return None;
        }
        Some(state.profile.id.clone())
    }

    async fn add_to(&self, field: &str, event_id: &str, action: &str) {
        let Some(uid) = self.document_id(action) else {
            return;
        };
        if let Err(e) = self
            .docs
            .array_union(USERS_COLLECTION, &uid, field, event_id.into())
            .await
        {
            error!("Error {action} event {event_id}: {e}");
        }
    }
}

#[async_trait]
impl ProfileStore for RemoteProfileStore {
    fn state(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    async fn save_event(&self, event_id: &str) {
        self.add_to(SAVED_FIELD, event_id, "saving").await;
    }

    async fn pass_event(&self, event_id: &str) {
        self.add_to(PASSED_FIELD, event_id, "passing").await;
    }

    async fn unsave_event(&self, event_id: &str) {
        let Some(uid) = self.document_id("unsaving") else {
            return;
        };
        if let Err(e) = self
            .docs
            .array_remove(USERS_COLLECTION, &uid, SAVED_FIELD, event_id.into())
            .await
        {
            error!("Error unsaving event {event_id}: {e}");
        }
    }

    async fn track_created_event(&self, event_id: &str) {
        self.add_to(CREATED_FIELD, event_id, "tracking created").await;
    }
}

/// Read a profile document, defaulting anything missing.
fn profile_from_document(uid: &str, doc: &Document) -> UserProfile {
    UserProfile {
        id: uid.to_string(),
        name: doc.str("name").unwrap_or(DEFAULT_USER_NAME).to_string(),
        avatar_url: Some(
            doc.str("avatarUrl")
                .map(String::from)
                .unwrap_or_else(|| avatar_url(uid)),
        ),
        created_event_ids: doc.strings(CREATED_FIELD).into_iter().collect(),
        saved_event_ids: doc.strings(SAVED_FIELD).into_iter().collect(),
        passed_event_ids: doc.strings(PASSED_FIELD).into_iter().collect(),
    }
}

fn profile_fields(profile: &UserProfile) -> Fields {
    let ids = |set: &indexmap::IndexSet<String>| {
        FieldValue::Array(set.iter().map(|id| id.as_str().into()).collect())
    };

    let mut fields = Fields::new();
    fields.insert("id".into(), profile.id.as_str().into());
    fields.insert("name".into(), profile.name.as_str().into());
    if let Some(avatar) = &profile.avatar_url {
        fields.insert("avatarUrl".into(), avatar.as_str().into());
    }
    fields.insert(CREATED_FIELD.into(), ids(&profile.created_event_ids));
    fields.insert(SAVED_FIELD.into(), ids(&profile.saved_event_ids));
    fields.insert(PASSED_FIELD.into(), ids(&profile.passed_event_ids));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocumentStore;
    use std::time::Duration;

    fn remote_store(store: &MemoryDocumentStore) -> RemoteProfileStore {
        RemoteProfileStore::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    async fn wait_until(store: &RemoteProfileStore, check: impl Fn(&UserProfile) -> bool) {
        let mut state = store.state();
        tokio::time::timeout(Duration::from_secs(1), state.wait_for(|s| check(&s.profile)))
            .await
            .expect("profile never reached the expected state")
            .unwrap();
    }

    #[tokio::test]
    async fn first_contact_provisions_a_profile() {
        let store = MemoryDocumentStore::new();
        let profiles = remote_store(&store);
        assert!(profiles.is_loading());

        let _subscription = profiles.connect().await.unwrap();
        let profile = profiles.profile();

        assert!(!profiles.is_loading());
        assert_eq!(profile.id, "anon-1");
        assert_eq!(profile.name, "Soda Popper");
        assert!(store.get(USERS_COLLECTION, "anon-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn existing_document_is_loaded_with_defaults() {
        let store = MemoryDocumentStore::new().with_session("u-1").await;
        let mut fields = Fields::new();
        fields.insert(SAVED_FIELD.into(), FieldValue::Array(vec!["3".into(), "3".into()]));
        store.set(USERS_COLLECTION, "u-1", fields).await.unwrap();

        let profiles = remote_store(&store);
        let _subscription = profiles.connect().await.unwrap();
        let profile = profiles.profile();

        assert_eq!(profile.id, "u-1");
        assert_eq!(profile.name, "Soda Popper");
        assert_eq!(profile.avatar_url.as_deref(), Some(avatar_url("u-1").as_str()));
        assert_eq!(profile.saved_event_ids.len(), 1);
        assert!(profile.created_event_ids.is_empty());
    }

    #[tokio::test]
    async fn mutations_arrive_through_the_subscription() {
        let store = MemoryDocumentStore::new();
        let profiles = remote_store(&store);
        let _subscription = profiles.connect().await.unwrap();

        profiles.save_event("1").await;
        profiles.save_event("1").await;
        profiles.pass_event("2").await;
        profiles.track_created_event("mine").await;

        wait_until(&profiles, |p| {
            p.is_saved("1") && p.passed_event_ids.contains("2") && p.created_event_ids.contains("mine")
        })
        .await;
        assert_eq!(profiles.profile().saved_event_ids.len(), 1);

        profiles.unsave_event("1").await;
        wait_until(&profiles, |p| !p.is_saved("1")).await;
    }

    #[tokio::test]
    async fn external_changes_propagate() {
        let store = MemoryDocumentStore::new();
        let profiles = remote_store(&store);
        let _subscription = profiles.connect().await.unwrap();
        let uid = profiles.profile().id;

        // Another device saves an event
        store
            .array_union(USERS_COLLECTION, &uid, SAVED_FIELD, "5".into())
            .await
            .unwrap();

        wait_until(&profiles, |p| p.is_saved("5")).await;
    }

    #[tokio::test]
    async fn unsubscribed_store_stops_following_changes() {
        let store = MemoryDocumentStore::new();
        let profiles = remote_store(&store);
        let subscription = profiles.connect().await.unwrap();
        let uid = profiles.profile().id;

        subscription.unsubscribe();
        tokio::task::yield_now().await;

        store
            .array_union(USERS_COLLECTION, &uid, SAVED_FIELD, "5".into())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!profiles.profile().is_saved("5"));
    }

    #[tokio::test]
    async fn failed_mutation_is_absorbed() {
        let store = MemoryDocumentStore::new();
        let profiles = remote_store(&store);
        let _subscription = profiles.connect().await.unwrap();

        store.set_offline(true).await;
        profiles.save_event("1").await;
        store.set_offline(false).await;

        assert!(!profiles.profile().is_saved("1"));
    }

    #[tokio::test]
    async fn failed_sign_in_still_finishes_loading() {
        let store = MemoryDocumentStore::new();
        store.set_offline(true).await;
        let profiles = remote_store(&store);

        assert!(profiles.connect().await.is_err());
        assert!(!profiles.is_loading());
        assert_eq!(profiles.ready().await, UserProfile::default());
    }

    #[tokio::test]
    async fn mutations_before_connect_are_ignored() {
        let store = MemoryDocumentStore::new();
        let profiles = remote_store(&store);

        profiles.save_event("1").await;
        assert_eq!(store.count(USERS_COLLECTION).await, 0);
    }
}
