//! Composition root.
//!
//! Picks one event backend and one profile store from configuration and
//! hands them to the view models. Nothing below this module knows which
//! backends are in use.

use std::sync::Arc;

use log::info;

use crate::config::{DataSource, Settings};
use crate::document::{AnonymousAuth, DocumentStore};
use crate::error::SodapopResult;
use crate::event::Event;
use crate::events::{
    DocumentEventProvider, EventRepository, MockEventProvider, MockLatency, ScraperEventProvider,
};
use crate::feed::DiscoveryFeed;
use crate::profile::UserProfile;
use crate::profile_store::{LocalProfileStore, ProfileStore, RemoteProfileStore};
use crate::saved::{self, SavedEvents};
use crate::storage::{FileStorage, KeyValueStore};
use crate::subscription::Subscription;

pub struct App {
    pub events: Arc<dyn EventRepository>,
    pub profile: Arc<dyn ProfileStore>,
    subscription: Option<Subscription>,
}

impl App {
    /// Local mode: profile and mock overlay in files under the data dir.
    pub fn local(settings: &Settings, seed: Vec<Event>) -> Self {
        let storage = Arc::new(FileStorage::new(settings.data_path()));
        Self::with_storage(
            settings.data_source,
            storage,
            seed,
            MockLatency::from_millis(settings.mock_latency_ms),
        )
    }

    pub fn with_storage(
        source: DataSource,
        storage: Arc<dyn KeyValueStore>,
        seed: Vec<Event>,
        latency: MockLatency,
    ) -> Self {
        info!("Using {source} event source with local profile");

        let events: Arc<dyn EventRepository> = match source {
            DataSource::Mock => Arc::new(MockEventProvider::new(seed, storage.clone(), latency)),
            DataSource::Scraper => Arc::new(ScraperEventProvider),
        };
        let profile = Arc::new(LocalProfileStore::open(storage, UserProfile::default()));

        App {
            events,
            profile,
            subscription: None,
        }
    }

    /// Remote mode: events and the profile live in the document store.
    ///
    /// Signs in, loads or provisions the profile and keeps it subscribed
    /// until `shutdown`.
    pub async fn remote<D>(client: D) -> SodapopResult<Self>
    where
        D: DocumentStore + AnonymousAuth + 'static,
    {
        let client = Arc::new(client);
        let docs: Arc<dyn DocumentStore> = client.clone();
        let auth: Arc<dyn AnonymousAuth> = client;

        let profile = Arc::new(RemoteProfileStore::new(docs.clone(), auth));
        let subscription = profile.connect().await?;
        info!("Using remote event source with profile {}", profile.profile().id);

        Ok(App {
            events: Arc::new(DocumentEventProvider::new(docs)),
            profile,
            subscription: Some(subscription),
        })
    }

    pub fn feed(&self) -> DiscoveryFeed {
        DiscoveryFeed::new(self.events.clone(), self.profile.clone())
    }

    pub fn saved(&self) -> SavedEvents {
        SavedEvents::new(self.events.clone(), self.profile.clone())
    }

    pub async fn created_events(&self) -> Vec<Event> {
        let profile = self.profile.ready().await;
        saved::created_events(&*self.events, &profile).await
    }

    /// Stop the live profile subscription, if any.
    pub fn shutdown(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventDraft, Location};
    use crate::events::sample_events;
    use crate::memory::MemoryDocumentStore;
    use crate::storage::MemoryStorage;

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.into(),
            description: "Test".into(),
            date: "2026-05-01".into(),
            time: "8:00 PM".into(),
            location: Location::unknown(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn local_app_uses_the_mock_backend() {
        let app = App::with_storage(
            DataSource::Mock,
            Arc::new(MemoryStorage::new()),
            sample_events(),
            MockLatency::NONE,
        );

        let mut feed = app.feed();
        assert_eq!(feed.load().await.len(), 5);
        feed.swipe_right("2").await;

        let saved = app.saved();
        let ids: Vec<_> = saved.refresh().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["2"]);
    }

    #[tokio::test]
    async fn scraper_source_serves_nothing() {
        let app = App::with_storage(
            DataSource::Scraper,
            Arc::new(MemoryStorage::new()),
            sample_events(),
            MockLatency::NONE,
        );

        assert!(app.feed().load().await.is_empty());
        assert!(app.events.create_event(draft("Nope")).await.is_err());
    }

    #[tokio::test]
    async fn local_app_persists_to_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(
            &dir.path().join("config.toml"),
            [
                ("DATA_DIR".to_string(), dir.path().join("data").display().to_string()),
                ("MOCK_LATENCY_MS".to_string(), "0".to_string()),
            ],
        )
        .unwrap();

        let app = App::local(&settings, sample_events());
        app.profile.save_event("4").await;

        let reopened = App::local(&settings, sample_events());
        assert!(reopened.profile.profile().is_saved("4"));
        assert!(dir.path().join("data").join("sodapop_user.json").exists());
    }

    #[tokio::test]
    async fn remote_app_tracks_created_events() {
        let store = MemoryDocumentStore::new();
        let app = App::remote(store.clone()).await.unwrap();

        let event = app.events.create_event(draft("Block Party")).await.unwrap();
        app.profile.track_created_event(&event.id).await;

        let mut state = app.profile.state();
        state
            .wait_for(|s| s.profile.created_event_ids.contains(&event.id))
            .await
            .unwrap();

        let created = app.created_events().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].title, "Block Party");

        app.shutdown();
    }
}
