//! Mock backend: a seed list plus an overlay persisted in local storage.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use uuid::Uuid;

use super::{EventRepository, without_excluded};
use crate::constants::EVENTS_STORAGE_KEY;
use crate::error::SodapopResult;
use crate::event::{Event, EventDraft};
use crate::storage::{KeyValueStore, Stored, read_json, write_json};

/// Artificial network delay, so the UI can be exercised realistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub list: Duration,
    pub get: Duration,
    pub create: Duration,
}

impl MockLatency {
    pub const NONE: MockLatency = MockLatency {
        list: Duration::ZERO,
        get: Duration::ZERO,
        create: Duration::ZERO,
    };

    /// `ms` for listing and creating; single lookups take 3/5 of that.
    pub fn from_millis(ms: u64) -> Self {
        MockLatency {
            list: Duration::from_millis(ms),
            get: Duration::from_millis(ms.saturating_mul(3) / 5),
            create: Duration::from_millis(ms),
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self::from_millis(500)
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

pub struct MockEventProvider {
    seed: Arc<[Event]>,
    storage: Arc<dyn KeyValueStore>,
    latency: MockLatency,
}

impl MockEventProvider {
    pub fn new(seed: Vec<Event>, storage: Arc<dyn KeyValueStore>, latency: MockLatency) -> Self {
        MockEventProvider {
            seed: seed.into(),
            storage,
            latency,
        }
    }

    /// The persisted overlay if present, else the seed list.
    ///
    /// A missing overlay is initialized with the seed list; a malformed one
    /// is logged and left alone.
    fn read_events(&self) -> Vec<Event> {
        match read_json::<Vec<Event>>(&*self.storage, EVENTS_STORAGE_KEY) {
            Stored::Found(events) => events.into_iter().map(Event::with_defaults).collect(),
            Stored::Missing => {
                if let Err(e) = write_json(&*self.storage, EVENTS_STORAGE_KEY, &self.seed[..]) {
                    error!("Failed to initialize stored events: {e}");
                }
                self.seed.to_vec()
            }
            Stored::Unreadable => self.seed.to_vec(),
        }
    }
}

#[async_trait]
impl EventRepository for MockEventProvider {
    async fn list_events(&self, exclude_ids: &HashSet<String>) -> Vec<Event> {
        delay(self.latency.list).await;
        without_excluded(self.read_events(), exclude_ids)
    }

    async fn get_event(&self, id: &str) -> Option<Event> {
        delay(self.latency.get).await;
        self.read_events().into_iter().find(|e| e.id == id)
    }

    async fn create_event(&self, draft: EventDraft) -> SodapopResult<Event> {
        delay(self.latency.create).await;

        let event = draft.into_event(Uuid::new_v4().simple().to_string());

        let mut events = self.read_events();
        events.insert(0, event.clone());
        write_json(&*self.storage, EVENTS_STORAGE_KEY, &events)?;

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::sample_events;
    use crate::event::Location;
    use crate::storage::MemoryStorage;

    fn provider() -> (MockEventProvider, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let provider = MockEventProvider::new(sample_events(), storage.clone(), MockLatency::NONE);
        (provider, storage)
    }

    fn draft(image_url: Option<&str>) -> EventDraft {
        EventDraft {
            title: "Sunset Kayak Tour".to_string(),
            description: "Paddle the bay at golden hour".to_string(),
            date: "2023-11-04".to_string(),
            time: "5:30 PM".to_string(),
            location: Location {
                name: "Harbor Dock".to_string(),
                address: "9 Pier Rd".to_string(),
                city: "Metropolis".to_string(),
            },
            image_url: image_url.map(String::from),
            category: Some("Outdoors".to_string()),
            coordinates: None,
        }
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn excluding_swiped_events_keeps_the_rest_in_order() {
        let (provider, _) = provider();
        let exclude: HashSet<String> = ["1", "2"].iter().map(|s| s.to_string()).collect();

        let events = provider.list_events(&exclude).await;
        assert_eq!(ids(&events), ["3", "4", "5"]);
    }

    #[tokio::test]
    async fn first_read_initializes_the_overlay() {
        let (provider, storage) = provider();
        assert!(storage.get_item(EVENTS_STORAGE_KEY).unwrap().is_none());

        provider.all_events().await;
        let stored: Vec<Event> = read_json(&*storage, EVENTS_STORAGE_KEY).found().unwrap();
        assert_eq!(stored.len(), 5);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (provider, _) = provider();

        for image in [None, Some("https://example.com/kayak.jpg")] {
            let draft = draft(image);
            let created = provider.create_event(draft.clone()).await.unwrap();
            let fetched = provider.get_event(&created.id).await.unwrap();

            assert_eq!(fetched, draft.into_event(created.id.clone()));
            assert_eq!(fetched, created);
        }
    }

    #[tokio::test]
    async fn created_events_are_listed_first() {
        let (provider, _) = provider();
        let created = provider.create_event(draft(None)).await.unwrap();

        let events = provider.all_events().await;
        assert_eq!(events.len(), 6);
        assert_eq!(events[0].id, created.id);
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let (provider, _) = provider();
        assert_eq!(provider.get_event("missing-id").await, None);
    }

    #[tokio::test]
    async fn malformed_overlay_falls_back_to_seed() {
        let (provider, storage) = provider();
        storage.set_item(EVENTS_STORAGE_KEY, "[{broken").unwrap();

        assert_eq!(provider.all_events().await.len(), 5);
    }

    #[tokio::test]
    async fn stored_events_without_image_get_the_placeholder() {
        let (provider, storage) = provider();
        storage
            .set_item(
                EVENTS_STORAGE_KEY,
                r#"[{"id":"x","title":"Old","date":"2023-10-01","time":"1 PM","location":{"name":"Hall","address":"","city":""},"imageUrl":""}]"#,
            )
            .unwrap();

        let event = provider.get_event("x").await.unwrap();
        assert_eq!(event.image_url, crate::constants::DEFAULT_EVENT_IMAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let storage = Arc::new(MemoryStorage::new());
        let provider = MockEventProvider::new(sample_events(), storage, MockLatency::default());

        let started = tokio::time::Instant::now();
        provider.all_events().await;
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[test]
    fn huge_latency_setting_does_not_overflow() {
        let latency = MockLatency::from_millis(u64::MAX);

        assert_eq!(latency.list, Duration::from_millis(u64::MAX));
        assert_eq!(latency.get, Duration::from_millis(u64::MAX / 5));
    }

    #[test]
    fn lookups_take_three_fifths_of_the_list_delay() {
        assert_eq!(MockLatency::from_millis(500).get, Duration::from_millis(300));
    }
}
