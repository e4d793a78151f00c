//! Placeholder for a future scraped event source.

use std::collections::HashSet;

use async_trait::async_trait;
use log::warn;

use super::EventRepository;
use crate::error::{SodapopError, SodapopResult};
use crate::event::{Event, EventDraft};

#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperEventProvider;

#[async_trait]
impl EventRepository for ScraperEventProvider {
    async fn list_events(&self, _exclude_ids: &HashSet<String>) -> Vec<Event> {
        warn!("Scraper event source is not yet implemented. Returning empty list.");
        Vec::new()
    }

    async fn get_event(&self, id: &str) -> Option<Event> {
        warn!("Scraper event source is not yet implemented (requested {id}).");
        None
    }

    async fn create_event(&self, _draft: EventDraft) -> SodapopResult<Event> {
        Err(SodapopError::NotImplemented(
            "Creating events on the scraper source".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_are_empty_and_create_fails() {
        let scraper = ScraperEventProvider;
        assert!(scraper.all_events().await.is_empty());
        assert_eq!(scraper.get_event("missing-id").await, None);

        let result = scraper.create_event(EventDraft::default()).await;
        assert!(matches!(result, Err(SodapopError::NotImplemented(_))));
    }
}
