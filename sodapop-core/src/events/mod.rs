//! The event repository abstraction.
//!
//! Callers depend only on `EventRepository`; exactly one backend is chosen
//! at startup by the composition root (`crate::app`).

mod mock;
mod remote;
mod scraper;
mod seed;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::SodapopResult;
use crate::event::{Event, EventDraft};

pub use mock::{MockEventProvider, MockLatency};
pub use remote::DocumentEventProvider;
pub use scraper::ScraperEventProvider;
pub use seed::sample_events;

/// Read and create events.
///
/// Reads never fail: backends that can hit transport errors log them and
/// return an empty list / `None` so the feed never blocks on a bad fetch.
/// Creation does fail, because callers must know whether the event exists.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All known events except those in `exclude_ids`, in backend order.
    async fn list_events(&self, exclude_ids: &HashSet<String>) -> Vec<Event>;

    /// A single event, or `None` if it does not exist (or could not be read).
    async fn get_event(&self, id: &str) -> Option<Event>;

    /// Persist a draft under a new unique ID and return the stored event.
    async fn create_event(&self, draft: EventDraft) -> SodapopResult<Event>;

    async fn all_events(&self) -> Vec<Event> {
        self.list_events(&HashSet::new()).await
    }
}

fn without_excluded(events: Vec<Event>, exclude_ids: &HashSet<String>) -> Vec<Event> {
    if exclude_ids.is_empty() {
        return events;
    }
    events
        .into_iter()
        .filter(|e| !exclude_ids.contains(&e.id))
        .collect()
}
