//! Saved-events view model.
//!
//! A read-through view of the profile's saved-ID set: each ID is resolved
//! through the event repository whenever the set changes. Saving and
//! removing go straight to the profile store, so there is no second copy of
//! the saved set to drift out of sync.

use std::sync::Arc;

use indexmap::IndexSet;
use log::warn;
use tokio::sync::watch;

use crate::event::Event;
use crate::events::EventRepository;
use crate::profile::UserProfile;
use crate::profile_store::ProfileStore;
use crate::subscription::Subscription;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedView {
    /// Resolved events, in saved order
    pub events: Vec<Event>,
    /// Saved IDs the repository could not resolve on the last refresh
    pub unresolved: Vec<String>,
}

pub struct SavedEvents {
    events: Arc<dyn EventRepository>,
    profile: Arc<dyn ProfileStore>,
    view: watch::Sender<SavedView>,
}

impl SavedEvents {
    pub fn new(events: Arc<dyn EventRepository>, profile: Arc<dyn ProfileStore>) -> Self {
        let (view, _) = watch::channel(SavedView::default());
        SavedEvents {
            events,
            profile,
            view,
        }
    }

    /// Resolve the current saved set, one ID at a time.
    ///
    /// IDs that no longer resolve are logged and left out; the rest of the
    /// list is still produced.
    pub async fn refresh(&self) -> Vec<Event> {
        let ids = self.profile.profile().saved_event_ids;
        self.resolve(&ids).await
    }

    async fn resolve(&self, ids: &IndexSet<String>) -> Vec<Event> {
        let mut view = SavedView::default();

        for id in ids {
            match self.events.get_event(id).await {
                Some(event) => view.events.push(event),
                None => {
                    warn!("Saved event {id} could not be resolved");
                    view.unresolved.push(id.clone());
                }
            }
        }

        let events = view.events.clone();
        self.view.send_replace(view);
        events
    }

    /// Events resolved by the last refresh.
    pub fn saved_events(&self) -> Vec<Event> {
        self.view.borrow().events.clone()
    }

    pub fn unresolved(&self) -> Vec<String> {
        self.view.borrow().unresolved.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SavedView> {
        self.view.subscribe()
    }

    pub async fn save_event(&self, event_id: &str) {
        self.profile.save_event(event_id).await;
    }

    pub async fn remove_event(&self, event_id: &str) {
        self.profile.unsave_event(event_id).await;
    }

    pub fn is_saved(&self, event_id: &str) -> bool {
        self.profile.profile().is_saved(event_id)
    }

    /// Re-resolve in the background every time the saved set changes.
    ///
    /// Runs one refresh straight away. Refreshes are not cancelled when the
    /// set changes again mid-way; the latest one to finish wins.
    pub fn watch(self: Arc<Self>) -> Subscription {
        let mut state = self.profile.state();

        let handle = tokio::spawn(async move {
            let mut last: Option<IndexSet<String>> = None;
            loop {
                let ids = state.borrow_and_update().profile.saved_event_ids.clone();
                if last.as_ref() != Some(&ids) {
                    self.resolve(&ids).await;
                    last = Some(ids);
                }
                if state.changed().await.is_err() {
                    break;
                }
            }
        });

        Subscription::new(handle)
    }
}

/// Events the user created, in repository order.
pub async fn created_events(events: &dyn EventRepository, profile: &UserProfile) -> Vec<Event> {
    if profile.created_event_ids.is_empty() {
        return Vec::new();
    }
    events
        .all_events()
        .await
        .into_iter()
        .filter(|event| profile.created_event_ids.contains(&event.id))
        .collect()
}
