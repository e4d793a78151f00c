//! Discovery feed controller.

use std::collections::HashSet;
use std::sync::Arc;

use crate::analytics::{self, Action};
use crate::event::Event;
use crate::events::EventRepository;
use crate::profile::UserProfile;
use crate::profile_store::ProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Save
    Right,
    /// Pass
    Left,
}

/// IDs a normal feed load hides: everything saved or passed.
pub fn exclusion_set(profile: &UserProfile) -> HashSet<String> {
    profile.seen_event_ids().into_iter().collect()
}

/// The deck of cards the user swipes through.
///
/// The deck only shrinks as cards are swiped, or is replaced wholesale by a
/// reload. It is never persisted.
pub struct DiscoveryFeed {
    events: Arc<dyn EventRepository>,
    profile: Arc<dyn ProfileStore>,
    deck: Vec<Event>,
    start_over: bool,
}

impl DiscoveryFeed {
    pub fn new(events: Arc<dyn EventRepository>, profile: Arc<dyn ProfileStore>) -> Self {
        DiscoveryFeed {
            events,
            profile,
            deck: Vec::new(),
            start_over: false,
        }
    }

    /// Replace the deck with every event the user has not seen yet.
    ///
    /// Waits for the profile store to finish loading first. After
    /// `start_over` this one load skips the exclusions.
    pub async fn load(&mut self) -> &[Event] {
        let profile = self.profile.ready().await;
        let exclude = if std::mem::take(&mut self.start_over) {
            HashSet::new()
        } else {
            exclusion_set(&profile)
        };

        self.deck = self.events.list_events(&exclude).await;
        &self.deck
    }

    /// Reload showing every event again, without touching the profile.
    ///
    /// Only this load ignores saved/passed; the next `load` hides them again.
    pub async fn start_over(&mut self) -> &[Event] {
        self.start_over = true;
        self.load().await
    }

    pub fn deck(&self) -> &[Event] {
        &self.deck
    }

    /// The card currently on top.
    pub fn top(&self) -> Option<&Event> {
        self.deck.first()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub async fn swipe_right(&mut self, event_id: &str) -> Option<Event> {
        self.swipe(event_id, SwipeDirection::Right).await
    }

    pub async fn swipe_left(&mut self, event_id: &str) -> Option<Event> {
        self.swipe(event_id, SwipeDirection::Left).await
    }

    /// Drop the card from the deck and record the decision on the profile.
    ///
    /// The deck changes locally before the profile store is asked; the card
    /// stays gone even if that mutation fails. Returns the removed card.
    pub async fn swipe(&mut self, event_id: &str, direction: SwipeDirection) -> Option<Event> {
        let removed = self
            .deck
            .iter()
            .position(|e| e.id == event_id)
            .map(|index| self.deck.remove(index));

        let title = removed.as_ref().map(|e| e.title.as_str());
        match direction {
            SwipeDirection::Right => {
                analytics::track(Action::SwipeRight, event_id, title);
                self.profile.save_event(event_id).await;
            }
            SwipeDirection::Left => {
                analytics::track(Action::SwipeLeft, event_id, title);
                self.profile.pass_event(event_id).await;
            }
        }

        removed
    }
}
