//! Per-session user profile.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AVATAR_SEED, DEFAULT_USER_ID, DEFAULT_USER_NAME, avatar_url};

/// Identity plus the three event-ID sets.
///
/// Each set is insertion-ordered and holds an ID at most once; every insert
/// is idempotent. Nothing stops the same ID from being both saved and passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_event_ids: IndexSet<String>,
    #[serde(default)]
    pub saved_event_ids: IndexSet<String>,
    #[serde(default)]
    pub passed_event_ids: IndexSet<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            id: DEFAULT_USER_ID.to_string(),
            name: DEFAULT_USER_NAME.to_string(),
            avatar_url: Some(avatar_url(DEFAULT_AVATAR_SEED)),
            created_event_ids: IndexSet::new(),
            saved_event_ids: IndexSet::new(),
            passed_event_ids: IndexSet::new(),
        }
    }
}

impl UserProfile {
    /// Fresh profile for a newly signed-in anonymous session.
    pub fn provisioned(uid: &str) -> Self {
        UserProfile {
            id: uid.to_string(),
            avatar_url: Some(avatar_url(uid)),
            ..Default::default()
        }
    }

    /// Returns true if the ID was not saved before.
    pub fn save(&mut self, event_id: &str) -> bool {
        self.saved_event_ids.insert(event_id.to_string())
    }

    /// Returns true if the ID was not passed before.
    pub fn pass(&mut self, event_id: &str) -> bool {
        self.passed_event_ids.insert(event_id.to_string())
    }

    /// Returns true if the ID was saved.
    pub fn unsave(&mut self, event_id: &str) -> bool {
        self.saved_event_ids.shift_remove(event_id)
    }

    /// Records a created event, most recent first. Returns true if it was new.
    pub fn track_created(&mut self, event_id: &str) -> bool {
        if self.created_event_ids.contains(event_id) {
            return false;
        }
        self.created_event_ids.shift_insert(0, event_id.to_string());
        true
    }

    pub fn is_saved(&self, event_id: &str) -> bool {
        self.saved_event_ids.contains(event_id)
    }

    /// Everything the discovery feed should hide: saved ∪ passed.
    pub fn seen_event_ids(&self) -> IndexSet<String> {
        self.saved_event_ids
            .union(&self.passed_event_ids)
            .cloned()
            .collect()
    }
}
