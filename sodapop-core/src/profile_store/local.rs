//! Profile kept in local storage.

use std::sync::Arc;

use async_trait::async_trait;
use log::error;
use tokio::sync::watch;

use super::{ProfileState, ProfileStore};
use crate::constants::USER_STORAGE_KEY;
use crate::profile::UserProfile;
use crate::storage::{KeyValueStore, read_json, write_json};

/// Updates apply synchronously in memory, then the whole profile is
/// written back to storage.
pub struct LocalProfileStore {
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<ProfileState>,
}

impl LocalProfileStore {
    /// Load the stored profile, or fall back to `default_profile` when it is
    /// absent or malformed. Ready immediately.
    pub fn open(storage: Arc<dyn KeyValueStore>, default_profile: UserProfile) -> Self {
        let profile = read_json::<UserProfile>(&*storage, USER_STORAGE_KEY)
            .found()
            .unwrap_or(default_profile);

        let (state, _) = watch::channel(ProfileState {
            profile,
            loading: false,
        });

        LocalProfileStore { storage, state }
    }

    fn update(&self, apply: impl FnOnce(&mut UserProfile) -> bool) {
        let changed = self.state.send_if_modified(|state| apply(&mut state.profile));
        if !changed {
            return;
        }

        let profile = self.state.borrow().profile.clone();
        if let Err(e) = write_json(&*self.storage, USER_STORAGE_KEY, &profile) {
            error!("Failed to persist profile: {e}");
        }
    }
}

#[async_trait]
impl ProfileStore for LocalProfileStore {
    fn state(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    async fn save_event(&self, event_id: &str) {
        self.update(|profile| profile.save(event_id));
    }

    async fn pass_event(&self, event_id: &str) {
        self.update(|profile| profile.pass(event_id));
    }

    async fn unsave_event(&self, event_id: &str) {
        self.update(|profile| profile.unsave(event_id));
    }

    async fn track_created_event(&self, event_id: &str) {
        self.update(|profile| profile.track_created(event_id));
    }
}
