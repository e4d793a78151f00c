//! User profile stores.
//!
//! A store exclusively owns the profile record. Everyone else reads
//! snapshots through `state()` and asks the store to mutate it; every
//! mutation is an idempotent set-union (or removal) on one ID set.
//! Mutation failures are logged and absorbed: the user can simply repeat
//! the gesture.

mod local;
mod remote;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::profile::UserProfile;

pub use local::LocalProfileStore;
pub use remote::RemoteProfileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: UserProfile,
    /// True until the initial profile has been loaded or provisioned
    pub loading: bool,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Receiver for the current state and every later change.
    fn state(&self) -> watch::Receiver<ProfileState>;

    async fn save_event(&self, event_id: &str);

    async fn pass_event(&self, event_id: &str);

    async fn unsave_event(&self, event_id: &str);

    async fn track_created_event(&self, event_id: &str);

    fn profile(&self) -> UserProfile {
        self.state().borrow().profile.clone()
    }

    fn is_loading(&self) -> bool {
        self.state().borrow().loading
    }

    /// Wait until loading has finished and return the profile.
    async fn ready(&self) -> UserProfile {
        let mut state = self.state();
        let ready = match state.wait_for(|s| !s.loading).await {
            Ok(s) => Some(s.profile.clone()),
            Err(_) => None,
        };
        ready.unwrap_or_else(|| self.profile())
    }
}
