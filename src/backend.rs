//! Wires up the backends selected by settings.

use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use sodapop_core::app::App;
use sodapop_core::config::{FirebaseConfig, Settings};
use sodapop_core::events::sample_events;
use sodapop_firestore::FirestoreClient;
use sodapop_firestore::auth::default_session_path;

pub async fn open(settings: &Settings) -> Result<App> {
    if !settings.use_firebase {
        debug!("Local data in {}", settings.data_path().display());
        return Ok(App::local(settings, sample_events()));
    }

    let config = FirebaseConfig::from_env()?;
    debug!("Connecting to Firebase project {}", config.project_id);
    let client = FirestoreClient::new(config)
        .with_session_file(default_session_path(&settings.data_path()))
        .with_poll_interval(Duration::from_millis(settings.profile_poll_ms));

    App::remote(client)
        .await
        .context("Failed to connect to Firebase")
}
