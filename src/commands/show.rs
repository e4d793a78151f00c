use anyhow::Result;
use owo_colors::OwoColorize;
use sodapop_core::analytics::{self, Action};
use sodapop_core::app::App;
use sodapop_core::events::EventRepository;
use sodapop_core::profile_store::ProfileStore;

use crate::render::render_details;

pub async fn run(app: &App, id: &str, tickets: bool, toggle_save: bool) -> Result<()> {
    let Some(event) = app.events.get_event(id).await else {
        anyhow::bail!("Event '{}' not found", id);
    };
    analytics::track(Action::ViewDetails, &event.id, Some(&event.title));

    let mut saved = app.profile.ready().await.is_saved(&event.id);
    if toggle_save {
        saved = toggle(app, &event.id, saved).await;
    }

    println!("{}", render_details(&event, saved));

    if tickets {
        analytics::track(Action::ClickTicket, &event.id, Some(&event.title));
        println!();
        println!("{}", "Ticketing isn't available for this event yet.".dimmed());
    }

    Ok(())
}

/// Flip the saved state of an event, returning the new state.
async fn toggle(app: &App, event_id: &str, saved: bool) -> bool {
    let view = app.saved();
    if saved {
        view.remove_event(event_id).await;
    } else {
        view.save_event(event_id).await;
    }
    !saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodapop_core::config::DataSource;
    use sodapop_core::events::{MockLatency, sample_events};
    use sodapop_core::storage::MemoryStorage;
    use std::sync::Arc;

    fn app() -> App {
        App::with_storage(
            DataSource::Mock,
            Arc::new(MemoryStorage::new()),
            sample_events(),
            MockLatency::NONE,
        )
    }

    #[tokio::test]
    async fn toggle_saves_then_unsaves() {
        let app = app();

        run(&app, "2", false, true).await.unwrap();
        assert!(app.profile.profile().is_saved("2"));

        run(&app, "2", false, true).await.unwrap();
        assert!(!app.profile.profile().is_saved("2"));
    }

    #[tokio::test]
    async fn plain_show_changes_nothing() {
        let app = app();

        run(&app, "2", true, false).await.unwrap();
        assert!(app.profile.profile().saved_event_ids.is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_an_error() {
        let app = app();
        assert!(run(&app, "missing-id", false, true).await.is_err());
        assert!(app.profile.profile().saved_event_ids.is_empty());
    }
}
