use anyhow::Result;
use owo_colors::OwoColorize;
use sodapop_core::app::App;
use sodapop_core::events::EventRepository;
use sodapop_core::feed::SwipeDirection;

/// Swipe on `id`, or on the top card of the feed when no ID is given.
///
/// Unknown IDs are rejected before the profile is touched.
pub async fn run(app: &App, id: Option<String>, direction: SwipeDirection) -> Result<()> {
    let mut feed = app.feed();
    feed.load().await;

    let (id, title) = match id {
        Some(id) => match feed.deck().iter().find(|e| e.id == id) {
            Some(event) => (id, event.title.clone()),
            None => match app.events.get_event(&id).await {
                Some(event) => (id, event.title),
                None => anyhow::bail!("Event '{}' not found", id),
            },
        },
        None => match feed.top() {
            Some(event) => (event.id.clone(), event.title.clone()),
            None => anyhow::bail!("Nothing left to swipe. Run `sodapop feed --start-over`."),
        },
    };

    feed.swipe(&id, direction).await;

    match direction {
        SwipeDirection::Right => println!("{} {}", "♥ Saved".green(), title),
        SwipeDirection::Left => println!("{} {}", "✕ Passed".red(), title),
    }

    if let Some(next) = feed.top() {
        println!("{} {}", "Next up:".dimmed(), next.title);
    } else {
        println!("{}", "You're all caught up!".dimmed());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodapop_core::config::DataSource;
    use sodapop_core::events::{MockLatency, sample_events};
    use sodapop_core::profile_store::ProfileStore;
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
    async fn unknown_id_leaves_profile_untouched() {
        let app = app();

        assert!(run(&app, Some("bogus".into()), SwipeDirection::Right).await.is_err());
        assert!(run(&app, Some("bogus".into()), SwipeDirection::Left).await.is_err());

        let profile = app.profile.profile();
        assert!(profile.saved_event_ids.is_empty());
        assert!(profile.passed_event_ids.is_empty());
    }

    #[tokio::test]
    async fn swipes_top_card_by_default() {
        let app = app();

        run(&app, None, SwipeDirection::Right).await.unwrap();
        run(&app, None, SwipeDirection::Left).await.unwrap();

        let profile = app.profile.profile();
        assert!(profile.is_saved("1"));
        assert!(profile.passed_event_ids.contains("2"));
    }

    #[tokio::test]
    async fn already_swiped_event_can_be_saved_by_id() {
        let app = app();
        run(&app, Some("3".into()), SwipeDirection::Left).await.unwrap();

        // No longer in the deck, but it still exists
        run(&app, Some("3".into()), SwipeDirection::Right).await.unwrap();

        assert!(app.profile.profile().is_saved("3"));
    }
}
