use anyhow::Result;
use owo_colors::OwoColorize;
use sodapop_core::app::App;
use sodapop_core::profile_store::ProfileStore;

use crate::render::Render;

pub async fn run(app: &App) -> Result<()> {
    app.profile.ready().await;
    let saved = app.saved();
    let events = saved.refresh().await;

    if events.is_empty() {
        println!("{}", "No saved events yet. Swipe right on some!".dimmed());
    }
    for event in &events {
        println!("{}", event.render());
    }

    let unresolved = saved.unresolved();
    if !unresolved.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} saved event(s) could not be found: {}", unresolved.len(), unresolved.join(", "))
                .yellow()
        );
    }

    Ok(())
}

pub async fn remove(app: &App, id: &str) -> Result<()> {
    app.profile.ready().await;
    let saved = app.saved();

    if !saved.is_saved(id) {
        anyhow::bail!("Event '{}' is not in your saved list", id);
    }

    saved.remove_event(id).await;
    println!("{} {}", "Removed".yellow(), id);
    Ok(())
}
