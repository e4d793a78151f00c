use anyhow::Result;
use owo_colors::OwoColorize;
use sodapop_core::app::App;
use sodapop_core::profile_store::ProfileStore;

use crate::render::Render;

pub async fn run(app: &App) -> Result<()> {
    let profile = app.profile.ready().await;
    println!("{}", profile.render());

    let created = app.created_events().await;
    println!();
    println!("{}", "Created events".bold());
    if created.is_empty() {
        println!("  {}", "None yet. Try `sodapop new`.".dimmed());
    }
    for event in &created {
        println!("  {}", event.render());
    }

    Ok(())
}
