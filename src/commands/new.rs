use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use sodapop_core::app::App;
use sodapop_core::constants::DEFAULT_EVENT_IMAGES;
use sodapop_core::event::{EventDraft, Location};
use sodapop_core::events::EventRepository;
use sodapop_core::profile_store::ProfileStore;

use crate::render::render_details;

pub struct NewEventArgs {
    pub title: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

pub async fn run(app: &App, args: NewEventArgs) -> Result<()> {
    let draft = build_draft(args)?;
    let title = draft.title.clone();

    // Only track the event once it definitely exists
    let event = app
        .events
        .create_event(draft)
        .await
        .with_context(|| format!("Failed to create event: {}", title))?;
    app.profile.track_created_event(&event.id).await;

    println!("{} {}", "Created".green(), event.id.dimmed());
    println!();
    println!("{}", render_details(&event, false));

    Ok(())
}

fn build_draft(args: NewEventArgs) -> Result<EventDraft> {
    if args.title.trim().is_empty() {
        anyhow::bail!("Title must not be empty");
    }
    NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", args.date))?;

    Ok(EventDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        date: args.date,
        time: args.time,
        location: Location {
            name: args.venue,
            address: args.address.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
        },
        image_url: args.image.as_deref().map(resolve_image).transpose()?,
        category: args.category,
        coordinates: None,
    })
}

/// A URL, or the 1-based index of a built-in image.
fn resolve_image(arg: &str) -> Result<String> {
    if let Ok(index) = arg.parse::<usize>() {
        return match index.checked_sub(1).and_then(|i| DEFAULT_EVENT_IMAGES.get(i)) {
            Some(url) => Ok(url.to_string()),
            None => anyhow::bail!(
                "Image index must be between 1 and {}",
                DEFAULT_EVENT_IMAGES.len()
            ),
        };
    }

    if arg.starts_with("https://") || arg.starts_with("http://") {
        return Ok(arg.to_string());
    }

    anyhow::bail!("Image must be a URL or a number between 1 and {}", DEFAULT_EVENT_IMAGES.len())
}
