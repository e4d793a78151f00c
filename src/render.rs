//! Terminal rendering for sodapop types.

use owo_colors::OwoColorize;
use sodapop_core::UserProfile;
use sodapop_core::event::{Event, Location};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// One-line summary.
impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {} {} {}",
            format!("[{}]", self.id).dimmed(),
            self.title.bold(),
            format!("{} {}", self.date, self.time).cyan(),
            format!("@ {}", self.location.name).dimmed()
        )
    }
}

impl Render for Location {
    fn render(&self) -> String {
        [&self.name, &self.address, &self.city]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Render for UserProfile {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", self.name.bold(), format!("({})", self.id).dimmed()),
            format!(
                "  {} saved · {} passed · {} created",
                self.saved_event_ids.len().green(),
                self.passed_event_ids.len().red(),
                self.created_event_ids.len().cyan()
            ),
        ];
        if let Some(avatar) = &self.avatar_url {
            lines.push(format!("  {}", avatar.dimmed()));
        }
        lines.join("\n")
    }
}

/// The top card of the feed.
pub fn render_card(event: &Event) -> String {
    let mut lines = vec![
        format!("{} {}", event.category.to_uppercase().magenta(), format!("[{}]", event.id).dimmed()),
        event.title.bold().to_string(),
        format!("📅 {} {}", event.date, event.time),
        format!("📍 {}", event.location.render()),
    ];
    if !event.description.is_empty() {
        lines.push(String::new());
        lines.push(event.description.clone());
    }
    lines.join("\n")
}

/// Everything the details page shows.
pub fn render_details(event: &Event, saved: bool) -> String {
    let mut lines = vec![render_card(event)];
    lines.push(String::new());
    lines.push(format!("{} {}", "Image:".dimmed(), event.image_url));
    if let Some(coordinates) = &event.coordinates {
        lines.push(format!(
            "{} {:.4}, {:.4}",
            "Coordinates:".dimmed(),
            coordinates.lat,
            coordinates.lng
        ));
    }
    let status = if saved {
        "♥ Saved".green().to_string()
    } else {
        "♡ Not saved".dimmed().to_string()
    };
    lines.push(status);
    lines.join("\n")
}
