//! User-interaction analytics.
//!
//! Recorded as structured log lines under the `analytics` target, so they
//! can be filtered with `RUST_LOG=analytics=info`.

use std::fmt;

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SwipeRight,
    SwipeLeft,
    ViewDetails,
    ClickTicket,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::SwipeRight => "SWIPE_RIGHT",
            Action::SwipeLeft => "SWIPE_LEFT",
            Action::ViewDetails => "VIEW_DETAILS",
            Action::ClickTicket => "CLICK_TICKET",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record an interaction with an event, with its title when known.
pub fn track(action: Action, event_id: &str, title: Option<&str>) {
    info!(target: "analytics", "{}", record(action, event_id, title));
}

fn record(action: Action, event_id: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{action} event_id={event_id} title={title:?}"),
        None => format!("{action} event_id={event_id}"),
    }
}
