//! Event types.
//!
//! Every backend converts its storage format into these types, and the view
//! models work exclusively with them.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CATEGORY, DEFAULT_EVENT_IMAGE, UNKNOWN_VENUE};

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A discoverable event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// Free-form start time, e.g. "6:00 PM"
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Event {
    /// Fill in the image and category defaults for records that predate them.
    pub fn with_defaults(mut self) -> Self {
        if self.image_url.is_empty() {
            self.image_url = DEFAULT_EVENT_IMAGE.to_string();
        }
        if self.category.is_empty() {
            self.category = default_category();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

impl Location {
    pub fn unknown() -> Self {
        Location {
            name: UNKNOWN_VENUE.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// An event that has not been persisted yet (no identifier).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: Location,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl EventDraft {
    /// Attach the repository-assigned identifier, defaulting image and category.
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            image_url: self
                .image_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_IMAGE.to_string()),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(default_category),
            coordinates: self.coordinates,
        }
    }
}

impl From<Event> for EventDraft {
    fn from(event: Event) -> Self {
        EventDraft {
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            image_url: Some(event.image_url),
            category: Some(event.category),
            coordinates: event.coordinates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EventDraft {
        EventDraft {
            title: "Board Game Night".to_string(),
            description: "Bring a friend".to_string(),
            date: "2023-11-02".to_string(),
            time: "7:00 PM".to_string(),
            location: Location {
                name: "The Dice Tower".to_string(),
                address: "12 Meeple Rd".to_string(),
                city: "Metropolis".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn into_event_defaults_image_and_category() {
        let event = draft().into_event("abc".to_string());
        assert_eq!(event.id, "abc");
        assert_eq!(event.image_url, DEFAULT_EVENT_IMAGE);
        assert_eq!(event.category, "Social");
    }

    #[test]
    fn into_event_keeps_explicit_values() {
        let mut draft = draft();
        draft.image_url = Some("https://example.com/dice.png".to_string());
        draft.category = Some("Games".to_string());

        let event = draft.into_event("abc".to_string());
        assert_eq!(event.image_url, "https://example.com/dice.png");
        assert_eq!(event.category, "Games");
    }

    #[test]
    fn empty_image_counts_as_missing() {
        let mut draft = draft();
        draft.image_url = Some(String::new());
        assert_eq!(draft.into_event("x".into()).image_url, DEFAULT_EVENT_IMAGE);
    }

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let json = r#"{"id":"9","title":"Quiz","date":"2023-10-31","time":"8:00 PM",
            "location":{"name":"Pub","address":"1 Bar St","city":"Metropolis"}}"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.category, "Social");
        assert_eq!(event.image_url, "");
        assert_eq!(event.with_defaults().image_url, DEFAULT_EVENT_IMAGE);
    }
}
