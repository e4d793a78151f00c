//! Events stored as documents in the remote document store.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::error;

use super::{EventRepository, without_excluded};
use crate::constants::{DEFAULT_CATEGORY, DEFAULT_EVENT_IMAGE, EVENTS_COLLECTION};
use crate::document::{Document, DocumentStore, FieldValue, Fields};
use crate::error::{SodapopError, SodapopResult};
use crate::event::{Coordinates, Event, EventDraft, Location};

pub struct DocumentEventProvider {
    docs: Arc<dyn DocumentStore>,
}

impl DocumentEventProvider {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        DocumentEventProvider { docs }
    }
}

#[async_trait]
impl EventRepository for DocumentEventProvider {
    async fn list_events(&self, exclude_ids: &HashSet<String>) -> Vec<Event> {
        match self.docs.list(EVENTS_COLLECTION).await {
            Ok(docs) => without_excluded(docs.iter().map(event_from_document).collect(), exclude_ids),
            Err(e) => {
                error!("Error fetching events from the document store: {e}");
                Vec::new()
            }
        }
    }

    async fn get_event(&self, id: &str) -> Option<Event> {
        match self.docs.get(EVENTS_COLLECTION, id).await {
            Ok(doc) => doc.as_ref().map(event_from_document),
            Err(e) => {
                error!("Error fetching event {id} from the document store: {e}");
                None
            }
        }
    }

    async fn create_event(&self, draft: EventDraft) -> SodapopResult<Event> {
        // Defaults are applied before writing so the stored document matches
        // what the caller gets back.
        let event = draft.into_event(String::new());

        let mut fields = event_fields(&event);
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);

        let id = self
            .docs
            .add(EVENTS_COLLECTION, fields)
            .await
            .map_err(|e| {
                error!("Error creating event in the document store: {e}");
                SodapopError::Remote(format!("Failed to create event: {e}"))
            })?;

        Ok(Event { id, ..event })
    }
}

/// Normalize a stored event, defaulting anything missing.
///
/// `date` may be stored either as a string or as a timestamp; timestamps
/// are reduced to their UTC calendar date.
pub(crate) fn event_from_document(doc: &Document) -> Event {
    let date = match doc.get("date") {
        Some(FieldValue::Timestamp(ts)) => ts.date_naive().format("%Y-%m-%d").to_string(),
        Some(FieldValue::String(s)) => s.clone(),
        _ => String::new(),
    };

    let location = match doc.get("location").and_then(FieldValue::as_map) {
        Some(map) => {
            let field = |key: &str| {
                map.get(key)
                    .and_then(FieldValue::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Location {
                name: field("name"),
                address: field("address"),
                city: field("city"),
            }
        }
        None => Location::unknown(),
    };

    let coordinates = doc
        .get("coordinates")
        .and_then(FieldValue::as_map)
        .and_then(|map| {
            Some(Coordinates {
                lat: map.get("lat")?.as_f64()?,
                lng: map.get("lng")?.as_f64()?,
            })
        });

    let text = |key: &str| doc.str(key).unwrap_or_default().to_string();

    Event {
        id: doc.id.clone(),
        title: text("title"),
        description: text("description"),
        date,
        time: text("time"),
        location,
        image_url: doc.str("imageUrl").unwrap_or(DEFAULT_EVENT_IMAGE).to_string(),
        category: doc.str("category").unwrap_or(DEFAULT_CATEGORY).to_string(),
        coordinates,
    }
}

fn event_fields(event: &Event) -> Fields {
    let mut location = Fields::new();
    location.insert("name".into(), event.location.name.as_str().into());
    location.insert("address".into(), event.location.address.as_str().into());
    location.insert("city".into(), event.location.city.as_str().into());

    let mut fields = Fields::new();
    fields.insert("title".into(), event.title.as_str().into());
    fields.insert("description".into(), event.description.as_str().into());
    fields.insert("date".into(), event.date.as_str().into());
    fields.insert("time".into(), event.time.as_str().into());
    fields.insert("location".into(), FieldValue::Map(location));
    fields.insert("imageUrl".into(), event.image_url.as_str().into());
    fields.insert("category".into(), event.category.as_str().into());

    if let Some(coordinates) = event.coordinates {
        let mut map = Fields::new();
        map.insert("lat".into(), coordinates.lat.into());
        map.insert("lng".into(), coordinates.lng.into());
        fields.insert("coordinates".into(), FieldValue::Map(map));
    }

    fields
}
