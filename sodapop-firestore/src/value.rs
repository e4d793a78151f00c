//! Conversion between document fields and Firestore's REST value encoding.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use sodapop_core::document::{Document, FieldValue, Fields};

/// Encoded fields plus the paths that must be set to the server's clock.
pub struct EncodedFields {
    pub fields: Map<String, Value>,
    pub server_timestamps: Vec<String>,
}

pub fn encode_fields(fields: &Fields) -> EncodedFields {
    let mut server_timestamps = Vec::new();
    let fields = encode_map(fields, "", &mut server_timestamps);
    EncodedFields {
        fields,
        server_timestamps,
    }
}

fn encode_map(fields: &Fields, prefix: &str, server_timestamps: &mut Vec<String>) -> Map<String, Value> {
    let mut encoded = Map::new();
    for (key, value) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            FieldValue::ServerTimestamp => server_timestamps.push(path),
            FieldValue::Map(inner) => {
                let inner = encode_map(inner, &path, server_timestamps);
                encoded.insert(key.clone(), json!({ "mapValue": { "fields": inner } }));
            }
            other => {
                encoded.insert(key.clone(), encode_value(other));
            }
        }
    }
    encoded
}

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null | FieldValue::ServerTimestamp => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        // int64 travels as a decimal string
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => {
            let fields: Map<String, Value> = fields
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode a REST value. Anything unrecognized becomes `Null`.
pub fn decode_value(value: &Value) -> FieldValue {
    let Some(object) = value.as_object() else {
        return FieldValue::Null;
    };
    let Some((kind, inner)) = object.iter().next() else {
        return FieldValue::Null;
    };

    match kind.as_str() {
        "booleanValue" => inner.as_bool().map_or(FieldValue::Null, FieldValue::Bool),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| inner.as_i64())
            .map_or(FieldValue::Null, FieldValue::Integer),
        "doubleValue" => inner.as_f64().map_or(FieldValue::Null, FieldValue::Double),
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map_or(FieldValue::Null, |s| FieldValue::String(s.to_string())),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or(FieldValue::Null, |ts| FieldValue::Timestamp(ts.with_timezone(&Utc))),
        "arrayValue" => FieldValue::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => FieldValue::Map(decode_fields(inner.get("fields"))),
        "geoPointValue" => {
            let mut point = Fields::new();
            for axis in ["latitude", "longitude"] {
                if let Some(v) = inner.get(axis).and_then(Value::as_f64) {
                    point.insert(axis.to_string(), FieldValue::Double(v));
                }
            }
            FieldValue::Map(point)
        }
        _ => FieldValue::Null,
    }
}

pub fn decode_fields(fields: Option<&Value>) -> Fields {
    fields
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(key, value)| (key.clone(), decode_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

/// A REST document resource with its last update time.
pub struct RawDocument {
    pub document: Document,
    pub update_time: Option<String>,
}

pub fn decode_document(resource: &Value) -> Option<RawDocument> {
    let name = resource.get("name")?.as_str()?;
    let id = name.rsplit('/').next()?;

    Some(RawDocument {
        document: Document::new(id, decode_fields(resource.get("fields"))),
        update_time: resource
            .get("updateTime")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_event_document() {
        let resource = json!({
            "name": "projects/p/databases/(default)/documents/events/abc123",
            "fields": {
                "title": { "stringValue": "Jazz Night" },
                "date": { "timestampValue": "2026-06-15T19:00:00Z" },
                "attendees": { "integerValue": "42" },
                "location": { "mapValue": { "fields": {
                    "name": { "stringValue": "Blue Note" }
                }}},
                "tags": { "arrayValue": { "values": [{ "stringValue": "music" }] } },
                "coordinates": { "geoPointValue": { "latitude": 40.7, "longitude": -74.0 } }
            },
            "updateTime": "2026-06-01T10:00:00.123456Z"
        });

        let raw = decode_document(&resource).unwrap();
        let doc = raw.document;

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.str("title"), Some("Jazz Night"));
        assert_eq!(
            doc.get("date"),
            Some(&FieldValue::Timestamp(Utc.with_ymd_and_hms(2026, 6, 15, 19, 0, 0).unwrap()))
        );
        assert_eq!(doc.get("attendees"), Some(&FieldValue::Integer(42)));
        assert_eq!(doc.strings("tags"), ["music"]);
        let location = doc.get("location").and_then(FieldValue::as_map).unwrap();
        assert_eq!(location.get("name").and_then(FieldValue::as_str), Some("Blue Note"));
        let coordinates = doc.get("coordinates").and_then(FieldValue::as_map).unwrap();
        assert_eq!(coordinates.get("latitude").and_then(FieldValue::as_f64), Some(40.7));
        assert_eq!(raw.update_time.as_deref(), Some("2026-06-01T10:00:00.123456Z"));
    }

    #[test]
    fn integers_are_encoded_as_strings() {
        assert_eq!(encode_value(&FieldValue::Integer(7)), json!({ "integerValue": "7" }));
    }

    #[test]
    fn empty_array_decodes_without_values_key() {
        let value = json!({ "arrayValue": {} });
        assert_eq!(decode_value(&value), FieldValue::Array(Vec::new()));
    }

    #[test]
    fn server_timestamps_become_transform_paths() {
        let mut location = Fields::new();
        location.insert("verifiedAt".into(), FieldValue::ServerTimestamp);
        location.insert("city".into(), "Metropolis".into());

        let mut fields = Fields::new();
        fields.insert("title".into(), "Jazz Night".into());
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);
        fields.insert("location".into(), FieldValue::Map(location));

        let encoded = encode_fields(&fields);

        assert_eq!(encoded.server_timestamps, ["createdAt", "location.verifiedAt"]);
        assert!(!encoded.fields.contains_key("createdAt"));
        assert_eq!(
            encoded.fields["location"],
            json!({ "mapValue": { "fields": { "city": { "stringValue": "Metropolis" } } } })
        );
    }
}
