//! Book model and payload application.
//!
//! Write payloads arrive as raw JSON objects so that validation can run its
//! rules in a fixed priority order before anything is coerced into typed
//! fields (see [`crate::services::validation`]). The helpers here turn a
//! payload that already passed validation into a stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A single bookshelf record. Serialized with camelCase field names and
/// ISO-8601 timestamps; every field is always present on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque unique id, immutable after creation
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    /// Derived: `page_count == read_page`, computed at creation
    pub finished: bool,
    /// Set once at creation, never changes
    pub inserted_at: DateTime<Utc>,
    /// Refreshed on every successful update
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated payload.
    ///
    /// Fields absent from the payload default to zero / empty / `false` so
    /// the stored record is always fully populated. `finished` is derived
    /// from the page counters here and nowhere else.
    pub fn from_payload(id: String, payload: &Map<String, Value>, now: DateTime<Utc>) -> Self {
        let page_count = counter_field(payload, "pageCount");
        let read_page = counter_field(payload, "readPage");
        Self {
            id,
            name: string_field(payload, "name"),
            year: payload
                .get("year")
                .and_then(Value::as_f64)
                .unwrap_or(0.0) as i32,
            author: string_field(payload, "author"),
            summary: string_field(payload, "summary"),
            publisher: string_field(payload, "publisher"),
            page_count,
            read_page,
            reading: payload
                .get("reading")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            finished: page_count == read_page,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Merge a validated payload over this record.
    ///
    /// Fields absent from the payload keep their current value; `id` and
    /// `inserted_at` are never touched. `finished` is intentionally left as
    /// derived at creation: an update that changes the page counters does
    /// not refresh it. This mirrors the behavior of the system this server
    /// replaces and is a deliberate, documented choice (see DESIGN.md).
    pub fn apply_payload(&mut self, payload: &Map<String, Value>, now: DateTime<Utc>) {
        if let Some(v) = payload.get("name").and_then(Value::as_str) {
            self.name = v.to_string();
        }
        if let Some(v) = payload.get("year").and_then(Value::as_f64) {
            self.year = v as i32;
        }
        if let Some(v) = payload.get("author").and_then(Value::as_str) {
            self.author = v.to_string();
        }
        if let Some(v) = payload.get("summary").and_then(Value::as_str) {
            self.summary = v.to_string();
        }
        if let Some(v) = payload.get("publisher").and_then(Value::as_str) {
            self.publisher = v.to_string();
        }
        if let Some(v) = payload
            .get("pageCount")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
        {
            self.page_count = v;
        }
        if let Some(v) = payload
            .get("readPage")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
        {
            self.read_page = v;
        }
        if let Some(v) = payload.get("reading").and_then(Value::as_bool) {
            self.reading = v;
        }
        self.updated_at = now;
    }
}

fn string_field(payload: &Map<String, Value>, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// Validation already guarantees present counters fit u32; the checked
// conversion keeps that contract visible instead of truncating.
fn counter_field(payload: &Map<String, Value>, field: &str) -> u32 {
    payload
        .get(field)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn test_from_payload_derives_finished() {
        let now = Utc::now();
        let map = payload(json!({
            "name": "Dune",
            "pageCount": 500,
            "readPage": 500
        }));
        let book = Book::from_payload("1".to_string(), &map, now);
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[test]
    fn test_from_payload_defaults_absent_fields() {
        let now = Utc::now();
        let map = payload(json!({ "name": "Dune" }));
        let book = Book::from_payload("1".to_string(), &map, now);
        assert_eq!(book.year, 0);
        assert_eq!(book.author, "");
        assert_eq!(book.page_count, 0);
        assert!(!book.reading);
        assert!(book.finished); // 0 == 0
    }

    #[test]
    fn test_apply_payload_preserves_absent_fields() {
        let created = Utc::now();
        let map = payload(json!({
            "name": "Dune",
            "author": "Herbert",
            "pageCount": 500,
            "readPage": 10
        }));
        let mut book = Book::from_payload("1".to_string(), &map, created);

        let update = payload(json!({ "name": "Dune Messiah", "readPage": 42 }));
        let later = created + chrono::Duration::seconds(5);
        book.apply_payload(&update, later);

        assert_eq!(book.name, "Dune Messiah");
        assert_eq!(book.read_page, 42);
        assert_eq!(book.author, "Herbert");
        assert_eq!(book.page_count, 500);
        assert_eq!(book.inserted_at, created);
        assert_eq!(book.updated_at, later);
    }

    #[test]
    fn test_apply_payload_does_not_recompute_finished() {
        let now = Utc::now();
        let map = payload(json!({ "name": "Dune", "pageCount": 500, "readPage": 500 }));
        let mut book = Book::from_payload("1".to_string(), &map, now);
        assert!(book.finished);

        let update = payload(json!({ "name": "Dune", "readPage": 100 }));
        book.apply_payload(&update, now);
        assert!(book.finished, "finished is only derived at creation");
    }
}
