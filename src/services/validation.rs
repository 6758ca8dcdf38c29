//! Write-time validation of book payloads.
//!
//! Validation inspects only the recognized fields that are actually present
//! in the payload; absent optional fields never fail. The rules run in a
//! fixed priority order because the name and page-counter rules are the
//! product-level guarantees clients rely on for error-message fidelity, so
//! they must win over a type error wherever both apply.

use serde_json::{Map, Value};

use crate::models::Book;

/// Semantic type expected for a recognized payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

/// Recognized writable fields, keyed by wire name.
pub const RECOGNIZED_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::String),
    ("year", FieldKind::Number),
    ("author", FieldKind::String),
    ("summary", FieldKind::String),
    ("publisher", FieldKind::String),
    ("pageCount", FieldKind::Number),
    ("readPage", FieldKind::Number),
    ("reading", FieldKind::Boolean),
];

/// Why a payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    ReadPageExceedsPageCount,
    TypeMismatch { field: &'static str },
}

/// Decide whether `payload` may be written. First matching rule wins:
///
/// 1. `name` absent, empty, or otherwise unusable;
/// 2. effective `readPage` greater than effective `pageCount`;
/// 3. a recognized field present with a value of the wrong type.
///
/// On update, `current` supplies the stored page counters for rule 2 when
/// the payload carries only one side of the comparison; on create both
/// counters default to zero. A present but non-numeric counter skips rule 2
/// and is reported by rule 3 instead.
pub fn validate(
    payload: &Map<String, Value>,
    current: Option<&Book>,
) -> Result<(), ValidationError> {
    if !name_is_usable(payload.get("name")) {
        return Err(ValidationError::EmptyName);
    }

    let read_page = effective_counter(payload, "readPage", current.map(|b| b.read_page));
    let page_count = effective_counter(payload, "pageCount", current.map(|b| b.page_count));
    if let (Some(read_page), Some(page_count)) = (read_page, page_count) {
        if read_page > page_count {
            return Err(ValidationError::ReadPageExceedsPageCount);
        }
    }

    for (field, kind) in RECOGNIZED_FIELDS.iter().copied() {
        if let Some(value) = payload.get(field) {
            if !matches_kind(field, value, kind) {
                return Err(ValidationError::TypeMismatch { field });
            }
        }
    }

    Ok(())
}

/// Rule 1 rejects anything "falsy": absent, null, the empty string,
/// `false`, or numeric zero. A truthy non-string (e.g. a number) passes
/// here and is reported as a type mismatch by rule 3.
fn name_is_usable(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

/// Page counter used for rule 2: payload value when present and numeric,
/// otherwise the stored value (update) or zero (create). `None` means the
/// payload carries a malformed value and rule 2 must stand aside.
fn effective_counter(
    payload: &Map<String, Value>,
    field: &str,
    current: Option<u32>,
) -> Option<u64> {
    match payload.get(field) {
        Some(value) => value.as_u64(),
        None => Some(u64::from(current.unwrap_or(0))),
    }
}

fn matches_kind(field: &str, value: &Value, kind: FieldKind) -> bool {
    match kind {
        FieldKind::String => value.is_string(),
        // Page counters must be non-negative integers that fit the stored
        // width; `year` accepts any JSON number.
        FieldKind::Number => match field {
            "pageCount" | "readPage" => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .is_some(),
            _ => value.is_number(),
        },
        FieldKind::Boolean => value.is_boolean(),
    }
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
    fn test_accepts_minimal_payload() {
        let map = payload(json!({ "name": "Dune" }));
        assert_eq!(validate(&map, None), Ok(()));
    }

    #[test]
    fn test_rejects_missing_name() {
        let map = payload(json!({ "year": 1965 }));
        assert_eq!(validate(&map, None), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_rejects_empty_and_falsy_name() {
        for name in [json!(""), json!(null), json!(false), json!(0)] {
            let map = payload(json!({ "name": name }));
            assert_eq!(validate(&map, None), Err(ValidationError::EmptyName));
        }
    }

    #[test]
    fn test_rejects_read_page_over_page_count() {
        let map = payload(json!({ "name": "Dune", "pageCount": 100, "readPage": 101 }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::ReadPageExceedsPageCount)
        );
    }

    #[test]
    fn test_empty_name_wins_over_page_overflow() {
        let map = payload(json!({ "pageCount": 100, "readPage": 101 }));
        assert_eq!(validate(&map, None), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_page_overflow_wins_over_type_mismatch() {
        let map = payload(json!({
            "name": "Dune",
            "year": "not a number",
            "pageCount": 100,
            "readPage": 101
        }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::ReadPageExceedsPageCount)
        );
    }

    #[test]
    fn test_rejects_wrong_field_types() {
        let map = payload(json!({ "name": "Dune", "reading": "yes" }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::TypeMismatch { field: "reading" })
        );

        let map = payload(json!({ "name": 42 }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::TypeMismatch { field: "name" })
        );

        let map = payload(json!({ "name": "Dune", "pageCount": -5 }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::TypeMismatch { field: "pageCount" })
        );
    }

    #[test]
    fn test_rejects_counters_wider_than_stored_width() {
        // u32::MAX + 101: accepted as a u64 but not storable as u32
        let map = payload(json!({
            "name": "Dune",
            "pageCount": 4_294_967_396_u64,
            "readPage": 200
        }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::TypeMismatch { field: "pageCount" })
        );
    }

    #[test]
    fn test_unrecognized_fields_are_ignored() {
        let map = payload(json!({ "name": "Dune", "rating": { "stars": 5 } }));
        assert_eq!(validate(&map, None), Ok(()));
    }

    #[test]
    fn test_update_uses_stored_page_count_as_fallback() {
        let stored = Book::from_payload(
            "1".to_string(),
            &payload(json!({ "name": "Dune", "pageCount": 500, "readPage": 400 })),
            chrono::Utc::now(),
        );

        let map = payload(json!({ "name": "Dune", "readPage": 600 }));
        assert_eq!(
            validate(&map, Some(&stored)),
            Err(ValidationError::ReadPageExceedsPageCount)
        );

        let map = payload(json!({ "name": "Dune", "readPage": 450 }));
        assert_eq!(validate(&map, Some(&stored)), Ok(()));
    }

    #[test]
    fn test_create_read_page_without_page_count_overflows_zero() {
        let map = payload(json!({ "name": "Dune", "readPage": 5 }));
        assert_eq!(
            validate(&map, None),
            Err(ValidationError::ReadPageExceedsPageCount)
        );
    }
}
