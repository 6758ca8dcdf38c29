//! Query filtering over the book collection.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

/// Select the books matching every query term (logical AND across terms).
///
/// Returns a fresh list each call, in the collection's own order; the input
/// slice is never mutated and term order does not affect the result set.
/// Zero terms is a caller bug and fails with [`AppError::EmptyQuery`].
pub fn filter_books(books: &[Book], terms: &IndexMap<String, String>) -> AppResult<Vec<Book>> {
    if terms.is_empty() {
        return Err(AppError::EmptyQuery);
    }

    Ok(books
        .iter()
        .filter(|book| matches_all_terms(book, terms))
        .cloned()
        .collect())
}

fn matches_all_terms(book: &Book, terms: &IndexMap<String, String>) -> bool {
    // Match against the serialized form so terms address wire field names
    // (`pageCount`, `insertedAt`, ...) exactly as clients see them.
    let fields = match serde_json::to_value(book) {
        Ok(Value::Object(map)) => map,
        _ => return false,
    };

    terms.iter().all(|(field, term)| {
        fields
            .get(field)
            .map_or(false, |value| matches_term(value, term))
    })
}

/// Single-term matching with an explicit three-branch coercion precedence:
/// numeric equality when the field is a number, boolean-flag equality
/// (`0`/`1`/`true`/`false`) when it is a boolean, and case-insensitive
/// substring containment on the stringified field otherwise. A term that
/// does not parse for the first two branches falls through to substring
/// matching.
fn matches_term(field: &Value, term: &str) -> bool {
    let term = term.to_lowercase();
    match field {
        Value::Number(n) => {
            if let Ok(wanted) = term.parse::<f64>() {
                return n.as_f64() == Some(wanted);
            }
            contains_ci(&n.to_string(), &term)
        }
        Value::Bool(b) => match parse_bool_flag(&term) {
            Some(wanted) => *b == wanted,
            None => contains_ci(if *b { "true" } else { "false" }, &term),
        },
        Value::String(s) => contains_ci(s, &term),
        other => contains_ci(&other.to_string(), &term),
    }
}

fn parse_bool_flag(term: &str) -> Option<bool> {
    match term {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn book(name: &str, year: i32, page_count: u32, read_page: u32, reading: bool) -> Book {
        let payload = match json!({
            "name": name,
            "year": year,
            "author": "Author",
            "summary": "Summary",
            "publisher": "Publisher",
            "pageCount": page_count,
            "readPage": read_page,
            "reading": reading
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Book::from_payload(name.to_lowercase(), &payload, Utc::now())
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("Dune", 1965, 500, 500, false),
            book("Dune Messiah", 1969, 256, 100, true),
            book("Neuromancer", 1984, 271, 0, false),
        ]
    }

    fn terms(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_query_is_an_error() {
        let result = filter_books(&shelf(), &IndexMap::new());
        assert!(matches!(result, Err(AppError::EmptyQuery)));
    }

    #[test]
    fn test_name_substring_is_case_insensitive() {
        let found = filter_books(&shelf(), &terms(&[("name", "dUn")])).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Dune");
        assert_eq!(found[1].name, "Dune Messiah");
    }

    #[test]
    fn test_boolean_flag_terms() {
        let reading = filter_books(&shelf(), &terms(&[("reading", "1")])).unwrap();
        assert_eq!(reading.len(), 1);
        assert_eq!(reading[0].name, "Dune Messiah");

        let finished = filter_books(&shelf(), &terms(&[("finished", "0")])).unwrap();
        assert_eq!(finished.len(), 2);

        let spelled = filter_books(&shelf(), &terms(&[("reading", "true")])).unwrap();
        assert_eq!(spelled.len(), 1);
    }

    #[test]
    fn test_numeric_terms_compare_by_equality() {
        let found = filter_books(&shelf(), &terms(&[("year", "1965")])).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dune");

        let none = filter_books(&shelf(), &terms(&[("year", "196")])).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_terms_combine_with_and() {
        let found = filter_books(&shelf(), &terms(&[("name", "dune"), ("reading", "0")])).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dune");
    }

    #[test]
    fn test_term_order_is_irrelevant() {
        let books = shelf();
        let ab = filter_books(&books, &terms(&[("name", "dune"), ("year", "1969")])).unwrap();
        let ba = filter_books(&books, &terms(&[("year", "1969"), ("name", "dune")])).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 1);
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let found = filter_books(&shelf(), &terms(&[("shelfmark", "x")])).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_collection_is_not_mutated() {
        let books = shelf();
        let before = books.clone();
        let _ = filter_books(&books, &terms(&[("name", "dune")])).unwrap();
        assert_eq!(books, before);
    }
}
