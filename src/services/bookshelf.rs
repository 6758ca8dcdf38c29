//! Bookshelf management service.
//!
//! Every operation resolves its own failures into an [`AppError`] carrying
//! the client-facing message; handlers only relay the result. The validator
//! decides which failure is reported when several rules apply at once.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use snowflaked::sync::Generator;

use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::Repository,
    services::{
        filter,
        validation::{self, ValidationError},
    },
};

#[derive(Clone)]
pub struct BookshelfService {
    repository: Repository,
    ids: Arc<Generator>,
}

impl BookshelfService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            ids: Arc::new(Generator::new(0)),
        }
    }

    /// Add a new book. Returns the generated id.
    pub async fn create_book(&self, payload: &Map<String, Value>) -> AppResult<String> {
        validation::validate(payload, None).map_err(|e| rejection(e, "add"))?;

        let id = self.ids.generate::<u64>().to_string();
        let book = Book::from_payload(id.clone(), payload, Utc::now());
        tracing::debug!(id = %id, name = %book.name, "adding book");
        self.repository.books.insert(book).await;
        Ok(id)
    }

    /// List all books, or only those matching the query terms when any are
    /// present.
    pub async fn list_books(&self, terms: &IndexMap<String, String>) -> AppResult<Vec<Book>> {
        let books = self.repository.books.list().await;
        if terms.is_empty() {
            return Ok(books);
        }
        filter::filter_books(&books, terms)
    }

    /// Get a book by id
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Update an existing book.
    ///
    /// An unknown id reports 404 even when the payload is also invalid. On
    /// success the payload is merged over the stored record: absent fields
    /// keep their value, `updated_at` is refreshed, `inserted_at` and
    /// `finished` are left alone (see [`Book::apply_payload`]). Validation
    /// and merge run inside one write-lock critical section: validation
    /// reads the page counters it falls back on, so checking against a
    /// snapshot would let two concurrent updates interleave into a record
    /// no sequential order of them could produce.
    pub async fn update_book(&self, id: &str, payload: &Map<String, Value>) -> AppResult<()> {
        let outcome = self
            .repository
            .books
            .update_with(id, |book| {
                validation::validate(payload, Some(book))?;
                book.apply_payload(payload, Utc::now());
                Ok(())
            })
            .await;

        match outcome {
            None => Err(AppError::NotFound(
                "Failed to update book. Id not found".to_string(),
            )),
            Some(Err(error)) => Err(rejection(error, "update")),
            Some(Ok(())) => {
                tracing::debug!(id = %id, "updated book");
                Ok(())
            }
        }
    }

    /// Delete a book by id
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        if self.repository.books.remove(id).await {
            tracing::debug!(id = %id, "deleted book");
            Ok(())
        } else {
            Err(AppError::NotFound(
                "Failed to delete book. Id not found".to_string(),
            ))
        }
    }
}

/// Map a validation rejection to the operation-specific failure. `verb` is
/// "add" or "update" and only feeds the client-facing message.
fn rejection(error: ValidationError, verb: &str) -> AppError {
    match error {
        ValidationError::EmptyName => AppError::EmptyName(format!(
            "Failed to {} book. Please provide the book name",
            verb
        )),
        ValidationError::ReadPageExceedsPageCount => AppError::ReadPageExceedsPageCount(format!(
            "Failed to {} book. readPage must not exceed pageCount",
            verb
        )),
        ValidationError::TypeMismatch { field } => {
            tracing::warn!(field, "rejected {} payload: wrong value type", verb);
            AppError::TypeMismatch(format!("Failed to {} book", verb))
        }
    }
}
