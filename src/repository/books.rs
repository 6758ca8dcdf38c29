//! In-memory book storage.
//!
//! The collection lives for the process lifetime and is lost on restart;
//! that is by contract, not an oversight. Insertion order is preserved so
//! listings come back in the order books were added.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::models::Book;

/// Sole owner of the book collection.
///
/// axum serves requests concurrently, so every access goes through the
/// `RwLock`. Check-and-write mutations run through [`Self::update_with`],
/// whose closure executes inside a single write-lock critical section, so
/// no request ever observes a partially-applied or interleaved write.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<IndexMap<String, Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, book: Book) {
        self.books.write().await.insert(book.id.clone(), book);
    }

    pub async fn get(&self, id: &str) -> Option<Book> {
        self.books.read().await.get(id).cloned()
    }

    /// All books, insertion order preserved
    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.values().cloned().collect()
    }

    /// Run `mutate` on the stored record inside one write-lock critical
    /// section, so the caller's check and write cannot interleave with
    /// another request's. Returns `None` if the id is unknown (the closure
    /// never runs), otherwise the closure's own result.
    pub async fn update_with<F, E>(&self, id: &str, mutate: F) -> Option<Result<(), E>>
    where
        F: FnOnce(&mut Book) -> Result<(), E>,
    {
        self.books.write().await.get_mut(id).map(mutate)
    }

    /// Remove a record. Returns `false` if the id is unknown; a failed
    /// removal leaves the collection untouched.
    pub async fn remove(&self, id: &str) -> bool {
        // shift_remove keeps the remaining insertion order intact
        self.books.write().await.shift_remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }
}
