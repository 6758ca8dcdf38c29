//! Repository layer for in-memory storage

pub mod books;

/// Main repository struct holding the in-memory collections
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with empty collections
    pub fn new() -> Self {
        Self::default()
    }
}
