//! Business logic services

pub mod bookshelf;
pub mod filter;
pub mod validation;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub bookshelf: bookshelf::BookshelfService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            bookshelf: bookshelf::BookshelfService::new(repository),
        }
    }
}
