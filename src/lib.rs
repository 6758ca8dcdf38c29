//! Bookshelf Server
//!
//! A Rust REST JSON API for managing a book collection held in volatile
//! in-process storage. The collection lives for the process lifetime and is
//! intentionally lost on restart.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
