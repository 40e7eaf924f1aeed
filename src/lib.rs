//! Libris Digital Library Lending System
//!
//! Tracks a book catalog, registered users and the loans between them,
//! with an append-only lending history, behind a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, LibraryError, LibraryResult};
pub use services::LibraryService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
