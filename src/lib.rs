//! E-Library Management Backend
//!
//! Tracks books, members and loans behind a REST JSON API. Copy accounting is
//! kept consistent under concurrent borrows by row-locked transactions, and
//! catalogs can be bulk-loaded from CSV with a merge-by-ISBN upsert.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod inventory;
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
