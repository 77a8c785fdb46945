//! Book (catalog entry) model and request types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::inventory::Stock;

/// Columns selected whenever a full `Book` row is read
pub const BOOK_COLUMNS: &str =
    "id, title, author, isbn, published_date, copies_total, copies_available, created_at";

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    /// Number of copies owned by the library
    pub copies_total: i32,
    /// Number of copies not currently on loan
    pub copies_available: i32,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn stock(&self) -> Stock {
        Stock::new(self.copies_total, self.copies_available)
    }
}

fn default_copies() -> i32 {
    1
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub title: String,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub author: String,
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    #[serde(default = "default_copies")]
    #[validate(range(min = 0, message = "copies_total must be >= 0"))]
    pub copies_total: i32,
}

/// Partial book update; absent fields are left untouched.
///
/// An empty `isbn` clears the identifier. Changing `copies_total` shifts
/// `copies_available` by the same delta (see [`Stock::resize`]).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "copies_total must be >= 0"))]
    pub copies_total: Option<i32>,
}

/// Book search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Matches title or author (case-insensitive substring)
    pub q: Option<String>,
    /// Matches author (case-insensitive substring)
    pub author: Option<String>,
    /// Exact ISBN
    pub isbn: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
