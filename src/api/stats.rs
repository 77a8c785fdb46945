//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Metrics response
#[derive(Serialize, ToSchema)]
pub struct MetricsResponse {
    /// Live books in the catalog
    pub total_books: i64,
    /// Registered members
    pub total_members: i64,
    /// Loans not yet returned
    pub active_loans: i64,
    /// Active loans past their due date
    pub overdue_loans: i64,
    /// Most borrowed books
    pub top_borrowed: Vec<TopBorrowed>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopBorrowed {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    /// Number of loans ever opened on the book
    pub count: i64,
}

/// Get library metrics
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "stats",
    responses(
        (status = 200, description = "Library metrics", body = MetricsResponse)
    )
)]
pub async fn get_metrics(State(state): State<crate::AppState>) -> AppResult<Json<MetricsResponse>> {
    let metrics = state.services.stats.metrics().await?;
    Ok(Json(metrics))
}
