//! Statistics service

use chrono::Utc;
use csv::Writer;

use crate::{
    api::stats::{MetricsResponse, TopBorrowed},
    error::{AppError, AppResult},
    repository::Repository,
};

/// Books listed in the metrics summary
const METRICS_TOP_N: i64 = 5;
/// Books listed in the analytics export
const EXPORT_TOP_N: i64 = 50;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Most borrowed live books, counting every loan ever opened on them
    pub async fn top_borrowed(&self, limit: i64) -> AppResult<Vec<TopBorrowed>> {
        let rows = sqlx::query_as::<_, TopBorrowed>(
            r#"
            SELECT b.id AS book_id, b.title, b.author, COUNT(l.id) AS count
            FROM books b
            JOIN loans l ON l.book_id = b.id
            WHERE b.archived_at IS NULL
            GROUP BY b.id, b.title, b.author
            ORDER BY COUNT(l.id) DESC, b.title
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(rows)
    }

    /// Catalog, membership and loan counters with the top borrowed books
    pub async fn metrics(&self) -> AppResult<MetricsResponse> {
        let total_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE archived_at IS NULL")
            .fetch_one(&self.repository.pool)
            .await?;
        let total_members = self.repository.members.count().await?;
        let active_loans = self.repository.loans.count_active().await?;
        let overdue_loans = self
            .repository
            .loans
            .count_overdue(Utc::now().date_naive())
            .await?;
        let top_borrowed = self.top_borrowed(METRICS_TOP_N).await?;

        Ok(MetricsResponse {
            total_books,
            total_members,
            active_loans,
            overdue_loans,
            top_borrowed,
        })
    }

    /// Top borrowed books as CSV (`title,author,borrow_count`)
    pub async fn export_analytics_csv(&self) -> AppResult<Vec<u8>> {
        let rows = self.top_borrowed(EXPORT_TOP_N).await?;
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(["title", "author", "borrow_count"])?;
        for row in rows {
            writer.write_record([row.title, row.author, row.count.to_string()])?;
        }
        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))
    }
}
