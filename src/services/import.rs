//! CSV import / export service

use sqlx::Connection;

use crate::{
    error::{AppError, AppResult},
    import::{books_to_csv, read_rows},
    models::import_report::ImportSummary,
    repository::{books::apply_import_row, Repository},
};

#[derive(Clone)]
pub struct ImportService {
    repository: Repository,
}

/// Message stored in a row error, without the error-kind prefix for row-level failures
fn row_error_message(err: &AppError) -> String {
    match err {
        AppError::Validation(msg) | AppError::NotFound(msg) | AppError::DuplicateIdentifier(msg) => {
            msg.clone()
        }
        other => other.to_string(),
    }
}

impl ImportService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Import a CSV catalog, upserting rows by ISBN.
    ///
    /// Rows are applied inside a single transaction that commits once at the
    /// end. Each row runs in its own savepoint: a failing row is rolled back to
    /// that savepoint and reported, while the rows before and after it stay in
    /// the batch.
    pub async fn import_csv(&self, data: &[u8]) -> AppResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        let rows = read_rows(data);
        let mut tx = self.repository.books.begin().await?;

        for (row_no, parsed) in rows {
            let row = match parsed {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!(row = row_no, error = %e, "Skipping unparsable CSV row");
                    summary.fail(row_no, e);
                    continue;
                }
            };

            let mut savepoint = Connection::begin(&mut *tx).await?;
            match apply_import_row(&mut savepoint, &row).await {
                Ok((book_id, action)) => {
                    savepoint.commit().await?;
                    tracing::debug!(row = row_no, book_id, ?action, "Imported CSV row");
                    summary.record(action);
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    tracing::debug!(row = row_no, error = %e, "CSV row rejected");
                    summary.fail(row_no, row_error_message(&e));
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            created = summary.created,
            merged = summary.merged,
            failed = summary.errors.len(),
            "CSV import finished"
        );
        Ok(summary)
    }

    /// Export the live catalog as CSV
    pub async fn export_books_csv(&self) -> AppResult<Vec<u8>> {
        let books = self.repository.books.list_all().await?;
        books_to_csv(&books)
    }
}
