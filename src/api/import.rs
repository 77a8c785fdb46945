//! CSV import and export endpoints

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;

use crate::{
    error::{AppError, AppResult},
    models::import_report::ImportSummary,
};

const UPLOAD_FIELD: &str = "file";

fn csv_attachment(filename: &str, body: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Import books from a CSV upload
///
/// Expected headers: `title,author,isbn,published_date,copies_total`.
/// Rows are upserted by ISBN; bad rows are reported without aborting the batch.
#[utoipa::path(
    post,
    path = "/import/books/csv",
    tag = "import",
    request_body(content = String, content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 200, description = "Import summary", body = ImportSummary),
        (status = 400, description = "No file uploaded")
    )
)]
pub async fn import_books_csv(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            data = Some(bytes);
            break;
        }
    }

    let data = data.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;

    let summary = state.services.import.import_csv(&data).await?;
    Ok(Json(summary))
}

/// Export the catalog as CSV
#[utoipa::path(
    get,
    path = "/export/books/csv",
    tag = "import",
    responses(
        (status = 200, description = "Catalog CSV", content_type = "text/csv", body = String)
    )
)]
pub async fn export_books_csv(State(state): State<crate::AppState>) -> AppResult<impl IntoResponse> {
    let body = state.services.import.export_books_csv().await?;
    Ok(csv_attachment("books.csv", body))
}

/// Export the most borrowed books as CSV
#[utoipa::path(
    get,
    path = "/export/analytics/csv",
    tag = "import",
    responses(
        (status = 200, description = "Top borrowed books CSV", content_type = "text/csv", body = String)
    )
)]
pub async fn export_analytics_csv(State(state): State<crate::AppState>) -> AppResult<impl IntoResponse> {
    let body = state.services.stats.export_analytics_csv().await?;
    Ok(csv_attachment("analytics_top_borrowed.csv", body))
}
