//! CSV catalog import and export support

pub mod parser;

pub use parser::{parse_date, read_rows, ColumnMap, ImportRow};

use csv::Writer;

use crate::{error::AppResult, models::Book};

/// Header written by [`books_to_csv`]; readable back by the importer
pub const EXPORT_HEADER: [&str; 6] = [
    "title",
    "author",
    "isbn",
    "published_date",
    "copies_total",
    "copies_available",
];

/// Serialize the catalog in the importer's column layout
pub fn books_to_csv(books: &[Book]) -> AppResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for book in books {
        writer.write_record([
            book.title.clone(),
            book.author.clone(),
            book.isbn.clone().unwrap_or_default(),
            book.published_date.map(|d| d.to_string()).unwrap_or_default(),
            book.copies_total.to_string(),
            book.copies_available.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::error::AppError::Internal(format!("CSV flush failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_export_reads_back() {
        let books = vec![Book {
            id: 7,
            title: "Clean Code, 2nd".to_string(),
            author: "R. Martin".to_string(),
            isbn: Some("111".to_string()),
            published_date: NaiveDate::from_ymd_opt(2008, 8, 1),
            copies_total: 3,
            copies_available: 1,
            created_at: Utc::now(),
        }];
        let bytes = books_to_csv(&books).unwrap();
        let rows = read_rows(&bytes);
        assert_eq!(rows.len(), 1);
        let row = rows[0].1.as_ref().unwrap();
        assert_eq!(row.title.as_deref(), Some("Clean Code, 2nd"));
        assert_eq!(row.isbn.as_deref(), Some("111"));
        assert_eq!(row.published_date, NaiveDate::from_ymd_opt(2008, 8, 1));
        assert_eq!(row.copies_total, 3);
    }
}
