//! CSV catalog parser
//!
//! Turns an uploaded CSV document into [`ImportRow`]s. Every data row is
//! parsed independently: a bad cell fails that row only.

use chrono::{DateTime, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::str::FromStr;

const TITLE_ALIASES: &[&str] = &["title"];
const AUTHOR_ALIASES: &[&str] = &["author", "authors"];
const ISBN_ALIASES: &[&str] = &["isbn", "isbn13"];
const DATE_ALIASES: &[&str] = &["published_date", "publication_date", "published"];
const COPIES_ALIASES: &[&str] = &["copies_total", "copies", "quantity"];

/// Header position of every recognized column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: Option<usize>,
    pub author: Option<usize>,
    pub isbn: Option<usize>,
    pub published_date: Option<usize>,
    pub copies_total: Option<usize>,
}

impl ColumnMap {
    /// Match header names case-insensitively against the alias table.
    /// The first matching header wins; unknown headers are ignored.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let find = |aliases: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                aliases.iter().any(|a| *a == h)
            })
        };
        Self {
            title: find(TITLE_ALIASES),
            author: find(AUTHOR_ALIASES),
            isbn: find(ISBN_ALIASES),
            published_date: find(DATE_ALIASES),
            copies_total: find(COPIES_ALIASES),
        }
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: Option<usize>) -> Option<&'r str> {
        column
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// One catalog row as read from the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub copies_total: i32,
}

impl ImportRow {
    /// Title and author needed to catalogue a new book from this row
    pub fn require_new_book(&self) -> Result<(&str, &str), String> {
        let title = self
            .title
            .as_deref()
            .ok_or_else(|| "missing required field 'title'".to_string())?;
        let author = self
            .author
            .as_deref()
            .ok_or_else(|| "missing required field 'author'".to_string())?;
        Ok((title, author))
    }
}

/// Parse one record against the header map
pub fn parse_record(columns: &ColumnMap, record: &StringRecord) -> Result<ImportRow, String> {
    let copies_total = match columns.cell(record, columns.copies_total) {
        None => 1,
        Some(raw) => {
            let n = i32::from_str(raw)
                .map_err(|_| format!("invalid copies_total '{}': not an integer", raw))?;
            if n < 0 {
                return Err(format!("invalid copies_total '{}': must be >= 0", raw));
            }
            n
        }
    };

    let published_date = columns
        .cell(record, columns.published_date)
        .map(parse_date)
        .transpose()?;

    Ok(ImportRow {
        title: columns.cell(record, columns.title).map(str::to_string),
        author: columns.cell(record, columns.author).map(str::to_string),
        isbn: columns.cell(record, columns.isbn).map(str::to_string),
        published_date,
        copies_total,
    })
}

/// Parse a publication date: ISO 8601 date, then ISO 8601 date-time (date
/// part kept), then a plain `%Y-%m-%d` fallback.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::from_str(raw) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::from_str(raw) {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid published_date '{}': {}", raw, e))
}

/// Read a whole CSV document. Each entry is the 1-based data row number and
/// the parse outcome for that row. A header that cannot be read yields a
/// single error at row 0.
pub fn read_rows(data: &[u8]) -> Vec<(usize, Result<ImportRow, String>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let columns = match reader.headers() {
        Ok(headers) => ColumnMap::from_headers(headers),
        Err(e) => return vec![(0, Err(format!("unreadable CSV header: {}", e)))],
    };

    reader
        .records()
        .enumerate()
        .map(|(i, record)| {
            let parsed = record
                .map_err(|e| format!("malformed CSV record: {}", e))
                .and_then(|r| parse_record(&columns, &r));
            (i + 1, parsed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_column_aliases_case_insensitive() {
        let map = ColumnMap::from_headers(&record(&["Title", "AUTHOR", "ISBN", "Published", "Copies"]));
        assert_eq!(
            map,
            ColumnMap {
                title: Some(0),
                author: Some(1),
                isbn: Some(2),
                published_date: Some(3),
                copies_total: Some(4),
            }
        );
    }

    #[test]
    fn test_unknown_headers_ignored() {
        let map = ColumnMap::from_headers(&record(&["shelf", "title"]));
        assert_eq!(map.title, Some(1));
        assert_eq!(map.author, None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2008, 8, 1).unwrap();
        assert_eq!(parse_date("2008-08-01"), Ok(expected));
        assert_eq!(parse_date(" 2008-08-01 "), Ok(expected));
        assert_eq!(parse_date("2008-08-01T10:00:00Z"), Ok(expected));
        assert_eq!(parse_date("2008-08-01T10:00:00"), Ok(expected));
        assert!(parse_date("01/08/2008").is_err());
        assert!(parse_date("2008-13-01").is_err());
    }

    #[test]
    fn test_copies_default_and_errors() {
        let map = ColumnMap::from_headers(&record(&["title", "author", "copies_total"]));

        let row = parse_record(&map, &record(&["A", "B", ""])).unwrap();
        assert_eq!(row.copies_total, 1);

        let err = parse_record(&map, &record(&["A", "B", "three"])).unwrap_err();
        assert!(err.contains("copies_total"));

        assert!(parse_record(&map, &record(&["A", "B", "-1"])).is_err());
    }

    #[test]
    fn test_require_new_book() {
        let map = ColumnMap::from_headers(&record(&["title", "author", "isbn"]));
        let row = parse_record(&map, &record(&["", "Someone", "42"])).unwrap();
        assert_eq!(row.isbn.as_deref(), Some("42"));
        assert!(row.require_new_book().unwrap_err().contains("title"));

        let row = parse_record(&map, &record(&["Clean Code", "R. Martin", ""])).unwrap();
        assert_eq!(row.isbn, None);
        assert_eq!(row.require_new_book(), Ok(("Clean Code", "R. Martin")));
    }

    #[test]
    fn test_read_rows_isolates_failures() {
        let csv = "title,author,isbn,published_date,copies_total\n\
                   Clean Code,R. Martin,111,2008-08-01,2\n\
                   Broken,Someone,222,not-a-date,1\n\
                   Refactoring,M. Fowler,,1999-07-08,x\n\
                   DDIA,M. Kleppmann,333,,5\n";
        let rows = read_rows(csv.as_bytes());
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[0].1.as_ref().unwrap().copies_total, 2);

        assert_eq!(rows[1].0, 2);
        assert!(rows[1].1.as_ref().unwrap_err().contains("published_date"));

        assert_eq!(rows[2].0, 3);
        assert!(rows[2].1.is_err());

        let last = rows[3].1.as_ref().unwrap();
        assert_eq!(last.published_date, None);
        assert_eq!(last.copies_total, 5);
    }

    #[test]
    fn test_read_rows_empty_document() {
        assert!(read_rows(b"").is_empty());
        assert!(read_rows(b"title,author\n").is_empty());
    }
}
