//! Data models for the E-Library server

pub mod book;
pub mod import_report;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookQuery, CreateBook, UpdateBook};
pub use import_report::{ImportSummary, RowImportError};
pub use loan::{Loan, LoanQuery, LoanStatus};
pub use member::{CreateMember, Member, MemberQuery};

use validator::ValidationError;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;
/// Highest page whose offset still fits in an `i64`
const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Normalized page window derived from optional `page`/`per_page` query values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Trims a value and maps empty strings to `None`
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::new(None, None);
        assert_eq!(p, Pagination { page: 1, per_page: 20 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::new(Some(0), Some(1000));
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 100);

        let p = Pagination::new(Some(3), Some(-5));
        assert_eq!(p.per_page, 1);
        assert_eq!(p.offset(), 2);
    }

    #[test]
    fn test_pagination_huge_page() {
        let p = Pagination::new(Some(i64::MAX), Some(20));
        assert_eq!(p.page, MAX_PAGE);
        assert!(p.offset() >= 0);

        let p = Pagination::new(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(p.per_page, 100);
        assert!(p.offset() >= 0);
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Clean Code").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  111 ")), Some("111".to_string()));
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(None), None);
    }
}
