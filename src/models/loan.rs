//! Loan (borrow) model and related types

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Columns selected whenever a full `Loan` row is read
pub const LOAN_COLUMNS: &str = "id, member_id, book_id, borrowed_at, due_date, returned_at, active";

/// Loan lifecycle state. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Returned,
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub returned_at: Option<DateTime<Utc>>,
    pub active: bool,
    /// Computed when the loan is read, never stored
    #[sqlx(skip)]
    #[serde(default)]
    pub is_overdue: bool,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        if self.active {
            LoanStatus::Active
        } else {
            LoanStatus::Returned
        }
    }

    /// A loan is overdue while it is still active and its due date has passed
    pub fn overdue_on(&self, today: NaiveDate) -> bool {
        self.active && self.due_date < today
    }

    /// Fill in the computed `is_overdue` flag for the given day
    pub fn evaluated(mut self, today: NaiveDate) -> Self {
        self.is_overdue = self.overdue_on(today);
        self
    }
}

/// Due date of a loan started on `start` for `period_days` days
pub fn due_date_from(start: NaiveDate, period_days: u32) -> NaiveDate {
    start + Duration::days(i64::from(period_days))
}

/// Borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    pub member_id: i32,
    pub book_id: i32,
    /// Loan period in days (server default when omitted)
    #[validate(range(min = 1, message = "days must be at least 1"))]
    pub days: Option<u32>,
}

/// Loan listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LoanQuery {
    /// Only active (`true`) or only returned (`false`) loans
    pub active: Option<bool>,
    /// Only overdue (`true`) or only not-overdue (`false`) loans
    pub overdue: Option<bool>,
    pub member_id: Option<i32>,
    pub book_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(active: bool, due_date: NaiveDate) -> Loan {
        Loan {
            id: 1,
            member_id: 1,
            book_id: 1,
            borrowed_at: Utc::now(),
            due_date,
            returned_at: if active { None } else { Some(Utc::now()) },
            active,
            is_overdue: false,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_due_date() {
        assert_eq!(due_date_from(day(2024, 1, 25), 7), day(2024, 2, 1));
        assert_eq!(due_date_from(day(2024, 2, 20), 14), day(2024, 3, 5));
    }

    #[test]
    fn test_overdue_predicate() {
        let today = day(2024, 3, 10);
        assert!(loan(true, day(2024, 3, 9)).overdue_on(today));
        assert!(!loan(true, day(2024, 3, 10)).overdue_on(today));
        assert!(!loan(false, day(2024, 1, 1)).overdue_on(today));
    }

    #[test]
    fn test_evaluated_sets_flag() {
        let l = loan(true, day(2024, 3, 1)).evaluated(day(2024, 3, 2));
        assert!(l.is_overdue);
    }

    #[test]
    fn test_status() {
        assert_eq!(loan(true, day(2024, 1, 1)).status(), LoanStatus::Active);
        assert_eq!(loan(false, day(2024, 1, 1)).status(), LoanStatus::Returned);
    }
}
