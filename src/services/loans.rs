//! Loan management service

use chrono::{NaiveDate, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{Loan, LoanQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for `days` days (configured default when `None`)
    pub async fn borrow(&self, member_id: i32, book_id: i32, days: Option<u32>) -> AppResult<Loan> {
        let days = days.unwrap_or(self.config.default_period_days);
        if days == 0 || days > self.config.max_period_days {
            return Err(AppError::Validation(format!(
                "days must be between 1 and {}",
                self.config.max_period_days
            )));
        }

        let loan = self.repository.loans.create(member_id, book_id, days).await?;
        tracing::info!(
            loan_id = loan.id,
            member_id,
            book_id,
            due_date = %loan.due_date,
            "Book borrowed"
        );
        Ok(loan.evaluated(today()))
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.return_loan(loan_id).await?;
        tracing::info!(loan_id, book_id = loan.book_id, "Loan returned");
        Ok(loan.evaluated(today()))
    }

    pub async fn get_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        Ok(loan.evaluated(today()))
    }

    /// List loans; the overdue filter and flag are evaluated against today's date
    pub async fn list_loans(&self, query: &LoanQuery) -> AppResult<(Vec<Loan>, i64)> {
        let today = today();
        let (loans, total) = self.repository.loans.search(query, today).await?;
        Ok((loans.into_iter().map(|l| l.evaluated(today)).collect(), total))
    }

    /// Active loans of a member
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<Loan>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        let today = today();
        let loans = self.repository.loans.get_member_loans(member_id).await?;
        Ok(loans.into_iter().map(|l| l.evaluated(today)).collect())
    }
}
