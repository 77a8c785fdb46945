//! Loans repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{due_date_from, Loan, LoanQuery, LoanStatus, LOAN_COLUMNS},
        Pagination,
    },
};

use super::inventory;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        let query = format!("SELECT {} FROM loans WHERE id = $1", LOAN_COLUMNS);
        sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Borrow a copy: reserve it in the inventory ledger and open the loan in
    /// one transaction. Either both are committed or neither is.
    pub async fn create(&self, member_id: i32, book_id: i32, period_days: u32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let member_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
            .bind(member_id)
            .fetch_one(&mut *tx)
            .await?;
        if !member_exists {
            return Err(AppError::NotFound(format!("Member with id {} not found", member_id)));
        }

        inventory::reserve_copy(&mut tx, book_id).await?;

        let now = Utc::now();
        let due_date = due_date_from(now.date_naive(), period_days);

        let query = format!(
            r#"
            INSERT INTO loans (member_id, book_id, borrowed_at, due_date, active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        );
        let loan = sqlx::query_as::<_, Loan>(&query)
            .bind(member_id)
            .bind(book_id)
            .bind(now)
            .bind(due_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Close an active loan and release its copy in one transaction.
    ///
    /// The loan row is locked before its state is checked, so two concurrent
    /// returns of the same loan cannot both release a copy.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let query = format!("SELECT {} FROM loans WHERE id = $1 FOR UPDATE", LOAN_COLUMNS);
        let loan = sqlx::query_as::<_, Loan>(&query)
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if loan.status() == LoanStatus::Returned {
            return Err(AppError::Conflict(format!("Loan {} already closed", loan_id)));
        }

        let query = format!(
            "UPDATE loans SET active = FALSE, returned_at = $2 WHERE id = $1 RETURNING {}",
            LOAN_COLUMNS
        );
        let closed = sqlx::query_as::<_, Loan>(&query)
            .bind(loan_id)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        inventory::release_copy(&mut tx, closed.book_id).await?;

        tx.commit().await?;
        Ok(closed)
    }

    /// List loans with filters, most recent first
    pub async fn search(&self, query: &LoanQuery, today: NaiveDate) -> AppResult<(Vec<Loan>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM loans WHERE 1=1");
        push_filters(&mut count, query, today);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM loans WHERE 1=1", LOAN_COLUMNS));
        push_filters(&mut select, query, today);
        select
            .push(" ORDER BY borrowed_at DESC, id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let loans = select.build_query_as::<Loan>().fetch_all(&self.pool).await?;

        Ok((loans, total))
    }

    /// Active loans of a member, oldest due date first
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<Loan>> {
        let query = format!(
            "SELECT {} FROM loans WHERE member_id = $1 AND active ORDER BY due_date, id",
            LOAN_COLUMNS
        );
        let loans = sqlx::query_as::<_, Loan>(&query)
            .bind(member_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count overdue loans
    pub async fn count_overdue(&self, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE active AND due_date < $1")
            .bind(today)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &LoanQuery, today: NaiveDate) {
    if let Some(active) = query.active {
        qb.push(" AND active = ").push_bind(active);
    }
    match query.overdue {
        Some(true) => {
            qb.push(" AND active AND due_date < ").push_bind(today);
        }
        Some(false) => {
            qb.push(" AND NOT (active AND due_date < ").push_bind(today).push(")");
        }
        None => {}
    }
    if let Some(member_id) = query.member_id {
        qb.push(" AND member_id = ").push_bind(member_id);
    }
    if let Some(book_id) = query.book_id {
        qb.push(" AND book_id = ").push_bind(book_id);
    }
}
