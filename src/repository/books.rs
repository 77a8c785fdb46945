//! Books repository for database operations

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    import::ImportRow,
    inventory::Stock,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook, BOOK_COLUMNS},
        import_report::ImportAction,
        non_empty, Pagination,
    },
};

use super::inventory;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a live book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1 AND archived_at IS NULL", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Catalogue a new book with every copy available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (title, author, isbn, published_date, copies_total, copies_available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let stock = Stock::fresh(book.copies_total);
        let created = sqlx::query_as::<_, Book>(&query)
            .bind(book.title.trim())
            .bind(book.author.trim())
            .bind(non_empty(book.isbn.as_deref()))
            .bind(book.published_date)
            .bind(stock.total)
            .bind(stock.available)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    /// Apply a partial update. A `copies_total` change goes through the
    /// inventory ledger so availability follows the new total.
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        inventory::lock_book(&mut tx, id).await?;
        if let Some(total) = update.copies_total {
            inventory::resize_total(&mut tx, id, total).await?;
        }

        let query = format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = CASE WHEN $4::text IS NULL THEN isbn ELSE NULLIF($4, '') END,
                published_date = COALESCE($5, published_date)
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(update.title.as_deref().map(str::trim))
            .bind(update.author.as_deref().map(str::trim))
            .bind(update.isbn.as_deref().map(str::trim))
            .bind(update.published_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Soft-delete a book. Refused while any loan on it is still active.
    ///
    /// The book row is locked first, the same lock a borrow takes, so no loan
    /// can be opened between the check and the delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        inventory::lock_book(&mut tx, id).await?;

        let active_loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1 AND active")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if active_loans > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete book {} with {} active loan(s)",
                id, active_loans
            )));
        }

        sqlx::query("UPDATE books SET archived_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Search live books, ordered by title
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books WHERE archived_at IS NULL");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM books WHERE archived_at IS NULL",
            BOOK_COLUMNS
        ));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY title, id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let books = select.build_query_as::<Book>().fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// All live books, for export
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books WHERE archived_at IS NULL ORDER BY id", BOOK_COLUMNS);
        let books = sqlx::query_as::<_, Book>(&query).fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Open a transaction for a batch import
    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    if let Some(q) = non_empty(query.q.as_deref()) {
        let pattern = format!("%{}%", q);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR author ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(author) = non_empty(query.author.as_deref()) {
        qb.push(" AND author ILIKE ").push_bind(format!("%{}%", author));
    }
    if let Some(isbn) = non_empty(query.isbn.as_deref()) {
        qb.push(" AND isbn = ").push_bind(isbn);
    }
}

/// Upsert one imported row by ISBN inside the caller's transaction.
///
/// A row whose ISBN matches a live book is merged: non-empty title/author are
/// adopted and the copy counters follow [`Stock::merge_import`]. Any other row
/// is catalogued as a new book.
pub async fn apply_import_row(conn: &mut PgConnection, row: &ImportRow) -> AppResult<(i32, ImportAction)> {
    if let Some(ref isbn) = row.isbn {
        let query = format!(
            "SELECT {} FROM books WHERE isbn = $1 AND archived_at IS NULL FOR UPDATE",
            BOOK_COLUMNS
        );
        let existing = sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(&mut *conn)
            .await?;

        if let Some(book) = existing {
            let merged = book.stock().merge_import(row.copies_total);
            inventory::write_stock(conn, book.id, merged).await?;
            sqlx::query(
                "UPDATE books SET title = COALESCE($2, title), author = COALESCE($3, author) WHERE id = $1",
            )
            .bind(book.id)
            .bind(row.title.as_deref())
            .bind(row.author.as_deref())
            .execute(&mut *conn)
            .await?;
            return Ok((book.id, ImportAction::Merged));
        }
    }

    let (title, author) = row.require_new_book().map_err(AppError::Validation)?;
    let stock = Stock::fresh(row.copies_total);
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO books (title, author, isbn, published_date, copies_total, copies_available)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(author)
    .bind(row.isbn.as_deref())
    .bind(row.published_date)
    .bind(stock.total)
    .bind(stock.available)
    .fetch_one(&mut *conn)
    .await?;
    Ok((id, ImportAction::Created))
}
