//! Inventory ledger: row-locked copy accounting on the `books` table.
//!
//! Every function here runs on a connection that the caller has already put
//! inside a transaction. The book row is locked with `FOR UPDATE` before its
//! counters are read, so concurrent reservations on the same book queue behind
//! each other and each one sees the committed result of the previous one.

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    inventory::Stock,
    models::book::{Book, BOOK_COLUMNS},
};

/// Read a live book and hold its row lock until the transaction ends
pub async fn lock_book(conn: &mut PgConnection, book_id: i32) -> AppResult<Book> {
    let query = format!(
        "SELECT {} FROM books WHERE id = $1 AND archived_at IS NULL FOR UPDATE",
        BOOK_COLUMNS
    );
    sqlx::query_as::<_, Book>(&query)
        .bind(book_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))
}

/// Persist new counters for a book whose row is locked by this transaction
pub async fn write_stock(conn: &mut PgConnection, book_id: i32, stock: Stock) -> AppResult<Book> {
    if !stock.is_consistent() {
        return Err(AppError::Internal(format!(
            "Refusing inconsistent stock for book {}: {:?}",
            book_id, stock
        )));
    }
    let query = format!(
        "UPDATE books SET copies_total = $2, copies_available = $3 WHERE id = $1 RETURNING {}",
        BOOK_COLUMNS
    );
    let book = sqlx::query_as::<_, Book>(&query)
        .bind(book_id)
        .bind(stock.total)
        .bind(stock.available)
        .fetch_one(&mut *conn)
        .await?;
    Ok(book)
}

/// Take one copy of a book off the shelf
pub async fn reserve_copy(conn: &mut PgConnection, book_id: i32) -> AppResult<Book> {
    let book = lock_book(conn, book_id).await?;
    let stock = book.stock().reserve().ok_or_else(|| {
        AppError::OutOfStock(format!("No copies of book {} are available", book_id))
    })?;
    let book = write_stock(conn, book_id, stock).await?;
    tracing::debug!(book_id, available = book.copies_available, "Copy reserved");
    Ok(book)
}

/// Put one copy of a book back on the shelf
pub async fn release_copy(conn: &mut PgConnection, book_id: i32) -> AppResult<Book> {
    let book = lock_book(conn, book_id).await?;
    let stock = book.stock();
    if stock.available >= stock.total {
        tracing::warn!(book_id, "Release on a fully stocked book, availability left unchanged");
    }
    let book = write_stock(conn, book_id, stock.release()).await?;
    tracing::debug!(book_id, available = book.copies_available, "Copy released");
    Ok(book)
}

/// Change the number of owned copies, shifting availability by the same delta
pub async fn resize_total(conn: &mut PgConnection, book_id: i32, new_total: i32) -> AppResult<Book> {
    let book = lock_book(conn, book_id).await?;
    let before = book.stock();
    let after = before.resize(new_total);
    if before.on_loan() > after.total {
        tracing::warn!(
            book_id,
            on_loan = before.on_loan(),
            new_total,
            "Total reduced below copies on loan, availability clamped to zero"
        );
    }
    write_stock(conn, book_id, after).await
}
