//! Repository layer for database operations

pub mod books;
pub mod inventory;
pub mod loans;
pub mod members;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Insert demo members and books into empty tables. Safe to run on every start.
    pub async fn seed_demo_data(&self) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&mut *tx)
            .await?;
        if members == 0 {
            sqlx::query(
                "INSERT INTO members (name, email) VALUES ('Alice', 'alice@example.com'), ('Bob', 'bob@example.com')",
            )
            .execute(&mut *tx)
            .await?;
            tracing::info!("Seeded demo members");
        }

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *tx)
            .await?;
        if books == 0 {
            sqlx::query(
                r#"
                INSERT INTO books (title, author, isbn, copies_total, copies_available) VALUES
                    ('Data Engineering with Python', 'J. Reader', '978-1111111111', 3, 3),
                    ('Designing Data-Intensive Applications', 'Martin Kleppmann', '978-0980000000', 2, 2)
                "#,
            )
            .execute(&mut *tx)
            .await?;
            tracing::info!("Seeded demo books");
        }

        tx.commit().await?;
        Ok(())
    }
}
