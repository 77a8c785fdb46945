//! Members repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{CreateMember, Member, MemberQuery},
        non_empty, Pagination,
    },
};

const MEMBER_COLUMNS: &str = "id, name, email, joined_at";

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        let query = format!("SELECT {} FROM members WHERE id = $1", MEMBER_COLUMNS);
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Register a member. A taken email surfaces as `DuplicateIdentifier`.
    pub async fn create(&self, member: &CreateMember) -> AppResult<Member> {
        let query = format!(
            "INSERT INTO members (name, email) VALUES ($1, $2) RETURNING {}",
            MEMBER_COLUMNS
        );
        let created = sqlx::query_as::<_, Member>(&query)
            .bind(member.name.trim())
            .bind(member.email.trim())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    /// Search members by name with pagination
    pub async fn search(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)> {
        let page = Pagination::new(query.page, query.per_page);
        let name = non_empty(query.name.as_deref()).map(|n| format!("%{}%", n));

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM members WHERE 1=1");
        if let Some(ref pattern) = name {
            count.push(" AND name ILIKE ").push_bind(pattern.clone());
        }
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM members WHERE 1=1", MEMBER_COLUMNS));
        if let Some(pattern) = name {
            select.push(" AND name ILIKE ").push_bind(pattern);
        }
        select
            .push(" ORDER BY name, id LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let members = select.build_query_as::<Member>().fetch_all(&self.pool).await?;

        Ok((members, total))
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
