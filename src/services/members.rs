//! Member management service

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member, MemberQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search_members(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)> {
        self.repository.members.search(query).await
    }

    pub async fn get_member(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// Register a new member
    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        let created = self.repository.members.create(&member).await?;
        tracing::info!(member_id = created.id, email = %created.email, "Created member");
        Ok(created)
    }
}
