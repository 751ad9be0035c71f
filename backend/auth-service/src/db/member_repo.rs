use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AuthError, Result};
use crate::models::MemberAccount;
use crate::services::MemberDirectory;

pub async fn find_member(pool: &PgPool, member_id: &str) -> Result<Option<MemberAccount>> {
    let account = sqlx::query_as::<_, MemberAccount>(
        r#"
        SELECT id, password_hash, role FROM members WHERE id = $1
        "#,
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn create_member(
    pool: &PgPool,
    member_id: &str,
    password_hash: &str,
    name: &str,
    role: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO members (id, password_hash, name, role, created_at)
        VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(member_id)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AuthError::MemberAlreadyExists
        }
        _ => AuthError::from(e),
    })?;

    Ok(())
}

/// Postgres-backed member directory behind the handlers and the token service.
#[derive(Clone)]
pub struct PgMemberDirectory {
    pool: PgPool,
}

impl PgMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PgMemberDirectory {
    async fn find_member(&self, member_id: &str) -> Result<Option<MemberAccount>> {
        find_member(&self.pool, member_id).await
    }

    async fn create_member(
        &self,
        member_id: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<()> {
        create_member(&self.pool, member_id, password_hash, name, role).await
    }
}
