//! Identity queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use campus_entity::user::{CreateUser, User, UserStatus};

use super::PgStore;
use crate::store::error::map_sqlx;
use crate::store::{IdentityStore, StoreResult};

/// Insert a user row on any executor, so transactions can share it.
pub(super) async fn insert_user<'e, E: PgExecutor<'e>>(
    executor: E,
    data: &CreateUser,
) -> StoreResult<User> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, password_hash, role, teacher_ref) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(data.id)
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(data.role)
    .bind(&data.teacher_ref)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx("Failed to create user"))
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn create_identity(&self, data: CreateUser) -> StoreResult<User> {
        insert_user(&self.pool, &data).await
    }

    async fn find_identity_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find user by id"))
    }

    async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find user by username"))
    }

    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find user by email"))
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE users SET last_login_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx("Failed to update last login"))?;
        Ok(())
    }

    async fn set_identity_status(&self, id: Uuid, status: UserStatus) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx("Failed to update user status"))?;
        Ok(result.rows_affected() > 0)
    }
}
