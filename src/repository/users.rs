//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::user::User};

/// Storage for user credential records, keyed by username
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by username
    async fn list(&self) -> AppResult<Vec<User>>;

    async fn get(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a user. Returns `None` when the username is already taken,
    /// leaving the existing record untouched.
    async fn insert(&self, username: &str, password_hash: &str) -> AppResult<Option<User>>;

    /// Returns `false` when no such user exists
    async fn update_password(&self, username: &str, password_hash: &str) -> AppResult<bool>;

    /// Returns `false` when no such user exists
    async fn delete(&self, username: &str) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT username, password, created_at FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn get(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING username, password, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        if user.is_none() {
            tracing::debug!("Insert of user {} skipped: username exists", username);
        }
        Ok(user)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET password = $1 WHERE username = $2")
            .bind(password_hash)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, username: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
