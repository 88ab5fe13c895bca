//! User model and related types

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    /// Unique login name
    pub username: String,
    /// Hashed password (argon2, PHC string)
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Username / password pair as typed at the console
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
