//! Book model and related types

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Book record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Case-insensitive substring match against title or author.
    /// `needle` must already be lowercased with `str::to_lowercase`.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} by {} (Available: {})",
            self.title, self.author, self.is_available
        )
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub author: String,
}

/// Update book request; the book is located by `old_title`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookUpdate {
    pub old_title: String,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub new_title: String,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub new_author: String,
}
