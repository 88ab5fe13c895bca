//! Books repository for database operations.
//!
//! Catalog order is ascending `id`. Title lookups pick the first match in
//! that order, so duplicate titles resolve to the oldest record.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, BookUpdate, NewBook},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Whole catalog in catalog order
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn get(&self, id: i32) -> AppResult<Option<Book>>;

    /// Case-insensitive substring search over title and author.
    ///
    /// Case folding is backend specific: PostgreSQL `LOWER` follows the
    /// database collation, the in-memory store uses Unicode lowercasing.
    /// The two agree on ASCII; non-ASCII text may fold differently.
    async fn search(&self, query: &str) -> AppResult<Vec<Book>>;

    /// Insert an available book
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    /// Rename the first book titled `update.old_title`
    async fn update_first_by_title(&self, update: &BookUpdate) -> AppResult<Option<Book>>;

    /// Remove the first book with this exact title, returning it
    async fn delete_first_by_title(&self, title: &str) -> AppResult<Option<Book>>;

    /// Set `is_available` only if it currently holds the opposite value.
    /// Returns the updated book, or `None` if the book is missing or
    /// already in the requested state.
    async fn set_availability(&self, id: i32, available: bool) -> AppResult<Option<Book>>;

    /// `(total, available)` book counts
    async fn count_by_availability(&self) -> AppResult<(i64, i64)>;
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, is_available, created_at FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, is_available, created_at FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        // strpos instead of LIKE so '%' and '_' in the query stay literal
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, is_available, created_at
            FROM books
            WHERE strpos(LOWER(title), LOWER($1)) > 0
               OR strpos(LOWER(author), LOWER($1)) > 0
            ORDER BY id
            "#,
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, is_available)
            VALUES ($1, $2, TRUE)
            RETURNING id, title, author, is_available, created_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_first_by_title(&self, update: &BookUpdate) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2
            WHERE id = (SELECT id FROM books WHERE title = $3 ORDER BY id LIMIT 1)
            RETURNING id, title, author, is_available, created_at
            "#,
        )
        .bind(&update.new_title)
        .bind(&update.new_author)
        .bind(&update.old_title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_first_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            DELETE FROM books
            WHERE id = (SELECT id FROM books WHERE title = $1 ORDER BY id LIMIT 1)
            RETURNING id, title, author, is_available, created_at
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_availability(&self, id: i32, available: bool) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET is_available = $2
            WHERE id = $1 AND is_available <> $2
            RETURNING id, title, author, is_available, created_at
            "#,
        )
        .bind(id)
        .bind(available)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count_by_availability(&self) -> AppResult<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_available) AS available
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
