//! Repository layer for database operations

pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use books::{BookRepository, PgBookRepository};
pub use memory::{MemoryBookRepository, MemoryUserRepository};
pub use users::{PgUserRepository, UserRepository};

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    pub fn new(users: Arc<dyn UserRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self { users, books }
    }

    /// Create a repository backed by the given database pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgBookRepository::new(pool)),
        )
    }

    /// Create a repository that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryBookRepository::new()),
        )
    }
}
