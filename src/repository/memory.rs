//! In-process repositories selected with a `memory://` database URL.
//!
//! Each call takes the table lock once, so every mutation is applied as a
//! single step just like the corresponding SQL statement.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use super::{books::BookRepository, users::UserRepository};
use crate::{
    error::AppResult,
    models::{
        book::{Book, BookUpdate, NewBook},
        user::User,
    },
};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<BTreeMap<String, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().values().cloned().collect())
    }

    async fn get(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> AppResult<Option<User>> {
        let mut users = self.users.write();
        if users.contains_key(username) {
            return Ok(None);
        }
        let user = User {
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), user.clone());
        Ok(Some(user))
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> AppResult<bool> {
        match self.users.write().get_mut(username) {
            Some(user) => {
                user.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.write().remove(username).is_some())
    }
}

#[derive(Default)]
struct BookTable {
    next_id: i32,
    rows: BTreeMap<i32, Book>,
}

impl BookTable {
    fn first_id_by_title(&self, title: &str) -> Option<i32> {
        self.rows
            .values()
            .find(|b| b.title == title)
            .map(|b| b.id)
    }
}

#[derive(Default)]
pub struct MemoryBookRepository {
    table: Mutex<BookTable>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.table.lock().rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.table.lock().rows.get(&id).cloned())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let needle = query.to_lowercase();
        Ok(self
            .table
            .lock()
            .rows
            .values()
            .filter(|b| b.matches(&needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut table = self.table.lock();
        table.next_id += 1;
        let row = Book {
            id: table.next_id,
            title: book.title.clone(),
            author: book.author.clone(),
            is_available: true,
            created_at: Utc::now(),
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_first_by_title(&self, update: &BookUpdate) -> AppResult<Option<Book>> {
        let mut table = self.table.lock();
        let Some(id) = table.first_id_by_title(&update.old_title) else {
            return Ok(None);
        };
        Ok(table.rows.get_mut(&id).map(|book| {
            book.title = update.new_title.clone();
            book.author = update.new_author.clone();
            book.clone()
        }))
    }

    async fn delete_first_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let mut table = self.table.lock();
        Ok(table
            .first_id_by_title(title)
            .and_then(|id| table.rows.remove(&id)))
    }

    async fn set_availability(&self, id: i32, available: bool) -> AppResult<Option<Book>> {
        let mut table = self.table.lock();
        Ok(match table.rows.get_mut(&id) {
            Some(book) if book.is_available != available => {
                book.is_available = available;
                Some(book.clone())
            }
            _ => None,
        })
    }

    async fn count_by_availability(&self) -> AppResult<(i64, i64)> {
        let table = self.table.lock();
        let total = table.rows.len() as i64;
        let available = table.rows.values().filter(|b| b.is_available).count() as i64;
        Ok((total, available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, author: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_insert_keeps_first_record() {
        let repo = MemoryUserRepository::new();
        assert!(repo.insert("alice", "h1").await.unwrap().is_some());
        assert!(repo.insert("alice", "h2").await.unwrap().is_none());

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].password, "h1");
    }

    #[tokio::test]
    async fn test_title_lookup_uses_first_match() {
        let repo = MemoryBookRepository::new();
        let first = repo.insert(&new_book("Dune", "Herbert")).await.unwrap();
        let second = repo.insert(&new_book("Dune", "Someone Else")).await.unwrap();
        assert!(first.id < second.id);

        let removed = repo.delete_first_by_title("Dune").await.unwrap().unwrap();
        assert_eq!(removed.id, first.id);

        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining, vec![second]);
    }

    #[tokio::test]
    async fn test_update_by_title_renames_oldest_duplicate() {
        let repo = MemoryBookRepository::new();
        let first = repo.insert(&new_book("Dune", "Herbert")).await.unwrap();
        let second = repo.insert(&new_book("Dune", "Someone Else")).await.unwrap();

        let update = BookUpdate {
            old_title: "Dune".to_string(),
            new_title: "Dune Messiah".to_string(),
            new_author: "Frank Herbert".to_string(),
        };
        let updated = repo.update_first_by_title(&update).await.unwrap().unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.author, "Frank Herbert");

        // the second duplicate is now the first match
        let updated = repo.update_first_by_title(&update).await.unwrap().unwrap();
        assert_eq!(updated.id, second.id);
        assert!(repo.update_first_by_title(&update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_availability_is_conditional() {
        let repo = MemoryBookRepository::new();
        let book = repo.insert(&new_book("Dune", "Herbert")).await.unwrap();

        assert!(repo.set_availability(book.id, true).await.unwrap().is_none());
        let out = repo.set_availability(book.id, false).await.unwrap().unwrap();
        assert!(!out.is_available);
        assert!(repo.set_availability(book.id, false).await.unwrap().is_none());
        assert!(repo.set_availability(999, true).await.unwrap().is_none());
    }
}
