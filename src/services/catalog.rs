//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookUpdate, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books whose title or author contains `query`, ignoring case, in catalog order
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let results = self.repository.books.search(query).await?;
        tracing::debug!("Search {:?} matched {} book(s)", query, results.len());
        Ok(results)
    }

    /// Whole catalog in catalog order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found.", id)))
    }

    /// Add a book; new books start out available
    pub async fn add(&self, book: &NewBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.insert(book).await?;
        tracing::info!("Added book id={} {:?}", created.id, created.title);
        Ok(created)
    }

    /// Retitle the first book carrying `update.old_title`
    pub async fn update(&self, update: &BookUpdate) -> AppResult<Book> {
        update.validate()?;
        let book = self
            .repository
            .books
            .update_first_by_title(update)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;
        tracing::info!("Updated book id={} {:?} -> {:?}", book.id, update.old_title, book.title);
        Ok(book)
    }

    /// Delete the first book with exactly this title
    pub async fn delete(&self, title: &str) -> AppResult<Book> {
        let book = self
            .repository
            .books
            .delete_first_by_title(title)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;
        tracing::info!("Deleted book id={} {:?}", book.id, book.title);
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::repository::{
        books::MockBookRepository, users::MockUserRepository, MemoryBookRepository,
    };

    fn memory_service() -> CatalogService {
        CatalogService::new(Repository::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MemoryBookRepository::new()),
        ))
    }

    fn new_book(title: &str, author: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_matches_title_case_insensitively() {
        let service = memory_service();
        let war = service.add(&new_book("War and Peace", "Tolstoy")).await.unwrap();
        service.add(&new_book("Dune", "Herbert")).await.unwrap();

        let results = service.search("war").await.unwrap();
        assert_eq!(results, vec![war]);
    }

    #[tokio::test]
    async fn test_search_matches_author_and_keeps_catalog_order() {
        let service = memory_service();
        service.add(&new_book("Children of Dune", "Frank Herbert")).await.unwrap();
        service.add(&new_book("Emma", "Austen")).await.unwrap();
        service.add(&new_book("Dune", "Frank Herbert")).await.unwrap();

        let titles: Vec<String> = service
            .search("HERBERT")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Children of Dune", "Dune"]);

        assert!(service.search("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_by_title() {
        let service = memory_service();
        let added = service.add(&new_book("Dune", "Herbert")).await.unwrap();
        assert!(added.is_available);
        assert_eq!(service.get(added.id).await.unwrap(), added);

        let updated = assert_ok!(
            service
                .update(&BookUpdate {
                    old_title: "Dune".into(),
                    new_title: "Dune Messiah".into(),
                    new_author: "Frank Herbert".into(),
                })
                .await
        );
        assert_eq!(updated.id, added.id);
        assert_eq!(updated.author, "Frank Herbert");

        let err = assert_err!(service.delete("Dune").await);
        assert!(matches!(err, AppError::NotFound(_)));

        assert_ok!(service.delete("Dune Messiah").await);
        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(service.get(added.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_rejects_blank_title() {
        let mut books = MockBookRepository::new();
        books.expect_insert().never();
        let service = CatalogService::new(Repository::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(books),
        ));

        let err = assert_err!(service.add(&new_book("", "Anon")).await);
        assert!(matches!(err, AppError::Validation(_)));
    }
}
