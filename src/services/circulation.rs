//! Checkout, return and reservation of books

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, report::Reservation, user::User},
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check out an available book
    pub async fn checkout(&self, book_id: i32) -> AppResult<Book> {
        match self.repository.books.set_availability(book_id, false).await? {
            Some(book) => {
                tracing::info!("Checked out book id={}", book.id);
                Ok(book)
            }
            None => Err(self
                .explain_noop(book_id, "Book is not available for checkout.")
                .await),
        }
    }

    /// Return a checked-out book
    pub async fn return_book(&self, book_id: i32) -> AppResult<Book> {
        match self.repository.books.set_availability(book_id, true).await? {
            Some(book) => {
                tracing::info!("Returned book id={}", book.id);
                Ok(book)
            }
            None => Err(self.explain_noop(book_id, "Book was not checked out.").await),
        }
    }

    /// Acknowledge a reservation. Availability is not consulted and nothing is stored.
    pub async fn reserve(&self, book_id: i32, user: &User) -> AppResult<Reservation> {
        let book = self
            .repository
            .books
            .get(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;

        tracing::info!("Book id={} reserved for {}", book.id, user.username);
        Ok(Reservation {
            username: user.username.clone(),
            book_title: book.title,
        })
    }

    /// A conditional availability update changed nothing: either the book is
    /// gone or it was already in the requested state.
    async fn explain_noop(&self, book_id: i32, wrong_state: &str) -> AppError {
        match self.repository.books.get(book_id).await {
            Ok(Some(_)) => AppError::BusinessRule(wrong_state.to_string()),
            Ok(None) => AppError::NotFound("Book not found.".to_string()),
            Err(e) => e,
        }
    }
}
