//! Catalog availability reports

use crate::{error::AppResult, models::report::LibraryReport, repository::Repository};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Count total, available and checked-out books
    pub async fn generate_report(&self) -> AppResult<LibraryReport> {
        let (total, available) = self.repository.books.count_by_availability().await?;
        Ok(LibraryReport::new(total, available))
    }
}
