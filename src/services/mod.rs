//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod notifications;
pub mod reports;
pub mod users;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub reports: reports::ReportsService,
    pub notifications: notifications::NotificationService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            users: users::UsersService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
            notifications: notifications::NotificationService::new(),
        }
    }
}
