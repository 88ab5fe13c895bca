//! Report, reservation and notification types

/// Availability counts over the whole catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LibraryReport {
    pub total: i64,
    pub available: i64,
    pub checked_out: i64,
}

impl LibraryReport {
    pub fn new(total: i64, available: i64) -> Self {
        Self {
            total,
            available,
            checked_out: total - available,
        }
    }
}

/// Acknowledgement of a reservation. Reserving changes no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub username: String,
    pub book_title: String,
}

/// Message addressed to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub message: String,
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notification to {}: {}", self.recipient, self.message)
    }
}
