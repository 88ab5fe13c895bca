//! Data models for the library console

pub mod book;
pub mod report;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookUpdate, NewBook};
pub use report::{LibraryReport, Notification, Reservation};
pub use user::{Credentials, User};
