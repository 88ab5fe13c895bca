//! Library Console - Library Management System
//!
//! Registers and authenticates users and manages a catalog of books from an
//! interactive console, backed by PostgreSQL or an in-process store.

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use crate::config::AppConfig;
pub use crate::console::Console;
pub use crate::error::{AppError, AppResult};
pub use crate::repository::Repository;
pub use crate::services::Services;
