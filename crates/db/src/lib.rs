//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The transfer executor's check-then-append critical section lives in
//! [`repositories::transaction::TransactionRepository`], serialized per
//! sender with a row lock.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CurrencyRepository, TransactionRepository, UserRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
