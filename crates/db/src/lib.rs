//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the points ledger
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Atomicity and per-customer serialization live here: every balance
//! mutation runs inside one database transaction that locks the account
//! row and appends the matching log entry before committing.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{PointsRepository, ReferralRepository, SettingsRepository};

use kiloan_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);
    Database::connect(options).await
}
