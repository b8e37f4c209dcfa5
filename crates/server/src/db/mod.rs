//! Database operations for the user directory `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - One row per imported user; embedded records (hair, address,
//!   bank, company) are flattened into prefixed columns
//!
//! The column layout is declared once in [`columns::USER_COLUMNS`] and checked
//! against the live schema at startup via [`columns::validate_schema`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p user-directory-cli -- migrate
//! ```

pub mod columns;
#[cfg(test)]
pub mod memory;
pub mod store;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

#[cfg(test)]
pub use memory::InMemoryUserStore;
pub use store::UserStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The live table does not match the declared column mapping.
    #[error("schema mismatch: {0}")]
    Schema(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
