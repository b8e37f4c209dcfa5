//! CLI command implementations.

pub mod import;
pub mod migrate;

use thiserror::Error;

use user_directory_server::config::ConfigError;
use user_directory_server::db::RepositoryError;
use user_directory_server::services::{ImportError, UserServiceError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The users table does not match the column mapping.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// The import client could not be built.
    #[error("{0}")]
    Import(#[from] ImportError),

    /// The import itself failed.
    #[error("{0}")]
    Service(#[from] UserServiceError),
}
