//! User service error types.

use thiserror::Error;

use user_directory_core::UserId;

use crate::db::RepositoryError;
use crate::services::import::ImportError;

/// Errors that can occur during user service operations.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// No user matches the supplied key.
    #[error("{0}")]
    NotFound(String),

    /// The caller supplied an unusable combination of arguments.
    #[error("{0}")]
    InvalidArgument(String),

    /// Fetching or parsing the upstream feed failed.
    #[error("Failed to import users: {0}")]
    Import(#[from] ImportError),

    /// Repository/database error.
    #[error("{0}")]
    Store(#[from] RepositoryError),
}

impl UserServiceError {
    pub(crate) fn id_not_found(id: UserId) -> Self {
        Self::NotFound(format!("User not found with ID: {id}"))
    }

    pub(crate) fn email_not_found(email: &str) -> Self {
        Self::NotFound(format!("User not found with email: {email}"))
    }

    pub(crate) fn missing_key() -> Self {
        Self::InvalidArgument("Either ID or email must be provided".to_string())
    }
}
