//! Record store contract.
//!
//! The [`UserStore`] trait is the only way the service layer touches
//! persistence. [`PgUserStore`](super::PgUserStore) backs it with `PostgreSQL`;
//! tests use [`InMemoryUserStore`](super::memory::InMemoryUserStore).

use async_trait::async_trait;

use user_directory_core::{User, UserId};

use super::RepositoryError;

/// Persistence port for [`User`] records.
///
/// Ordering: every method returning a sequence yields users in ascending
/// identifier order.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or fully overwrite the record with `user.id`.
    async fn save(&self, user: User) -> Result<User, RepositoryError>;

    /// Write each record with [`save`](Self::save) semantics.
    ///
    /// Either every record is written or none are.
    async fn save_all(&self, users: Vec<User>) -> Result<Vec<User>, RepositoryError>;

    /// Look up a user by primary key.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by exact email. With duplicates, the lowest id wins.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Every stored user.
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Users whose first name, last name, or SSN contains `query`.
    ///
    /// Case-sensitive; missing fields behave as empty strings, so an empty
    /// query matches every user.
    async fn search(&self, query: &str) -> Result<Vec<User>, RepositoryError>;

    /// Remove the record with `user.id`.
    async fn delete(&self, user: &User) -> Result<(), RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
