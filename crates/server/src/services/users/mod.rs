//! User directory business rules.
//!
//! [`UserService`] sits between the HTTP handlers and the two outside
//! collaborators: the record store and the upstream feed. It owns the rules
//! the handlers must not know about:
//!
//! - import is fetch, parse, then one write per record
//! - find prefers the identifier over the email when both are given
//! - update keeps the stored identifier whatever the body says
//! - absence becomes [`UserServiceError::NotFound`]

mod error;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use user_directory_core::{User, UserId};

use crate::db::UserStore;
use crate::services::import::{UserSource, parse_users};

pub use error::UserServiceError;

/// Message returned after a successful import.
pub const IMPORT_MESSAGE: &str = "Users imported successfully!";

/// Message returned after a successful delete.
pub const DELETE_MESSAGE: &str = "User deleted successfully";

/// Result of [`UserService::import_from_source`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub message: &'static str,
    pub imported: usize,
}

/// User directory service.
///
/// Cheap to clone; holds shared handles to its collaborators.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    source: Arc<dyn UserSource>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, source: Arc<dyn UserSource>) -> Self {
        Self { store, source }
    }

    /// Fetch the upstream feed and write every user in it.
    ///
    /// Existing users with the same identifier are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Import` if the fetch fails or the payload
    /// does not hold a `users` array of user-shaped objects.
    /// Returns `UserServiceError::Store` if a write fails.
    #[instrument(skip(self))]
    pub async fn import_from_source(&self) -> Result<ImportSummary, UserServiceError> {
        info!("Starting user import");

        let raw = self.source.fetch().await?;
        let users = parse_users(&raw)?;
        info!(count = users.len(), "Parsed import payload");

        let saved = self.store.save_all(users).await?;
        info!(imported = saved.len(), "User import completed");

        Ok(ImportSummary {
            message: IMPORT_MESSAGE,
            imported: saved.len(),
        })
    }

    /// Every stored user, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, UserServiceError> {
        let users = self.store.find_all().await?;
        info!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Users whose first name, last name, or SSN contains `query`.
    ///
    /// No match is an empty result, not an error. The empty query matches
    /// every user.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<User>, UserServiceError> {
        let users = self.store.search(query).await?;
        info!(count = users.len(), "Search completed");
        Ok(users)
    }

    /// Find a single user by identifier, or by email when no identifier is given.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::InvalidArgument` if neither key is supplied.
    /// Returns `UserServiceError::NotFound` if the chosen key matches nothing.
    /// Returns `UserServiceError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn find_by_id_or_email(
        &self,
        id: Option<UserId>,
        email: Option<&str>,
    ) -> Result<User, UserServiceError> {
        match (id, email) {
            (Some(id), _) => self
                .store
                .find_by_id(id)
                .await?
                .ok_or_else(|| UserServiceError::id_not_found(id)),
            (None, Some(email)) => self
                .store
                .find_by_email(email)
                .await?
                .ok_or_else(|| UserServiceError::email_not_found(email)),
            (None, None) => Err(UserServiceError::missing_key()),
        }
    }

    /// Replace every field of user `id` with `replacement`, keeping `id`.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::NotFound` if no user has `id`; nothing is written.
    /// Returns `UserServiceError::Store` if the store fails.
    #[instrument(skip(self, replacement), fields(body_id = %replacement.id))]
    pub async fn update(&self, id: UserId, mut replacement: User) -> Result<User, UserServiceError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserServiceError::id_not_found(id))?;

        replacement.id = existing.id;
        let saved = self.store.save(replacement).await?;
        info!("User updated");
        Ok(saved)
    }

    /// Remove user `id`.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::NotFound` if no user has `id`; nothing is removed.
    /// Returns `UserServiceError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<&'static str, UserServiceError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserServiceError::id_not_found(id))?;

        self.store.delete(&existing).await.map_err(|e| match e {
            // Removed concurrently between the lookup and the delete
            crate::db::RepositoryError::NotFound => UserServiceError::id_not_found(id),
            other => other.into(),
        })?;
        info!("User deleted");
        Ok(DELETE_MESSAGE)
    }

    /// Check that the record store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Store` if the store cannot be reached.
    pub async fn ping(&self) -> Result<(), UserServiceError> {
        Ok(self.store.ping().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use user_directory_core::UserDetails;

    use super::*;
    use crate::db::InMemoryUserStore;
    use crate::services::import::StaticUserSource;

    fn user(id: i64, first: &str, last: &str, ssn: &str) -> User {
        User::new(
            UserId::new(id),
            UserDetails {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                ssn: Some(ssn.to_string()),
                email: Some(format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase())),
                ..UserDetails::default()
            },
        )
    }

    fn doe_store() -> Arc<InMemoryUserStore> {
        Arc::new(InMemoryUserStore::with_users([
            user(1, "John", "Doe", "111"),
            user(2, "Jane", "Doe", "222"),
        ]))
    }

    fn service_with(store: Arc<InMemoryUserStore>, source: StaticUserSource) -> UserService {
        UserService::new(store, Arc::new(source))
    }

    fn service(store: Arc<InMemoryUserStore>) -> UserService {
        service_with(store, StaticUserSource::new(r#"{"users":[]}"#))
    }

    fn ids(users: &[User]) -> Vec<i64> {
        users.iter().map(|u| u.id.as_i64()).collect()
    }

    // ========================================================================
    // Import
    // ========================================================================

    #[tokio::test]
    async fn test_import_writes_each_user() {
        let store = Arc::new(InMemoryUserStore::new());
        let source = StaticUserSource::new(r#"{"users":[{"id":5,"firstName":"Amy","lastName":"Lee"}]}"#);
        let service = service_with(store.clone(), source);

        let summary = service.import_from_source().await.unwrap();

        assert_eq!(summary.message, IMPORT_MESSAGE);
        assert_eq!(summary.imported, 1);
        assert_eq!(store.write_count(), 1);

        let all = service.list_all().await.unwrap();
        assert_eq!(ids(&all), vec![5]);
        assert_eq!(all[0].details.first_name.as_deref(), Some("Amy"));
    }

    #[tokio::test]
    async fn test_import_overwrites_existing_id() {
        let store = doe_store();
        let source = StaticUserSource::new(r#"{"users":[{"id":1,"firstName":"Johnny"}]}"#);
        let service = service_with(store.clone(), source);

        service.import_from_source().await.unwrap();

        let john = store.get(UserId::new(1)).await.unwrap();
        assert_eq!(john.details.first_name.as_deref(), Some("Johnny"));
        assert!(john.details.last_name.is_none());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_import_fetch_failure() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store.clone(), StaticUserSource::unavailable());

        let err = service.import_from_source().await.unwrap_err();

        assert!(matches!(err, UserServiceError::Import(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_import_missing_users_key_writes_nothing() {
        let store = Arc::new(InMemoryUserStore::new());
        let service = service_with(store.clone(), StaticUserSource::new(r#"{"total":0}"#));

        let err = service.import_from_source().await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to import users:"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_import_malformed_element_writes_nothing() {
        let store = Arc::new(InMemoryUserStore::new());
        let source = StaticUserSource::new(r#"{"users":[{"id":1},{"firstName":"NoId"}]}"#);
        let service = service_with(store.clone(), source);

        let err = service.import_from_source().await.unwrap_err();

        assert!(matches!(err, UserServiceError::Import(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_import_store_failure() {
        let store = Arc::new(InMemoryUserStore::new());
        store.set_unavailable(true);
        let source = StaticUserSource::new(r#"{"users":[{"id":1}]}"#);
        let service = service_with(store, source);

        let err = service.import_from_source().await.unwrap_err();

        assert!(matches!(err, UserServiceError::Store(_)));
    }

    // ========================================================================
    // Search
    // ========================================================================

    #[tokio::test]
    async fn test_search_matches_any_field() {
        let service = service(doe_store());

        assert_eq!(ids(&service.search("Doe").await.unwrap()), vec![1, 2]);
        assert_eq!(ids(&service.search("John").await.unwrap()), vec![1]);
        assert_eq!(ids(&service.search("22").await.unwrap()), vec![2]);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty() {
        let service = service(doe_store());
        assert!(service.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_everyone() {
        let store = doe_store();
        store
            .save(User::new(UserId::new(3), UserDetails::default()))
            .await
            .unwrap();
        let service = service(store);

        assert_eq!(ids(&service.search("").await.unwrap()), vec![1, 2, 3]);
    }

    // ========================================================================
    // Find
    // ========================================================================

    #[tokio::test]
    async fn test_find_by_id() {
        let service = service(doe_store());
        let found = service.find_by_id_or_email(Some(UserId::new(1)), None).await.unwrap();
        assert_eq!(found.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let service = service(doe_store());
        let found = service
            .find_by_id_or_email(None, Some("jane.doe@example.com"))
            .await
            .unwrap();
        assert_eq!(found.id, UserId::new(2));
    }

    #[tokio::test]
    async fn test_find_prefers_id_over_email() {
        let service = service(doe_store());
        let found = service
            .find_by_id_or_email(Some(UserId::new(1)), Some("jane.doe@example.com"))
            .await
            .unwrap();
        assert_eq!(found.id, UserId::new(1));

        // The email is ignored even when the id misses
        let err = service
            .find_by_id_or_email(Some(UserId::new(999)), Some("jane.doe@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found with ID: 999");
    }

    #[tokio::test]
    async fn test_find_unknown_id() {
        let service = service(doe_store());
        let err = service
            .find_by_id_or_email(Some(UserId::new(999)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_unknown_email() {
        let service = service(doe_store());
        let err = service
            .find_by_id_or_email(None, Some("nobody@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found with email: nobody@example.com");
    }

    #[tokio::test]
    async fn test_find_without_keys() {
        let service = service(doe_store());
        let err = service.find_by_id_or_email(None, None).await.unwrap_err();
        assert!(matches!(err, UserServiceError::InvalidArgument(_)));
    }

    // ========================================================================
    // Update / Delete
    // ========================================================================

    #[tokio::test]
    async fn test_update_keeps_stored_id() {
        let store = doe_store();
        let service = service(store.clone());
        let replacement = user(77, "Johnathan", "Dough", "999");

        let updated = service.update(UserId::new(1), replacement).await.unwrap();

        assert_eq!(updated.id, UserId::new(1));
        assert!(store.get(UserId::new(77)).await.is_none());
        let stored = store.get(UserId::new(1)).await.unwrap();
        assert_eq!(stored.details.first_name.as_deref(), Some("Johnathan"));
        assert_eq!(stored.details.ssn.as_deref(), Some("999"));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let store = doe_store();
        let service = service(store.clone());
        let replacement = User::new(
            UserId::new(1),
            UserDetails {
                first_name: Some("Solo".to_string()),
                ..UserDetails::default()
            },
        );

        service.update(UserId::new(1), replacement).await.unwrap();

        let stored = store.get(UserId::new(1)).await.unwrap();
        assert!(stored.details.last_name.is_none());
        assert!(stored.details.email.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_writes_nothing() {
        let store = doe_store();
        let service = service(store.clone());

        let err = service
            .update(UserId::new(999), user(999, "Ghost", "User", "000"))
            .await
            .unwrap_err();

        assert!(matches!(err, UserServiceError::NotFound(_)));
        assert_eq!(store.write_count(), 0);
        assert!(store.get(UserId::new(999)).await.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = doe_store();
        let service = service(store.clone());

        let message = service.delete(UserId::new(2)).await.unwrap();

        assert_eq!(message, DELETE_MESSAGE);
        assert!(store.get(UserId::new(2)).await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_mutates_nothing() {
        let store = doe_store();
        let service = service(store.clone());

        let err = service.delete(UserId::new(999)).await.unwrap_err();

        assert_eq!(err.to_string(), "User not found with ID: 999");
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_store_outage_is_store_error() {
        let store = doe_store();
        store.set_unavailable(true);
        let service = service(store);

        assert!(matches!(
            service.list_all().await.unwrap_err(),
            UserServiceError::Store(_)
        ));
        assert!(service.ping().await.is_err());
    }
}
