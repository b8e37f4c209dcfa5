//! In-memory [`UserStore`] for tests.
//!
//! Mirrors the `PostgreSQL` semantics: upsert on id, ascending-id ordering,
//! case-sensitive substring search where missing fields act as `""`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use user_directory_core::{User, UserId};

use super::RepositoryError;
use super::store::UserStore;

/// Map-backed store that counts writes and can simulate an outage.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<UserId, User>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `users`. Seeding does not count as a write.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
            ..Self::default()
        }
    }

    /// Number of `save`, `save_all` records, and `delete` calls that changed state.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of a stored user, bypassing the trait.
    pub async fn get(&self, id: UserId) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn contains(field: Option<&String>, query: &str) -> bool {
    field.map_or("", String::as_str).contains(query)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        self.check_available()?;
        self.users.write().await.insert(user.id, user.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }

    async fn save_all(&self, users: Vec<User>) -> Result<Vec<User>, RepositoryError> {
        self.check_available()?;
        let mut map = self.users.write().await;
        for user in &users {
            map.insert(user.id, user.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.details.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        self.check_available()?;
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<User>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| {
                contains(u.details.first_name.as_ref(), query)
                    || contains(u.details.last_name.as_ref(), query)
                    || contains(u.details.ssn.as_ref(), query)
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        self.check_available()?;
        if self.users.write().await.remove(&user.id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use user_directory_core::UserDetails;

    use super::*;

    fn user(id: i64, first: &str, last: &str, ssn: Option<&str>) -> User {
        User::new(
            UserId::new(id),
            UserDetails {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                ssn: ssn.map(String::from),
                ..UserDetails::default()
            },
        )
    }

    #[tokio::test]
    async fn test_save_overwrites_same_id() {
        let store = InMemoryUserStore::new();
        store.save(user(1, "John", "Doe", None)).await.unwrap();
        store.save(user(1, "Johnny", "Doe", None)).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.get(UserId::new(1)).await.unwrap();
        assert_eq!(stored.details.first_name.as_deref(), Some("Johnny"));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive_and_treats_missing_as_empty() {
        let store = InMemoryUserStore::with_users([
            user(2, "Jane", "Doe", Some("222")),
            user(1, "John", "Doe", None),
        ]);

        let lower = store.search("doe").await.unwrap();
        assert!(lower.is_empty());

        let all = store.search("").await.unwrap();
        let ids: Vec<i64> = all.iter().map(|u| u.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryUserStore::new();
        let err = store.delete(&user(9, "A", "B", None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let store = InMemoryUserStore::with_users([user(1, "John", "Doe", None)]);
        store.set_unavailable(true);

        assert!(store.ping().await.is_err());
        assert!(store.find_all().await.is_err());
        assert!(store.find_by_id(UserId::new(1)).await.is_err());
    }
}
