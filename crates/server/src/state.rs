//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::UserService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It carries no configuration or
/// connection handles of its own; everything a handler needs is reached
/// through the [`UserService`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: UserService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(users: UserService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { users }),
        }
    }

    /// Get a reference to the user service.
    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }
}
