//! Upstream user feed client.
//!
//! Fetches the raw JSON document that `POST /api/users/import` loads into the
//! store. The expected shape is `{ "users": [ <user>, ... ] }`; anything else
//! is rejected by [`parse_users`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use user_directory_core::User;

use crate::config::ImportConfig;

/// Key holding the user array in the upstream document.
pub const USERS_KEY: &str = "users";

/// Errors that can occur while fetching or parsing the import payload.
#[derive(Debug, Error)]
pub enum ImportError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Payload is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Payload has no `users` key.
    #[error("payload has no 'users' key")]
    MissingUsers,

    /// `users` is present but not an array.
    #[error("'users' is not an array")]
    NotAnArray,

    /// An element of `users` does not have the user shape.
    #[error("user at index {index} is malformed: {source}")]
    InvalidUser {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of the raw import document.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch the raw JSON document. One attempt, no retry.
    async fn fetch(&self) -> Result<String, ImportError>;
}

/// HTTP client for the upstream user feed.
#[derive(Clone)]
pub struct ImportClient {
    client: reqwest::Client,
    url: Url,
}

impl ImportClient {
    /// Create a new import client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ImportConfig) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// The feed URL this client reads.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl UserSource for ImportClient {
    async fn fetch(&self) -> Result<String, ImportError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImportError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

/// Extract and deserialize the `users` array from a raw import document.
///
/// # Errors
///
/// Returns the `ImportError` variant describing the first problem found.
pub fn parse_users(raw: &str) -> Result<Vec<User>, ImportError> {
    let mut document: Value = serde_json::from_str(raw).map_err(ImportError::InvalidJson)?;

    let users = document
        .get_mut(USERS_KEY)
        .map(Value::take)
        .ok_or(ImportError::MissingUsers)?;

    let Value::Array(items) = users else {
        return Err(ImportError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| ImportError::InvalidUser { index, source })
        })
        .collect()
}

/// Fixed-response source for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct StaticUserSource {
    body: Option<String>,
}

#[cfg(test)]
impl StaticUserSource {
    /// Always return `body`.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }

    /// Always fail as if upstream were down.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { body: None }
    }
}

#[cfg(test)]
#[async_trait]
impl UserSource for StaticUserSource {
    async fn fetch(&self) -> Result<String, ImportError> {
        self.body.clone().ok_or_else(|| ImportError::Upstream {
            status: 503,
            message: "upstream unavailable".to_string(),
        })
    }
}
