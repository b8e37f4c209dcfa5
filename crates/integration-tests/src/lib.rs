//! Integration tests for the user directory.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p user-directory-cli -- migrate
//! cargo run -p user-directory-server
//!
//! # Run the ignored tests against it
//! cargo test -p user-directory-integration-tests -- --ignored
//! ```
//!
//! The server must be able to reach its import feed. Point
//! `USER_DIRECTORY_BASE_URL` at a server other than `http://localhost:8080`
//! if needed.

use reqwest::Client;

/// Base URL for the server under test (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("USER_DIRECTORY_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Plain HTTP client for the API.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}
