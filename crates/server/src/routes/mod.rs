//! HTTP route handlers for the user directory.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check (store ping)
//!
//! # Users API
//! POST   /api/users/import      - Load the upstream feed into the store
//! GET    /api/users             - List every user
//! GET    /api/users/search      - Substring search (?query=)
//! GET    /api/users/find        - Single user by ?id= or ?email=
//! PUT    /api/users/{id}        - Replace a user, keeping its id
//! DELETE /api/users/{id}        - Remove a user
//! ```

pub mod health;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the users API router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/import", post(users::import))
        .route("/search", get(users::search))
        .route("/find", get(users::find))
        .route("/{id}", put(users::update).delete(users::delete))
}

/// Create all routes for the user directory.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/users", user_routes())
}
