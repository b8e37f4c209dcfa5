//! User directory server library.
//!
//! Imports user records from an upstream JSON feed into `PostgreSQL` and
//! serves them over a small JSON API. The binary in `main.rs` wires
//! configuration, tracing and Sentry around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router with per-request tracing.
///
/// Each request runs inside an `http_request` span carrying `method`, `path`,
/// `request_id`, `status` and `latency_ms`. CORS and Sentry layers are added
/// by the binary.
pub fn app(state: AppState) -> Router {
    with_layers(routes::routes()).with_state(state)
}

/// Wrap `router` in the per-request layers.
///
/// Panics are caught innermost so the 500 they become still gets a request
/// ID and shows up in the trace span.
fn with_layers(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
}
