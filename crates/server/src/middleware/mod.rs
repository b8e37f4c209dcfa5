//! HTTP middleware stack for the user directory.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one transaction per request)
//! 2. CORS (origins from `USER_DIRECTORY_CORS_ORIGINS`)
//! 3. `TraceLayer` (opens the `http_request` span)
//! 4. Request ID (records `request_id` on that span)

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
