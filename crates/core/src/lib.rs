//! User Directory Core - Shared types library.
//!
//! This crate provides the types shared by every user directory component:
//! - `server` - HTTP API for importing, searching and editing users
//! - `cli` - Command-line tools for migrations and offline imports
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The `User` record, its embedded sub-records, and `UserId`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
