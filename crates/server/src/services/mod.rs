//! Business logic services for the user directory.
//!
//! # Services
//!
//! - `import` - Upstream feed client and payload parsing
//! - `users` - Import, search, find, update and delete rules

pub mod import;
pub mod users;

pub use import::{ImportClient, ImportError, UserSource};
pub use users::{ImportSummary, UserService, UserServiceError};
