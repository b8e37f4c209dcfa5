//! Core types for the user directory.

pub mod id;
pub mod user;

pub use id::*;
pub use user::{Address, Bank, Company, Coordinates, Hair, User, UserDetails};
