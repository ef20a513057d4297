//! Shared types for the user management layer.

pub mod requests;

pub use requests::{PrivilegeUpdate, ProfileUpdate, RegisterRequest};

pub type UserId = i64;
