//! Business logic services for user records.
//!
//! Services coordinate between repositories and apply the registration and
//! update rules; storage-level rules stay with the repository.

pub mod user_service;
#[cfg(test)]
mod memory_repository;

pub use user_service::{UserRepo, UserService};
