//! # Accounts Users Crate
//!
//! Lifecycle operations over user records: registration, profile updates,
//! privilege management and account deletion. Field rules and storage
//! constraints live in `accounts-database`; this crate applies them in the
//! order the lifecycle needs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use accounts_config::AccountsConfig;
//! use accounts_users::{RegisterRequest, UserService};
//!
//! # async fn run(pool: accounts_users::SqlitePool) -> Result<(), accounts_users::UserError> {
//! let service = UserService::new(pool, &AccountsConfig::default());
//! let user = service
//!     .register(RegisterRequest {
//!         email: "ann@example.com".to_string(),
//!         username: Some("ann".to_string()),
//!         bio: None,
//!         role: None,
//!     })
//!     .await?;
//! assert!(!user.is_admin());
//! # Ok(())
//! # }
//! ```

pub mod services;
pub mod types;

pub use accounts_database::{
    SqlitePool, UniqueField, User, UserError, UserOrdering, UserRepository, UserResult, UserRole,
    ValidationError,
};

pub use services::{UserRepo, UserService};
pub use types::{PrivilegeUpdate, ProfileUpdate, RegisterRequest, UserId};
