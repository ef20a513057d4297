//! Accounts Database Crate
//!
//! This crate holds the user record: its validated field values, the role
//! enumeration and derived capability checks, the SQLite schema that enforces
//! uniqueness and the reserved username, and the repository over it.

use accounts_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::UserRepository;

pub use entities::{
    effective_admin, role_column_width, Email, FieldLimits, NewUser, User, UserOrdering,
    UserRole, Username,
};

pub use types::{
    DatabaseError, DatabaseResult, UniqueField, UserError, UserResult, ValidationError,
};

pub use accounts_config::Locale;
/// Re-export commonly used types for convenience
pub use sqlx::SqlitePool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("init.db").display()),
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();
        let repo = UserRepository::new(pool);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
