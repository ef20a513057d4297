//! User repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::entities::{NewUser, User, UserOrdering};
use crate::types::{UserError, UserResult};

const USER_COLUMNS: &str =
    "id, email, username, role, bio, is_staff, is_superuser, is_active, date_joined";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find user by login address
    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List every user in the requested order
    pub async fn list(&self, ordering: UserOrdering) -> UserResult<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {}",
            ordering.order_clause()
        );
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn count(&self) -> UserResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a new user. Uniqueness and the reserved username are checked by the schema.
    pub async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (email, username, role, bio, is_staff, is_superuser, is_active, date_joined) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(new_user.email.as_str())
        .bind(new_user.username.as_ref().map(|u| u.as_str()))
        .bind(new_user.role.as_str())
        .bind(&new_user.bio)
        .bind(new_user.is_staff)
        .bind(new_user.is_superuser)
        .bind(new_user.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();
        debug!(user_id, "user row inserted");

        self.find_by_id(user_id).await?.ok_or_else(|| {
            UserError::DatabaseError("Failed to retrieve created user".to_string())
        })
    }

    /// Write every mutable field of an existing user.
    ///
    /// The row is selected by `user.id()`, so `user` must be a record
    /// previously returned by this repository.
    pub async fn save(&self, user: &User) -> UserResult<User> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, username = ?, role = ?, bio = ?, is_staff = ?, is_superuser = ?, is_active = ? WHERE id = ?"
        )
        .bind(user.email.as_str())
        .bind(user.username.as_ref().map(|u| u.as_str()))
        .bind(user.role.as_str())
        .bind(&user.bio)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.is_active)
        .bind(user.id())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::UserNotFound);
        }

        self.find_by_id(user.id()).await?.ok_or(UserError::UserNotFound)
    }

    pub async fn delete(&self, id: i64) -> UserResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::UserNotFound);
        }

        debug!(user_id = id, "user row deleted");
        Ok(())
    }
}
