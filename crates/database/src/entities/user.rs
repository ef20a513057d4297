//! User entity definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::fields::{Email, Username};
use super::role::{effective_admin, UserRole};

/// Persisted user record. `id` and `date_joined` are assigned by storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: i64,
    pub email: Email,
    pub username: Option<Username>,
    pub role: UserRole,
    pub bio: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    date_joined: DateTime<Utc>,
}

impl User {
    /// Rebuild a stored record from its parts for in-memory repositories.
    /// `id` must be the identifier storage assigned.
    #[cfg(feature = "test-support")]
    pub fn restore(id: i64, date_joined: DateTime<Utc>, fields: NewUser) -> Self {
        Self {
            id,
            email: fields.email,
            username: fields.username,
            role: fields.role,
            bio: fields.bio,
            is_staff: fields.is_staff,
            is_superuser: fields.is_superuser,
            is_active: fields.is_active,
            date_joined,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub fn is_moderator(&self) -> bool {
        self.role == UserRole::Moderator
    }

    pub fn is_admin(&self) -> bool {
        effective_admin(self.role, self.is_superuser, self.is_staff)
    }
}

/// Diagnostic rendering, `username(email)`. A missing username renders as `None`.
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(username) => write!(f, "{}({})", username, self.email),
            None => write!(f, "None({})", self.email),
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role.parse::<UserRole>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            email: Email::from_stored(row.try_get("email")?),
            username: row
                .try_get::<Option<String>, _>("username")?
                .map(Username::from_stored),
            role,
            bio: row.try_get("bio")?,
            is_staff: row.try_get("is_staff")?,
            is_superuser: row.try_get("is_superuser")?,
            is_active: row.try_get("is_active")?,
            date_joined: row.try_get("date_joined")?,
        })
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: Email,
    pub username: Option<Username>,
    pub role: UserRole,
    pub bio: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(email: Email) -> Self {
        Self {
            email,
            username: None,
            role: UserRole::default(),
            bio: None,
            is_staff: false,
            is_superuser: false,
            is_active: true,
        }
    }

    pub fn with_username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// Sort order for listing users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserOrdering {
    #[default]
    IdAsc,
    IdDesc,
    Email,
    Username,
}

impl UserOrdering {
    pub(crate) fn order_clause(&self) -> &'static str {
        match self {
            UserOrdering::IdAsc => "id ASC",
            UserOrdering::IdDesc => "id DESC",
            UserOrdering::Email => "email ASC, id ASC",
            UserOrdering::Username => "username ASC, id ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fields::FieldLimits;

    fn user(username: Option<&str>, role: UserRole, is_staff: bool, is_superuser: bool) -> User {
        User {
            id: 1,
            email: Email::from_stored("ann@example.com".to_string()),
            username: username.map(|u| Username::from_stored(u.to_string())),
            role,
            bio: None,
            is_staff,
            is_superuser,
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn display_renders_username_and_email() {
        assert_eq!(
            user(Some("ann"), UserRole::User, false, false).to_string(),
            "ann(ann@example.com)"
        );
        assert_eq!(
            user(None, UserRole::User, false, false).to_string(),
            "None(ann@example.com)"
        );
    }

    #[test]
    fn moderator_check_follows_role_only() {
        assert!(user(None, UserRole::Moderator, false, false).is_moderator());
        assert!(!user(None, UserRole::Admin, false, false).is_moderator());
        assert!(!user(None, UserRole::User, true, true).is_moderator());
    }

    #[test]
    fn admin_check_accepts_any_elevated_input() {
        assert!(user(None, UserRole::Admin, false, false).is_admin());
        assert!(user(None, UserRole::User, true, false).is_admin());
        assert!(user(None, UserRole::User, false, true).is_admin());
        assert!(!user(None, UserRole::User, false, false).is_admin());
        assert!(!user(None, UserRole::Moderator, false, false).is_admin());
    }

    #[test]
    fn new_user_defaults() {
        let email = Email::parse("bob@example.com", &FieldLimits::default()).unwrap();
        let new_user = NewUser::new(email);
        assert_eq!(new_user.role, UserRole::User);
        assert!(new_user.username.is_none());
        assert!(new_user.bio.is_none());
        assert!(new_user.is_active);
        assert!(!new_user.is_staff && !new_user.is_superuser);
    }

    #[test]
    fn serializes_with_plain_field_values() {
        let value = serde_json::to_value(user(Some("ann"), UserRole::Moderator, false, false)).unwrap();
        assert_eq!(value["username"], "ann");
        assert_eq!(value["email"], "ann@example.com");
        assert_eq!(value["role"], "moderator");
        assert_eq!(value["id"], 1);
    }
}
