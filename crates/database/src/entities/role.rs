//! Role enumeration and the capability checks derived from it.

use std::fmt;
use std::str::FromStr;

use accounts_config::Locale;
use serde::{Deserialize, Serialize};

use crate::types::errors::ValidationError;

/// Coarse-grained role of a user. Exactly one is active per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Moderator,
    #[default]
    User,
}

impl UserRole {
    /// Every role, in declaration order.
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Moderator, UserRole::User];

    /// Stored value of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Moderator => "moderator",
            UserRole::User => "user",
        }
    }

    /// Human-readable label for the role.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (UserRole::Admin, Locale::En) => "Administrator",
            (UserRole::Moderator, Locale::En) => "Moderator",
            (UserRole::User, Locale::En) => "User",
            (UserRole::Admin, Locale::Ru) => "Администратор",
            (UserRole::Moderator, Locale::Ru) => "Модератор",
            (UserRole::User, Locale::Ru) => "Пользователь",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "moderator" => Ok(UserRole::Moderator),
            "user" => Ok(UserRole::User),
            other => Err(ValidationError::InvalidRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Width of the storage column for `role`: the longest label across all
/// roles and supported locales, counted in characters.
pub fn role_column_width() -> usize {
    UserRole::ALL
        .iter()
        .flat_map(|role| [Locale::En, Locale::Ru].map(|locale| role.label(locale)))
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
}

/// Effective administrator capability: any one of the inputs suffices.
pub fn effective_admin(role: UserRole, is_superuser: bool, is_staff: bool) -> bool {
    is_superuser || role == UserRole::Admin || is_staff
}
