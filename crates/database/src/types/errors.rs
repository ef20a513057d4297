//! Error types for the database layer

use std::fmt;

use accounts_config::Locale;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// A field value that breaks a syntactic rule. Raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username contains invalid characters {value}")]
    InvalidUsername { value: String },

    #[error("Username must be at most {max} characters long")]
    UsernameTooLong { max: usize },

    #[error("Enter a valid email address: {value}")]
    InvalidEmail { value: String },

    #[error("Email must be at most {max} characters long")]
    EmailTooLong { max: usize },

    #[error("Value {value:?} is not a valid choice")]
    InvalidRole { value: String },

    #[error("This field is required: {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Message for end users in the given language.
    pub fn message(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.to_string(),
            Locale::Ru => match self {
                Self::InvalidUsername { value } => {
                    format!("Username содержит недопустимые символы {value}")
                }
                Self::UsernameTooLong { max } => {
                    format!("Имя пользователя не может быть длиннее {max} символов")
                }
                Self::InvalidEmail { value } => {
                    format!("Введите правильный адрес электронной почты: {value}")
                }
                Self::EmailTooLong { max } => {
                    format!("Адрес электронной почты не может быть длиннее {max} символов")
                }
                Self::InvalidRole { value } => {
                    format!("Значения {value:?} нет среди допустимых вариантов")
                }
                Self::MissingField(field) => format!("Обязательное поле: {field}"),
            },
        }
    }
}

/// Column covered by a unique index on `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

impl UniqueField {
    /// Extract the column from a SQLite message such as
    /// `UNIQUE constraint failed: users.email`.
    fn from_sqlite_message(message: &str) -> Option<Self> {
        let column = message.rsplit(':').next()?.trim();
        match column {
            "users.email" => Some(Self::Email),
            "users.username" => Some(Self::Username),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => f.write_str("email"),
            UniqueField::Username => f.write_str("username"),
        }
    }
}

/// Errors raised by user record operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A user with that {field} already exists")]
    UniquenessViolation { field: UniqueField },

    #[error("Constraint {constraint} violated")]
    ConstraintViolation { constraint: String },

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl UserError {
    /// Message for end users; only validation failures are translated.
    pub fn message(&self, locale: Locale) -> String {
        match self {
            UserError::Validation(err) => err.message(locale),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserError::UserNotFound,
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                let kind = db_err.kind();

                if matches!(kind, ErrorKind::UniqueViolation)
                    || message.starts_with("UNIQUE constraint failed")
                {
                    match UniqueField::from_sqlite_message(message) {
                        Some(field) => UserError::UniquenessViolation { field },
                        None => UserError::DatabaseError(message.to_string()),
                    }
                } else if matches!(kind, ErrorKind::CheckViolation)
                    || message.starts_with("CHECK constraint failed")
                {
                    let constraint = message
                        .rsplit(':')
                        .next()
                        .map(str::trim)
                        .unwrap_or(message);
                    UserError::ConstraintViolation {
                        constraint: constraint.to_string(),
                    }
                } else {
                    UserError::DatabaseError(message.to_string())
                }
            }
            _ => UserError::DatabaseError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(UserError::UserNotFound.to_string(), "User not found");
        assert_eq!(
            UserError::UniquenessViolation {
                field: UniqueField::Email
            }
            .to_string(),
            "A user with that email already exists"
        );
        assert_eq!(
            UserError::ConstraintViolation {
                constraint: "username_is_not_me".to_string()
            }
            .to_string(),
            "Constraint username_is_not_me violated"
        );
    }

    #[test]
    fn validation_messages_name_the_value() {
        let err = ValidationError::InvalidUsername {
            value: "ann smith".to_string(),
        };
        assert_eq!(err.message(Locale::En), "Username contains invalid characters ann smith");
        assert_eq!(
            err.message(Locale::Ru),
            "Username содержит недопустимые символы ann smith"
        );

        let wrapped = UserError::from(err.clone());
        assert_eq!(wrapped.to_string(), err.to_string());
    }

    #[test]
    fn unique_field_parsed_from_sqlite_message() {
        assert_eq!(
            UniqueField::from_sqlite_message("UNIQUE constraint failed: users.email"),
            Some(UniqueField::Email)
        );
        assert_eq!(
            UniqueField::from_sqlite_message("UNIQUE constraint failed: users.username"),
            Some(UniqueField::Username)
        );
        assert_eq!(
            UniqueField::from_sqlite_message("UNIQUE constraint failed: other.id"),
            None
        );
    }

    #[test]
    fn row_not_found_maps_to_user_not_found() {
        assert_eq!(UserError::from(sqlx::Error::RowNotFound), UserError::UserNotFound);
    }
}
