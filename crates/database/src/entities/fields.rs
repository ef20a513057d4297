//! Validated field values for user records.
//!
//! Each value object can only be built through `parse`, so a record holding
//! one has already passed the syntactic checks. Rules that need the rest of
//! the table (uniqueness, the reserved username) are left to the schema.

use std::fmt;

use accounts_config::AccountsConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::errors::ValidationError;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.@+-]+$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Length limits applied when parsing field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub email_max_length: usize,
    pub username_max_length: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        AccountsConfig::default().into()
    }
}

impl From<AccountsConfig> for FieldLimits {
    fn from(config: AccountsConfig) -> Self {
        Self::from(&config)
    }
}

impl From<&AccountsConfig> for FieldLimits {
    fn from(config: &AccountsConfig) -> Self {
        Self {
            email_max_length: config.email_max_length,
            username_max_length: config.username_max_length,
        }
    }
}

/// Username made of letters, digits and `_ . @ + -`.
///
/// ```
/// use accounts_database::{FieldLimits, Username};
///
/// let limits = FieldLimits::default();
/// assert!(Username::parse("ann.smith+test@host", &limits).is_ok());
/// assert!(Username::parse("ann smith", &limits).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn parse(value: impl AsRef<str>, limits: &FieldLimits) -> Result<Self, ValidationError> {
        let value = value.as_ref();

        if !USERNAME_PATTERN.is_match(value) {
            return Err(ValidationError::InvalidUsername {
                value: value.to_string(),
            });
        }

        if value.chars().count() > limits.username_max_length {
            return Err(ValidationError::UsernameTooLong {
                max: limits.username_max_length,
            });
        }

        Ok(Self(value.to_string()))
    }

    /// Wrap a value read back from storage.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Login address. The domain part is lower-cased on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(value: impl AsRef<str>, limits: &FieldLimits) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();

        if value.chars().count() > limits.email_max_length {
            return Err(ValidationError::EmailTooLong {
                max: limits.email_max_length,
            });
        }

        if !EMAIL_PATTERN.is_match(value) {
            return Err(ValidationError::InvalidEmail {
                value: value.to_string(),
            });
        }

        let normalized = match value.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
            None => value.to_string(),
        };

        Ok(Self(normalized))
    }

    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> FieldLimits {
        FieldLimits::default()
    }

    #[test]
    fn username_accepts_allowed_character_class() {
        for valid in [
            "alice",
            "Alice_99",
            "a.b",
            "mail@host",
            "plus+minus-",
            "_",
            "me",
            "ME",
            "0123456789",
        ] {
            assert!(Username::parse(valid, &limits()).is_ok(), "{valid} should pass");
        }
    }

    #[test]
    fn username_rejects_characters_outside_class() {
        for invalid in [
            "ann smith",
            "hash#tag",
            "bang!",
            "",
            "tab\tname",
            "trailing\n",
            "юзер",
            "semi;colon",
        ] {
            let err = Username::parse(invalid, &limits()).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidUsername {
                    value: invalid.to_string()
                },
                "{invalid:?} should fail"
            );
        }
    }

    #[test]
    fn username_respects_configured_length() {
        let limits = FieldLimits {
            email_max_length: 254,
            username_max_length: 5,
        };
        assert!(Username::parse("abcde", &limits).is_ok());
        assert_eq!(
            Username::parse("abcdef", &limits).unwrap_err(),
            ValidationError::UsernameTooLong { max: 5 }
        );
    }

    #[test]
    fn email_is_validated_and_domain_normalized() {
        let email = Email::parse("Ann.Smith@Example.COM", &limits()).unwrap();
        assert_eq!(email.as_str(), "Ann.Smith@example.com");

        assert!(Email::parse("not-an-email", &limits()).is_err());
        assert!(Email::parse("@example.com", &limits()).is_err());
        assert!(Email::parse("ann@", &limits()).is_err());
    }

    #[test]
    fn email_respects_configured_length() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long, &limits()).unwrap_err(),
            ValidationError::EmailTooLong { max: 254 }
        );
    }

    #[test]
    fn limits_follow_accounts_config() {
        let config = AccountsConfig {
            username_max_length: 20,
            ..AccountsConfig::default()
        };
        let limits = FieldLimits::from(&config);
        assert_eq!(limits.username_max_length, 20);
        assert_eq!(limits.email_max_length, 254);
    }
}
