//! Request types accepted by [`UserService`](crate::UserService).
//!
//! Fields arrive as raw strings; the service turns them into validated
//! values before anything is written.

use serde::{Deserialize, Serialize};

/// Registration input. `username` is nullable on the record but required here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// One of `admin`, `moderator`, `user`. Defaults to `user`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Profile changes. An outer `None` leaves the field untouched; for the
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<Option<String>>,
    #[serde(default)]
    pub bio: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none() && self.bio.is_none()
    }
}

/// Role and platform flag changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivilegeUpdate {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl PrivilegeUpdate {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.is_staff.is_none()
            && self.is_superuser.is_none()
            && self.is_active.is_none()
    }
}
