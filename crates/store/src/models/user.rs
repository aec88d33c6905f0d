//! User domain types.
//!
//! [`User`] is the validated domain object held in the user store;
//! [`CurrentUser`] is the slimmer record written into the session after
//! login. The password hash lives in the store only and is never part of
//! either type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emporium_core::{Email, Role, UserId, Username};

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username (the login key).
    pub username: Username,
    /// User's email address.
    pub email: Email,
    /// Authorization role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The logged-in user as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: Username,
    /// Role at login time.
    pub role: Role,
}

impl CurrentUser {
    /// Whether the session belongs to an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Session keys used by the store.
pub mod session_keys {
    /// Key under which [`super::CurrentUser`] is stored.
    pub const CURRENT_USER: &str = "current_user";
}
