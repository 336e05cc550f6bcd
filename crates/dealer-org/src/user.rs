//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A platform user.
///
/// Identity is authenticated upstream; this core only consumes the
/// stable user key and the attributes that affect authorization.
///
/// # Elevated users
///
/// `is_elevated` marks a system administrator. Elevated users bypass
/// tenant-scoped checks entirely: they hold the full permission
/// catalog and see every active tenant without any role assignment or
/// membership rows. This is a recognized override, not an emergent
/// property of role resolution.
///
/// # Examples
///
/// ```
/// use dealer_org::User;
///
/// let user = User::new("Dana Reyes", "dana@example.com");
/// assert!(!user.is_elevated);
///
/// let admin = User::new("Sam Ops", "ops@example.com").elevated();
/// assert!(admin.is_elevated);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub display_name: String,

    /// Contact email
    pub email: String,

    /// System-administrator override flag
    pub is_elevated: bool,

    /// Whether the account is active
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active, non-elevated user.
    ///
    /// # Arguments
    ///
    /// * `display_name` - Human-readable name
    /// * `email` - Contact email
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            display_name: display_name.into(),
            email: email.into(),
            is_elevated: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Mark this user as a system administrator.
    pub fn elevated(mut self) -> Self {
        self.is_elevated = true;
        self
    }

    /// Deactivate the account.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
