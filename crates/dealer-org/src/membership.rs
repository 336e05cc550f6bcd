//! Tenant membership domain model
//!
//! Membership records that a user is affiliated with a dealer,
//! independent of which role (if any) they hold there. Membership
//! existence governs *visibility*; role assignment governs
//! *capability*. The two are never conflated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's affiliation with a tenant.
///
/// # Examples
///
/// ```
/// use dealer_org::TenantMembership;
/// use uuid::Uuid;
///
/// let tenant_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let mut membership = TenantMembership::new(tenant_id, user_id);
/// assert!(membership.is_current());
///
/// membership.revoke();
/// assert!(!membership.is_current());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantMembership {
    /// Unique membership ID
    pub id: Uuid,

    /// Tenant ID
    pub tenant_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Whether the membership is active
    pub is_active: bool,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// Who invited this user (if applicable)
    pub invited_by: Option<Uuid>,

    /// When the membership was revoked, if it has been
    pub revoked_at: Option<DateTime<Utc>>,
}

impl TenantMembership {
    /// Creates a new active membership.
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The tenant ID
    /// * `user_id` - The user ID
    pub fn new(tenant_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            user_id,
            is_active: true,
            joined_at: Utc::now(),
            invited_by: None,
            revoked_at: None,
        }
    }

    /// Set who invited this user.
    pub fn with_inviter(mut self, inviter_id: Uuid) -> Self {
        self.invited_by = Some(inviter_id);
        self
    }

    /// Revoke the membership.
    ///
    /// The next visibility resolution for this user must not surface
    /// the tenant; there is no grace window.
    pub fn revoke(&mut self) {
        self.is_active = false;
        self.revoked_at = Some(Utc::now());
    }

    /// Check whether the membership currently counts.
    pub fn is_current(&self) -> bool {
        self.is_active && self.revoked_at.is_none()
    }
}
