//! Role assignment domain model
//!
//! An assignment grants a user a role. Users hold role *sets*: zero,
//! one, or many assignments at once, each independently revocable. A
//! revoked assignment contributes nothing on the very next resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grant of a role to a user.
///
/// `tenant_id` mirrors the role's scope when the role is
/// tenant-scoped; system-scoped roles are assigned without one. An
/// assignment whose role or tenant has since been deleted is inert: it
/// contributes no permissions but is flagged for out-of-band cleanup
/// rather than silently dropped.
///
/// # Examples
///
/// ```
/// use dealer_org::RoleAssignment;
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let role_id = Uuid::now_v7();
/// let tenant_id = Uuid::now_v7();
///
/// let assignment = RoleAssignment::new(user_id, role_id).scoped_to(tenant_id);
/// assert!(assignment.is_current());
/// assert_eq!(assignment.tenant_id, Some(tenant_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Unique assignment ID
    pub id: Uuid,

    /// User holding the role
    pub user_id: Uuid,

    /// Role being granted
    pub role_id: Uuid,

    /// Tenant the grant is scoped to, for tenant-scoped roles
    pub tenant_id: Option<Uuid>,

    /// Whether the assignment is active
    pub is_active: bool,

    /// When the role was granted
    pub assigned_at: DateTime<Utc>,

    /// Who granted it (if applicable)
    pub assigned_by: Option<Uuid>,

    /// When the grant was revoked, if it has been
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RoleAssignment {
    /// Creates a new active assignment.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user receiving the role
    /// * `role_id` - The role being granted
    pub fn new(user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            role_id,
            tenant_id: None,
            is_active: true,
            assigned_at: Utc::now(),
            assigned_by: None,
            revoked_at: None,
        }
    }

    /// Scope the grant to a tenant (for tenant-scoped roles).
    pub fn scoped_to(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Set who granted the role.
    pub fn with_assigner(mut self, assigner_id: Uuid) -> Self {
        self.assigned_by = Some(assigner_id);
        self
    }

    /// Revoke the grant.
    ///
    /// No permission may outlive its assignment's active window: the
    /// next resolution for this user must not include this role.
    pub fn revoke(&mut self) {
        self.is_active = false;
        self.revoked_at = Some(Utc::now());
    }

    /// Check whether the grant currently counts.
    pub fn is_current(&self) -> bool {
        self.is_active && self.revoked_at.is_none()
    }
}
