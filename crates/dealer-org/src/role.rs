//! Role definitions with explicit scope
//!
//! This module is the role catalog's record type. The defining design
//! decision is [`RoleScope`]: a tagged variant that replaces the
//! source platform's nullable `tenant_id` discriminant. A role that
//! claims to be system-wide while carrying a tenant, or tenant-bound
//! without one, is rejected when the record is constructed, never
//! silently tolerated at resolution time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use dealer_rbac::PermissionSet;

/// Errors raised when a role definition violates the scope invariant.
///
/// These surface to the administrative caller for correction; the
/// resolver never auto-repairs a bad record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleDefinitionError {
    /// A system-scoped role carried a tenant id
    #[error("system-scoped role must not carry a tenant id")]
    SystemRoleWithTenant,

    /// A tenant-scoped role was missing its tenant id
    #[error("tenant-scoped role requires a tenant id")]
    TenantRoleWithoutTenant,

    /// The scope discriminant was not recognized
    #[error("unknown role scope: {0}")]
    UnknownScope(String),
}

/// The scope a role applies within.
///
/// Exactly one of the two shapes is representable:
/// - `System`: applies everywhere, no tenant attached
/// - `Tenant { tenant_id }`: applies within one dealer only
///
/// Records arriving from storage with a separate scope string and
/// optional tenant column go through [`RoleScope::from_parts`], which
/// enforces the invariant.
///
/// # Examples
///
/// ```
/// use dealer_org::{RoleDefinitionError, RoleScope};
/// use uuid::Uuid;
///
/// let tenant_id = Uuid::now_v7();
/// assert!(RoleScope::from_parts("system", None).is_ok());
/// assert!(RoleScope::from_parts("tenant", Some(tenant_id)).is_ok());
///
/// // The two inconsistent shapes are rejected at construction
/// assert_eq!(
///     RoleScope::from_parts("system", Some(tenant_id)),
///     Err(RoleDefinitionError::SystemRoleWithTenant),
/// );
/// assert_eq!(
///     RoleScope::from_parts("tenant", None),
///     Err(RoleDefinitionError::TenantRoleWithoutTenant),
/// );
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RoleScope {
    /// Global role, not tied to any tenant
    System,

    /// Role bound to a single tenant
    Tenant {
        /// The dealer this role is defined for
        tenant_id: Uuid,
    },
}

impl RoleScope {
    /// Build a scope from a raw discriminant and optional tenant id.
    ///
    /// This is the write-time validation gate for records coming from
    /// external storage.
    ///
    /// # Arguments
    ///
    /// * `scope` - Scope discriminant (case-insensitive)
    /// * `tenant_id` - Tenant id, required iff scope is `tenant`
    pub fn from_parts(
        scope: &str,
        tenant_id: Option<Uuid>,
    ) -> Result<Self, RoleDefinitionError> {
        match (scope.to_lowercase().as_str(), tenant_id) {
            ("system", None) => Ok(RoleScope::System),
            ("system", Some(_)) => Err(RoleDefinitionError::SystemRoleWithTenant),
            ("tenant", Some(tenant_id)) => Ok(RoleScope::Tenant { tenant_id }),
            ("tenant", None) => Err(RoleDefinitionError::TenantRoleWithoutTenant),
            (other, _) => Err(RoleDefinitionError::UnknownScope(other.to_string())),
        }
    }

    /// Get the string representation of the scope discriminant.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleScope::System => "system",
            RoleScope::Tenant { .. } => "tenant",
        }
    }

    /// The tenant this scope is bound to, if any.
    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            RoleScope::System => None,
            RoleScope::Tenant { tenant_id } => Some(*tenant_id),
        }
    }

    /// Check if this is a system-wide scope.
    pub fn is_system(&self) -> bool {
        matches!(self, RoleScope::System)
    }
}

/// A named bundle of permissions with a scope.
///
/// Roles are created and edited by administrative actions outside this
/// core; the core only reads them. A role may be deactivated, at which
/// point assignments referencing it become inert.
///
/// # Examples
///
/// ```
/// use dealer_org::{Role, RoleScope};
/// use dealer_rbac::PermissionSet;
/// use uuid::Uuid;
///
/// let tenant_id = Uuid::now_v7();
/// let role = Role::new_tenant(
///     "dealer_admin",
///     tenant_id,
///     PermissionSet::from_strs(&["notification_rules:create", "notification_rules:update"]),
/// );
/// assert_eq!(role.scope.tenant_id(), Some(tenant_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier
    pub id: Uuid,

    /// Role name (unique within its scope)
    pub name: String,

    /// Optional description for administrators
    pub description: Option<String>,

    /// Scope the role applies within
    #[serde(flatten)]
    pub scope: RoleScope,

    /// Permissions the role grants
    pub permissions: PermissionSet,

    /// Whether the role is active
    pub is_active: bool,

    /// When the role was created
    pub created_at: DateTime<Utc>,

    /// When the role was last updated
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new system-scoped role.
    pub fn new_system(name: impl Into<String>, permissions: PermissionSet) -> Self {
        Self::with_scope(name, RoleScope::System, permissions)
    }

    /// Creates a new tenant-scoped role.
    pub fn new_tenant(
        name: impl Into<String>,
        tenant_id: Uuid,
        permissions: PermissionSet,
    ) -> Self {
        Self::with_scope(name, RoleScope::Tenant { tenant_id }, permissions)
    }

    /// Creates a role with an already-validated scope.
    pub fn with_scope(
        name: impl Into<String>,
        scope: RoleScope,
        permissions: PermissionSet,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            scope,
            permissions,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a role from raw stored parts, validating the scope
    /// invariant.
    ///
    /// # Arguments
    ///
    /// * `name` - Role name
    /// * `scope` - Scope discriminant string
    /// * `tenant_id` - Tenant column, required iff scope is `tenant`
    /// * `permissions` - Granted permissions
    pub fn from_parts(
        name: impl Into<String>,
        scope: &str,
        tenant_id: Option<Uuid>,
        permissions: PermissionSet,
    ) -> Result<Self, RoleDefinitionError> {
        Ok(Self::with_scope(
            name,
            RoleScope::from_parts(scope, tenant_id)?,
            permissions,
        ))
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Deactivate the role. Assignments referencing it become inert.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Check whether this role contributes in the given tenant context.
    ///
    /// System roles apply everywhere. Tenant roles apply only when the
    /// context names their tenant; a `None` context means "system-wide
    /// evaluation" and admits only system roles.
    pub fn applies_in(&self, tenant_ctx: Option<Uuid>) -> bool {
        match self.scope {
            RoleScope::System => true,
            RoleScope::Tenant { tenant_id } => tenant_ctx == Some(tenant_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_parts_valid() {
        let tenant_id = Uuid::now_v7();

        assert_eq!(RoleScope::from_parts("system", None), Ok(RoleScope::System));
        assert_eq!(
            RoleScope::from_parts("TENANT", Some(tenant_id)),
            Ok(RoleScope::Tenant { tenant_id }),
        );
    }

    #[test]
    fn test_scope_invariant_rejected_at_construction() {
        let tenant_id = Uuid::now_v7();

        assert_eq!(
            RoleScope::from_parts("system", Some(tenant_id)),
            Err(RoleDefinitionError::SystemRoleWithTenant),
        );
        assert_eq!(
            RoleScope::from_parts("tenant", None),
            Err(RoleDefinitionError::TenantRoleWithoutTenant),
        );
        assert_eq!(
            RoleScope::from_parts("global", None),
            Err(RoleDefinitionError::UnknownScope("global".to_string())),
        );
    }

    #[test]
    fn test_role_from_parts_propagates_invariant() {
        let tenant_id = Uuid::now_v7();
        let perms = PermissionSet::from_strs(&["orders:read"]);

        assert!(Role::from_parts("ops", "system", None, perms.clone()).is_ok());
        assert_eq!(
            Role::from_parts("ops", "system", Some(tenant_id), perms).unwrap_err(),
            RoleDefinitionError::SystemRoleWithTenant,
        );
    }

    #[test]
    fn test_role_applies_in_context() {
        let tenant_id = Uuid::now_v7();
        let other = Uuid::now_v7();
        let perms = PermissionSet::from_strs(&["orders:read"]);

        let system = Role::new_system("ops", perms.clone());
        let scoped = Role::new_tenant("dealer_admin", tenant_id, perms);

        assert!(system.applies_in(Some(tenant_id)));
        assert!(system.applies_in(None));

        assert!(scoped.applies_in(Some(tenant_id)));
        assert!(!scoped.applies_in(Some(other)));
        assert!(!scoped.applies_in(None));
    }

    #[test]
    fn test_role_deactivate() {
        let mut role = Role::new_system("ops", PermissionSet::new());
        assert!(role.is_active);
        role.deactivate();
        assert!(!role.is_active);
    }

    #[test]
    fn test_scope_serde_shape() {
        let system = serde_json::to_value(RoleScope::System).unwrap();
        assert_eq!(system["scope"], "system");
        assert!(system.get("tenant_id").is_none());

        let tenant_id = Uuid::now_v7();
        let scoped = serde_json::to_value(RoleScope::Tenant { tenant_id }).unwrap();
        assert_eq!(scoped["scope"], "tenant");
        assert_eq!(scoped["tenant_id"], tenant_id.to_string());
    }
}
