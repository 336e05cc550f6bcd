//! Permission aggregator
//!
//! Merges the permission sets of a user's resolved roles into one
//! effective set for a tenant context. Union only: holding multiple
//! roles is strictly additive, and there is no deny permission to
//! tie-break against.

use uuid::Uuid;

use dealer_org::{Role, User};
use dealer_rbac::{Action, Module, ModulePermission, PermissionSet, VisibilityPolicy};

/// The computed union of permissions a user holds in a tenant context.
///
/// Derived on demand, never persisted. For elevated users the set is
/// the full permission catalog regardless of role rows; this is the
/// recognized system-administrator override.
#[derive(Debug, Clone)]
pub struct EffectivePermissionSet {
    permissions: PermissionSet,
    elevated: bool,
    tenant_ctx: Option<Uuid>,
}

impl EffectivePermissionSet {
    /// Check whether a specific module/action is permitted.
    ///
    /// Default is deny: absence of a grant is always `false`.
    pub fn allows(&self, module: Module, action: Action) -> bool {
        if self.elevated {
            return true;
        }
        self.permissions.has(&ModulePermission::new(module, action))
    }

    /// Check whether the module as a whole is accessible under a
    /// visibility policy.
    pub fn allows_module(&self, module: Module, policy: &VisibilityPolicy) -> bool {
        policy.grants_module_access(&self.permissions, module)
    }

    /// The underlying permission set.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Whether this set came from the elevated override.
    pub fn is_elevated(&self) -> bool {
        self.elevated
    }

    /// The tenant context this set was computed for.
    pub fn tenant_ctx(&self) -> Option<Uuid> {
        self.tenant_ctx
    }
}

/// Merge role permission sets into one effective set.
///
/// System-scoped roles contribute everywhere. Tenant-scoped roles
/// contribute only when the context names their tenant; a `None`
/// context means "system-wide evaluation" and admits system roles
/// only. Elevated users short-circuit to the full catalog.
///
/// # Arguments
///
/// * `user` - The user the roles belong to (carries the elevated flag)
/// * `roles` - The user's resolved roles
/// * `tenant_ctx` - The tenant being evaluated, or `None` for a
///   system-wide check
pub fn aggregate(user: &User, roles: &[Role], tenant_ctx: Option<Uuid>) -> EffectivePermissionSet {
    if user.is_elevated {
        return EffectivePermissionSet {
            permissions: PermissionSet::full_catalog(),
            elevated: true,
            tenant_ctx,
        };
    }

    let mut permissions = PermissionSet::new();
    for role in roles {
        if role.applies_in(tenant_ctx) {
            permissions.merge(&role.permissions);
        }
    }

    EffectivePermissionSet {
        permissions,
        elevated: false,
        tenant_ctx,
    }
}
