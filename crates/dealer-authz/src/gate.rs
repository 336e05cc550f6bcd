//! Administrative mutation gate
//!
//! Every write to roles, role assignments, and tenant memberships goes
//! through [`AdminGate`]: the actor is checked with the same decision
//! path as any other caller, the write is applied, and the affected
//! user's cached decisions are invalidated synchronously, which is
//! what gives revocation its read-after-write guarantee.
//!
//! The elevated-override path matters here: a system administrator
//! holds no tenant-scoped role rows, yet must pass tenant-scoped
//! administrative checks. The source platform looked only for a
//! tenant-specific admin role and locked its own administrators out;
//! routing the gate through [`AccessControl`] makes the override
//! apply uniformly.

use std::sync::Arc;
use uuid::Uuid;

use dealer_org::{Role, RoleAssignment, Tenant, TenantMembership};
use dealer_rbac::{Action, Module};

use crate::decision::AccessControl;
use crate::error::{AuthzError, AuthzResult};
use crate::store::DirectoryStoreMut;

/// Gate applying authorized administrative mutations.
///
/// Denials surface as [`AuthzError::Forbidden`], a distinct signal
/// callers branch on; they are the expected outcome of the gate, not
/// an exceptional one.
pub struct AdminGate<S: DirectoryStoreMut> {
    store: Arc<S>,
    decisions: Arc<AccessControl<S>>,
}

impl<S: DirectoryStoreMut> AdminGate<S> {
    /// Create a gate over a store and its decision service.
    ///
    /// Both should share the same store instance, otherwise the
    /// decisions the gate consults will not see the writes it applies.
    pub fn new(store: Arc<S>, decisions: Arc<AccessControl<S>>) -> Self {
        Self { store, decisions }
    }

    /// Create a tenant. A system-wide mutation: only system-scoped
    /// grants (or the elevated override) can pass.
    pub async fn create_tenant(&self, actor_id: Uuid, tenant: Tenant) -> AuthzResult<()> {
        self.authorize(actor_id, None, Module::Tenants, Action::Create)
            .await?;
        self.store.put_tenant(tenant).await?;
        Ok(())
    }

    /// Create a role definition.
    ///
    /// Tenant-scoped roles are checked against their tenant;
    /// system-scoped roles against the system-wide context.
    pub async fn create_role(&self, actor_id: Uuid, role: Role) -> AuthzResult<()> {
        self.authorize(actor_id, role.scope.tenant_id(), Module::Roles, Action::Create)
            .await?;
        self.store.put_role(role).await?;
        Ok(())
    }

    /// Grant a role to a user.
    ///
    /// The assignment's tenant pin is derived from the role's scope
    /// here, so a grant that disagrees with its role cannot be written.
    ///
    /// # Errors
    ///
    /// [`AuthzError::RoleNotFound`] if the role does not exist,
    /// [`AuthzError::Forbidden`] if the actor may not administer roles
    /// in the role's scope.
    pub async fn grant_role(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> AuthzResult<RoleAssignment> {
        let role = self
            .store
            .get_role(role_id)
            .await?
            .ok_or(AuthzError::RoleNotFound(role_id))?;
        let tenant_id = role.scope.tenant_id();

        self.authorize(actor_id, tenant_id, Module::Roles, Action::Create)
            .await?;

        let mut assignment = RoleAssignment::new(user_id, role_id).with_assigner(actor_id);
        if let Some(tenant_id) = tenant_id {
            assignment = assignment.scoped_to(tenant_id);
        }
        self.store.put_assignment(assignment.clone()).await?;
        self.decisions.invalidate_user(user_id).await;

        tracing::debug!(actor = %actor_id, user = %user_id, role = %role_id, "role granted");
        Ok(assignment)
    }

    /// Revoke a role assignment.
    ///
    /// The revoked grant stops contributing on the affected user's
    /// very next decision.
    pub async fn revoke_role(
        &self,
        actor_id: Uuid,
        assignment_id: Uuid,
    ) -> AuthzResult<RoleAssignment> {
        let assignment = self
            .store
            .get_assignment(assignment_id)
            .await?
            .ok_or(AuthzError::AssignmentNotFound(assignment_id))?;

        self.authorize(actor_id, assignment.tenant_id, Module::Roles, Action::Delete)
            .await?;

        let revoked = self
            .store
            .revoke_assignment(assignment_id)
            .await?
            .ok_or(AuthzError::AssignmentNotFound(assignment_id))?;
        self.decisions.invalidate_user(revoked.user_id).await;

        tracing::debug!(actor = %actor_id, user = %revoked.user_id, assignment = %assignment_id,
            "role assignment revoked");
        Ok(revoked)
    }

    /// Affiliate a user with a tenant.
    pub async fn grant_membership(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> AuthzResult<TenantMembership> {
        self.authorize(actor_id, Some(tenant_id), Module::Tenants, Action::Update)
            .await?;

        let membership = TenantMembership::new(tenant_id, user_id).with_inviter(actor_id);
        self.store.put_membership(membership.clone()).await?;
        self.decisions.invalidate_user(user_id).await;

        tracing::debug!(actor = %actor_id, user = %user_id, tenant = %tenant_id,
            "membership granted");
        Ok(membership)
    }

    /// End a user's affiliation with a tenant.
    ///
    /// The tenant stops surfacing for the user on their very next
    /// visibility resolution.
    pub async fn revoke_membership(
        &self,
        actor_id: Uuid,
        membership_id: Uuid,
    ) -> AuthzResult<TenantMembership> {
        let membership = self
            .store
            .get_membership(membership_id)
            .await?
            .ok_or(AuthzError::MembershipNotFound(membership_id))?;

        self.authorize(
            actor_id,
            Some(membership.tenant_id),
            Module::Tenants,
            Action::Update,
        )
        .await?;

        let revoked = self
            .store
            .revoke_membership(membership_id)
            .await?
            .ok_or(AuthzError::MembershipNotFound(membership_id))?;
        self.decisions.invalidate_user(revoked.user_id).await;

        tracing::debug!(actor = %actor_id, user = %revoked.user_id, membership = %membership_id,
            "membership revoked");
        Ok(revoked)
    }

    /// Check the actor through the regular decision path, turning a
    /// deny into the distinct `Forbidden` signal.
    async fn authorize(
        &self,
        actor_id: Uuid,
        tenant_id: Option<Uuid>,
        module: Module,
        action: Action,
    ) -> AuthzResult<()> {
        let allowed = match tenant_id {
            Some(tenant_id) => {
                self.decisions
                    .can_perform(actor_id, tenant_id, module, action)
                    .await?
            }
            None => {
                self.decisions
                    .can_perform_system(actor_id, module, action)
                    .await?
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(AuthzError::Forbidden {
                user_id: actor_id,
                module: module.as_str().to_string(),
                action: action.as_str().to_string(),
                tenant_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDirectory;
    use dealer_org::{Tenant, User};
    use dealer_rbac::PermissionSet;

    struct Fixture {
        store: Arc<MemoryDirectory>,
        access: Arc<AccessControl<MemoryDirectory>>,
        gate: AdminGate<MemoryDirectory>,
        admin: User,
        tenant: Tenant,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryDirectory::new());
        let admin = User::new("Sam Ops", "ops@example.com").elevated();
        let tenant = Tenant::new("Harbor Motors", "harbor-motors");
        store.add_user(admin.clone()).await;
        store.add_tenant(tenant.clone()).await;

        let access = Arc::new(AccessControl::new(store.clone()));
        let gate = AdminGate::new(store.clone(), access.clone());
        Fixture {
            store,
            access,
            gate,
            admin,
            tenant,
        }
    }

    #[tokio::test]
    async fn test_elevated_actor_passes_tenant_scoped_admin_check() {
        // Regression for the production defect: the global admin holds
        // no tenant-scoped role rows, yet must be able to create a
        // custom role for a tenant.
        let fx = fixture().await;
        let role = Role::new_tenant(
            "dealer_admin",
            fx.tenant.id,
            PermissionSet::from_strs(&["notification_rules:create"]),
        );

        fx.gate.create_role(fx.admin.id, role).await.unwrap();
    }

    #[tokio::test]
    async fn test_plain_user_denied_with_forbidden_signal() {
        let fx = fixture().await;
        let user = User::new("Dana", "dana@example.com");
        fx.store.add_user(user.clone()).await;

        let role = Role::new_tenant("dealer_admin", fx.tenant.id, PermissionSet::new());
        let err = fx.gate.create_role(user.id, role).await.unwrap_err();

        assert!(matches!(err, AuthzError::Forbidden { .. }));
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_grant_then_revoke_is_immediate() {
        let fx = fixture().await;
        let user = User::new("Dana", "dana@example.com");
        fx.store.add_user(user.clone()).await;
        fx.store
            .add_membership(TenantMembership::new(fx.tenant.id, user.id))
            .await;

        let role = Role::new_tenant(
            "order_entry",
            fx.tenant.id,
            PermissionSet::from_strs(&["orders:create"]),
        );
        fx.store.add_role(role.clone()).await;

        let assignment = fx
            .gate
            .grant_role(fx.admin.id, user.id, role.id)
            .await
            .unwrap();
        assert!(fx
            .access
            .can_perform(user.id, fx.tenant.id, Module::Orders, Action::Create)
            .await
            .unwrap());

        fx.gate
            .revoke_role(fx.admin.id, assignment.id)
            .await
            .unwrap();
        // No observation window of stale "true"
        assert!(!fx
            .access
            .can_perform(user.id, fx.tenant.id, Module::Orders, Action::Create)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_grant_derives_tenant_pin_from_role_scope() {
        let fx = fixture().await;
        let user = User::new("Dana", "dana@example.com");
        fx.store.add_user(user.clone()).await;

        let scoped = Role::new_tenant("dealer_admin", fx.tenant.id, PermissionSet::new());
        fx.store.add_role(scoped.clone()).await;
        let assignment = fx
            .gate
            .grant_role(fx.admin.id, user.id, scoped.id)
            .await
            .unwrap();
        assert_eq!(assignment.tenant_id, Some(fx.tenant.id));

        let system = Role::new_system("auditor", PermissionSet::new());
        fx.store.add_role(system.clone()).await;
        let assignment = fx
            .gate
            .grant_role(fx.admin.id, user.id, system.id)
            .await
            .unwrap();
        assert!(assignment.tenant_id.is_none());
    }

    #[tokio::test]
    async fn test_grant_unknown_role_is_not_found() {
        let fx = fixture().await;
        let err = fx
            .gate
            .grant_role(fx.admin.id, Uuid::now_v7(), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::RoleNotFound(_)));
    }

    #[tokio::test]
    async fn test_membership_revocation_hides_tenant_immediately() {
        let fx = fixture().await;
        let user = User::new("Dana", "dana@example.com");
        fx.store.add_user(user.clone()).await;

        let membership = fx
            .gate
            .grant_membership(fx.admin.id, user.id, fx.tenant.id)
            .await
            .unwrap();
        assert!(fx
            .access
            .can_access_tenant(user.id, fx.tenant.id)
            .await
            .unwrap());

        fx.gate
            .revoke_membership(fx.admin.id, membership.id)
            .await
            .unwrap();
        assert!(!fx
            .access
            .can_access_tenant(user.id, fx.tenant.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_tenant_admin_can_administer_own_tenant_only() {
        let fx = fixture().await;
        let manager = User::new("Riley", "riley@example.com");
        fx.store.add_user(manager.clone()).await;
        fx.store
            .add_membership(TenantMembership::new(fx.tenant.id, manager.id))
            .await;

        let admin_role = Role::new_tenant(
            "dealer_admin",
            fx.tenant.id,
            PermissionSet::from_strs(&["roles:manage", "tenants:update"]),
        );
        fx.store.add_role(admin_role.clone()).await;
        fx.store
            .add_assignment(
                RoleAssignment::new(manager.id, admin_role.id).scoped_to(fx.tenant.id),
            )
            .await;

        // Within their tenant: allowed
        let role = Role::new_tenant("order_entry", fx.tenant.id, PermissionSet::new());
        fx.gate.create_role(manager.id, role).await.unwrap();

        // System-wide tenant creation: denied
        let err = fx
            .gate
            .create_tenant(manager.id, Tenant::new("New Motors", "new-motors"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden { .. }));

        // Another tenant: denied
        let other = Tenant::new("Other Motors", "other-motors");
        fx.store.add_tenant(other.clone()).await;
        let foreign = Role::new_tenant("order_entry", other.id, PermissionSet::new());
        let err = fx.gate.create_role(manager.id, foreign).await.unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden { .. }));
    }
}
