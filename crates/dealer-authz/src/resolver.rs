//! Role resolver
//!
//! Collects every role a user currently holds, across both scopes,
//! re-validating each assignment against its role definition.
//! Inconsistent records are excluded and reported, never trusted.

use uuid::Uuid;

use dealer_org::{Role, RoleScope};

use crate::error::{AuthzError, AuthzResult};
use crate::store::DirectoryStore;

/// The outcome of resolving a user's roles.
///
/// "No roles" is a valid, common terminal state: a known user with no
/// assignments resolves to an empty set, not an error. Assignments
/// that reference missing records are inert but flagged for
/// out-of-band cleanup; they are never silently dropped or repaired.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRoles {
    /// The roles contributing to aggregation, de-duplicated by id
    pub roles: Vec<Role>,

    /// Assignment ids referencing a deleted or deactivated role, or a
    /// deleted tenant
    pub orphaned: Vec<Uuid>,

    /// Assignment ids whose tenant scope disagrees with their role's
    /// scope (e.g., a grant pinned to tenant A for a role defined for
    /// tenant B)
    pub rejected: Vec<Uuid>,
}

impl ResolvedRoles {
    /// Check whether any assignment needed flagging.
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty() && self.rejected.is_empty()
    }
}

/// Resolve every role a user currently holds.
///
/// Pure read; no caching and no side effects beyond logging flagged
/// records.
///
/// # Errors
///
/// [`AuthzError::UserNotFound`] for an unknown user id, distinct from
/// a known user with zero assignments, which resolves `Ok` and empty.
pub async fn resolve_roles<S: DirectoryStore + ?Sized>(
    store: &S,
    user_id: Uuid,
) -> AuthzResult<ResolvedRoles> {
    if store.get_user(user_id).await?.is_none() {
        return Err(AuthzError::UserNotFound(user_id));
    }

    let assignments = store.list_active_assignments_for_user(user_id).await?;

    let mut resolved = ResolvedRoles::default();
    let mut seen_roles: Vec<Uuid> = Vec::new();

    for assignment in assignments {
        let role = match store.get_role(assignment.role_id).await? {
            Some(role) if role.is_active => role,
            _ => {
                tracing::warn!(
                    assignment_id = %assignment.id,
                    role_id = %assignment.role_id,
                    user_id = %user_id,
                    "assignment references a missing or deactivated role; flagging as orphaned"
                );
                resolved.orphaned.push(assignment.id);
                continue;
            }
        };

        // The assignment's tenant pin must agree with the role's scope.
        if assignment.tenant_id != role.scope.tenant_id() {
            tracing::error!(
                assignment_id = %assignment.id,
                role_id = %role.id,
                assignment_tenant = ?assignment.tenant_id,
                role_scope = role.scope.as_str(),
                "assignment scope disagrees with role scope; excluding"
            );
            resolved.rejected.push(assignment.id);
            continue;
        }

        // A tenant-scoped role whose tenant was deleted is inert.
        if let RoleScope::Tenant { tenant_id } = role.scope {
            let tenant_alive = store
                .get_tenant(tenant_id)
                .await?
                .map(|t| !matches!(t.status, dealer_org::TenantStatus::Deleted))
                .unwrap_or(false);
            if !tenant_alive {
                tracing::warn!(
                    assignment_id = %assignment.id,
                    tenant_id = %tenant_id,
                    "assignment references a deleted tenant; flagging as orphaned"
                );
                resolved.orphaned.push(assignment.id);
                continue;
            }
        }

        if !seen_roles.contains(&role.id) {
            seen_roles.push(role.id);
            resolved.roles.push(role);
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDirectory;
    use dealer_org::{RoleAssignment, Tenant, User};
    use dealer_rbac::PermissionSet;

    async fn seeded_store() -> (MemoryDirectory, User, Tenant) {
        let store = MemoryDirectory::new();
        let user = User::new("Dana", "dana@example.com");
        let tenant = Tenant::new("Harbor Motors", "harbor-motors");
        store.add_user(user.clone()).await;
        store.add_tenant(tenant.clone()).await;
        (store, user, tenant)
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = MemoryDirectory::new();
        let err = resolve_roles(&store, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AuthzError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_no_assignments_is_empty_not_error() {
        let (store, user, _) = seeded_store().await;
        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert!(resolved.roles.is_empty());
        assert!(resolved.is_clean());
    }

    #[tokio::test]
    async fn test_resolves_roles_across_both_scopes() {
        let (store, user, tenant) = seeded_store().await;

        let system = Role::new_system("auditor", PermissionSet::from_strs(&["reports:read"]));
        let scoped = Role::new_tenant(
            "dealer_admin",
            tenant.id,
            PermissionSet::from_strs(&["orders:manage"]),
        );

        store.add_role(system.clone()).await;
        store.add_role(scoped.clone()).await;
        store
            .add_assignment(RoleAssignment::new(user.id, system.id))
            .await;
        store
            .add_assignment(RoleAssignment::new(user.id, scoped.id).scoped_to(tenant.id))
            .await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert_eq!(resolved.roles.len(), 2);
        assert!(resolved.is_clean());
    }

    #[tokio::test]
    async fn test_revoked_assignment_does_not_resolve() {
        let (store, user, _) = seeded_store().await;
        let role = Role::new_system("auditor", PermissionSet::from_strs(&["reports:read"]));
        store.add_role(role.clone()).await;

        let mut assignment = RoleAssignment::new(user.id, role.id);
        assignment.revoke();
        store.add_assignment(assignment).await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert!(resolved.roles.is_empty());
    }

    #[tokio::test]
    async fn test_missing_role_flags_orphan() {
        let (store, user, _) = seeded_store().await;
        let assignment = RoleAssignment::new(user.id, Uuid::now_v7());
        let assignment_id = assignment.id;
        store.add_assignment(assignment).await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert!(resolved.roles.is_empty());
        assert_eq!(resolved.orphaned, vec![assignment_id]);
    }

    #[tokio::test]
    async fn test_deactivated_role_flags_orphan() {
        let (store, user, _) = seeded_store().await;
        let mut role = Role::new_system("retired", PermissionSet::new());
        role.deactivate();
        store.add_role(role.clone()).await;
        store
            .add_assignment(RoleAssignment::new(user.id, role.id))
            .await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert!(resolved.roles.is_empty());
        assert_eq!(resolved.orphaned.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_tenant_flags_orphan() {
        let (store, user, tenant) = seeded_store().await;
        let mut gone = tenant.clone();
        gone.mark_deleted();
        store.add_tenant(gone).await;

        let role = Role::new_tenant("dealer_admin", tenant.id, PermissionSet::new());
        store.add_role(role.clone()).await;
        store
            .add_assignment(RoleAssignment::new(user.id, role.id).scoped_to(tenant.id))
            .await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert!(resolved.roles.is_empty());
        assert_eq!(resolved.orphaned.len(), 1);
    }

    #[tokio::test]
    async fn test_scope_mismatch_is_rejected() {
        let (store, user, tenant) = seeded_store().await;
        let other_tenant = Tenant::new("Other Motors", "other-motors");
        store.add_tenant(other_tenant.clone()).await;

        let role = Role::new_tenant("dealer_admin", tenant.id, PermissionSet::new());
        store.add_role(role.clone()).await;

        // Grant pinned to the wrong tenant
        store
            .add_assignment(RoleAssignment::new(user.id, role.id).scoped_to(other_tenant.id))
            .await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert!(resolved.roles.is_empty());
        assert_eq!(resolved.rejected.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_assignments_deduplicate() {
        let (store, user, _) = seeded_store().await;
        let role = Role::new_system("auditor", PermissionSet::from_strs(&["reports:read"]));
        store.add_role(role.clone()).await;
        store
            .add_assignment(RoleAssignment::new(user.id, role.id))
            .await;
        store
            .add_assignment(RoleAssignment::new(user.id, role.id))
            .await;

        let resolved = resolve_roles(&store, user.id).await.unwrap();
        assert_eq!(resolved.roles.len(), 1);
    }
}
