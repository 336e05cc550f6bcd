//! Directory store adapter
//!
//! The core reads identity, role, and membership records through the
//! [`DirectoryStore`] trait and never touches persistence directly.
//! Any relational or document store can back it. Missing records are
//! `Ok(None)`; only infrastructure failure is an error, and decision
//! paths fail closed on it.
//!
//! [`DirectoryStoreMut`] carries the writes the administrative
//! mutation gate applies. [`MemoryDirectory`] implements both for
//! tests and single-process embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use dealer_org::{Role, RoleAssignment, Tenant, TenantMembership, User};

use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read interface over identity, role, and membership records.
///
/// These are the only reads the resolution core requires. All listing
/// methods return *currently active* records only; revoked or
/// deactivated rows never cross this boundary.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Look up a user by id.
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>>;

    /// Look up a tenant by id.
    async fn get_tenant(&self, tenant_id: Uuid) -> StoreResult<Option<Tenant>>;

    /// Look up a role definition by id.
    async fn get_role(&self, role_id: Uuid) -> StoreResult<Option<Role>>;

    /// List a user's active role assignments.
    async fn list_active_assignments_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<RoleAssignment>>;

    /// List a user's active tenant memberships.
    async fn list_active_memberships_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<TenantMembership>>;

    /// List every tenant with `Active` status.
    async fn list_active_tenants(&self) -> StoreResult<Vec<Tenant>>;

    /// List the user ids holding an active membership to a tenant.
    async fn list_active_members_of_tenant(&self, tenant_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// List active users carrying the elevated flag.
    async fn list_elevated_users(&self) -> StoreResult<Vec<User>>;
}

/// Write interface consumed by the administrative mutation gate.
///
/// The gate authorizes every call before it reaches the store and
/// invalidates the affected user's cached decisions afterwards; code
/// writing through this trait directly bypasses both.
#[async_trait]
pub trait DirectoryStoreMut: DirectoryStore {
    /// Insert or replace a tenant record.
    async fn put_tenant(&self, tenant: Tenant) -> StoreResult<()>;

    /// Insert or replace a role definition.
    async fn put_role(&self, role: Role) -> StoreResult<()>;

    /// Insert or replace a role assignment.
    async fn put_assignment(&self, assignment: RoleAssignment) -> StoreResult<()>;

    /// Insert or replace a tenant membership.
    async fn put_membership(&self, membership: TenantMembership) -> StoreResult<()>;

    /// Look up a role assignment by id, active or not.
    async fn get_assignment(&self, assignment_id: Uuid) -> StoreResult<Option<RoleAssignment>>;

    /// Look up a tenant membership by id, active or not.
    async fn get_membership(&self, membership_id: Uuid) -> StoreResult<Option<TenantMembership>>;

    /// Revoke a role assignment.
    ///
    /// # Returns
    ///
    /// The revoked record, or `None` if the id is unknown
    async fn revoke_assignment(&self, assignment_id: Uuid) -> StoreResult<Option<RoleAssignment>>;

    /// Revoke a tenant membership.
    ///
    /// # Returns
    ///
    /// The revoked record, or `None` if the id is unknown
    async fn revoke_membership(&self, membership_id: Uuid) -> StoreResult<Option<TenantMembership>>;
}

#[derive(Default)]
struct MemoryInner {
    users: HashMap<Uuid, User>,
    tenants: HashMap<Uuid, Tenant>,
    roles: HashMap<Uuid, Role>,
    assignments: HashMap<Uuid, RoleAssignment>,
    memberships: HashMap<Uuid, TenantMembership>,
}

/// In-memory directory store.
///
/// Suitable for tests and single-process embedding; production
/// deployments implement the traits over their own store.
///
/// Includes two fault-injection switches used by the test suite:
/// [`MemoryDirectory::set_unavailable`] makes every call fail with
/// [`StoreError::Unavailable`], and [`MemoryDirectory::set_latency`]
/// delays every call, which is how the decision timeout path is
/// exercised.
pub struct MemoryDirectory {
    inner: RwLock<MemoryInner>,
    unavailable: AtomicBool,
    latency: RwLock<Option<Duration>>,
}

impl std::fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDirectory")
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryDirectory {
    /// Create a new empty in-memory directory.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner::default()),
            unavailable: AtomicBool::new(false),
            latency: RwLock::new(None),
        }
    }

    /// Simulate the backing store being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Add artificial latency to every store call.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    /// Seed a user record.
    pub async fn add_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    /// Seed a tenant record.
    pub async fn add_tenant(&self, tenant: Tenant) {
        self.inner.write().await.tenants.insert(tenant.id, tenant);
    }

    /// Seed a role definition.
    pub async fn add_role(&self, role: Role) {
        self.inner.write().await.roles.insert(role.id, role);
    }

    /// Seed a role assignment.
    pub async fn add_assignment(&self, assignment: RoleAssignment) {
        self.inner
            .write()
            .await
            .assignments
            .insert(assignment.id, assignment);
    }

    /// Seed a tenant membership.
    pub async fn add_membership(&self, membership: TenantMembership) {
        self.inner
            .write()
            .await
            .memberships
            .insert(membership.id, membership);
    }

    async fn gate_faults(&self) -> StoreResult<()> {
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable(
                "memory directory marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        self.gate_faults().await?;
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn get_tenant(&self, tenant_id: Uuid) -> StoreResult<Option<Tenant>> {
        self.gate_faults().await?;
        Ok(self.inner.read().await.tenants.get(&tenant_id).cloned())
    }

    async fn get_role(&self, role_id: Uuid) -> StoreResult<Option<Role>> {
        self.gate_faults().await?;
        Ok(self.inner.read().await.roles.get(&role_id).cloned())
    }

    async fn list_active_assignments_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<RoleAssignment>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .assignments
            .values()
            .filter(|a| a.user_id == user_id && a.is_current())
            .cloned()
            .collect())
    }

    async fn list_active_memberships_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<TenantMembership>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .memberships
            .values()
            .filter(|m| m.user_id == user_id && m.is_current())
            .cloned()
            .collect())
    }

    async fn list_active_tenants(&self) -> StoreResult<Vec<Tenant>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .tenants
            .values()
            .filter(|t| t.is_active())
            .cloned()
            .collect())
    }

    async fn list_active_members_of_tenant(&self, tenant_id: Uuid) -> StoreResult<Vec<Uuid>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .memberships
            .values()
            .filter(|m| m.tenant_id == tenant_id && m.is_current())
            .map(|m| m.user_id)
            .collect())
    }

    async fn list_elevated_users(&self) -> StoreResult<Vec<User>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .filter(|u| u.is_elevated && u.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DirectoryStoreMut for MemoryDirectory {
    async fn put_tenant(&self, tenant: Tenant) -> StoreResult<()> {
        self.gate_faults().await?;
        self.inner.write().await.tenants.insert(tenant.id, tenant);
        Ok(())
    }

    async fn put_role(&self, role: Role) -> StoreResult<()> {
        self.gate_faults().await?;
        self.inner.write().await.roles.insert(role.id, role);
        Ok(())
    }

    async fn put_assignment(&self, assignment: RoleAssignment) -> StoreResult<()> {
        self.gate_faults().await?;
        self.inner
            .write()
            .await
            .assignments
            .insert(assignment.id, assignment);
        Ok(())
    }

    async fn put_membership(&self, membership: TenantMembership) -> StoreResult<()> {
        self.gate_faults().await?;
        self.inner
            .write()
            .await
            .memberships
            .insert(membership.id, membership);
        Ok(())
    }

    async fn get_assignment(&self, assignment_id: Uuid) -> StoreResult<Option<RoleAssignment>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .assignments
            .get(&assignment_id)
            .cloned())
    }

    async fn get_membership(&self, membership_id: Uuid) -> StoreResult<Option<TenantMembership>> {
        self.gate_faults().await?;
        Ok(self
            .inner
            .read()
            .await
            .memberships
            .get(&membership_id)
            .cloned())
    }

    async fn revoke_assignment(&self, assignment_id: Uuid) -> StoreResult<Option<RoleAssignment>> {
        self.gate_faults().await?;
        let mut inner = self.inner.write().await;
        match inner.assignments.get_mut(&assignment_id) {
            Some(assignment) => {
                assignment.revoke();
                Ok(Some(assignment.clone()))
            }
            None => Ok(None),
        }
    }

    async fn revoke_membership(&self, membership_id: Uuid) -> StoreResult<Option<TenantMembership>> {
        self.gate_faults().await?;
        let mut inner = self.inner.write().await;
        match inner.memberships.get_mut(&membership_id) {
            Some(membership) => {
                membership.revoke();
                Ok(Some(membership.clone()))
            }
            None => Ok(None),
        }
    }
}
