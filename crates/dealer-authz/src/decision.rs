//! Access decision API
//!
//! [`AccessControl`] is the single entry point downstream collaborators
//! call. Every decision walks the same path: visibility gate first,
//! then role resolution, then aggregation, then the permission check.
//! Default is deny: absence of an explicit grant is never an allow.
//!
//! Decisions back every state-mutating request, so resolutions are
//! memoized per (user, tenant context) and each call runs under a
//! short timeout. On timeout the decision fails closed.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

use dealer_org::{Tenant, User};
use dealer_rbac::{Action, Module, VisibilityPolicy};

use crate::aggregator::{aggregate, EffectivePermissionSet};
use crate::cache::DecisionCache;
use crate::error::{AuthzError, AuthzResult};
use crate::resolver::resolve_roles;
use crate::store::DirectoryStore;
use crate::visibility::visible_tenants;

/// Tunables for the decision service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DecisionConfig {
    /// Safety upper bound on cached resolutions. Event-driven
    /// invalidation is the primary mechanism; this only caps how long
    /// a missed invalidation can linger.
    pub cache_ttl: Duration,

    /// Per-decision timeout. Decisions must be cheap; one that is not
    /// fails closed.
    pub decision_timeout: Duration,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(30),
            decision_timeout: Duration::from_secs(2),
        }
    }
}

/// The authorization decision service.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use dealer_authz::{AccessControl, MemoryDirectory};
/// use dealer_rbac::{Action, Module};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), dealer_authz::AuthzError> {
/// let store = Arc::new(MemoryDirectory::new());
/// let access = AccessControl::new(store);
///
/// let user_id = Uuid::now_v7();
/// let tenant_id = Uuid::now_v7();
/// let allowed = access
///     .can_perform(user_id, tenant_id, Module::Orders, Action::Create)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AccessControl<S> {
    store: Arc<S>,
    policy: VisibilityPolicy,
    cache: DecisionCache,
    config: DecisionConfig,
}

impl<S> std::fmt::Debug for AccessControl<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControl")
            .field("config", &self.config)
            .finish()
    }
}

impl<S: DirectoryStore> AccessControl<S> {
    /// Create a decision service with default config and visibility
    /// policy.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, DecisionConfig::default())
    }

    /// Create a decision service with explicit config.
    pub fn with_config(store: Arc<S>, config: DecisionConfig) -> Self {
        Self {
            store,
            policy: VisibilityPolicy::default(),
            cache: DecisionCache::new(config.cache_ttl),
            config,
        }
    }

    /// Replace the module visibility policy.
    pub fn with_policy(mut self, policy: VisibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The visibility policy in effect.
    pub fn policy(&self) -> &VisibilityPolicy {
        &self.policy
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Tenant-level gate: can the user see and act within the tenant
    /// at all?
    ///
    /// Checked before any module-level decision; a tenant that is not
    /// visible denies everything regardless of role contents.
    pub async fn can_access_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> AuthzResult<bool> {
        self.decide(user_id, Some(tenant_id), |_, visible| visible)
            .await
    }

    /// Can the user perform `action` in `module` within `tenant_id`?
    pub async fn can_perform(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        module: Module,
        action: Action,
    ) -> AuthzResult<bool> {
        self.decide(user_id, Some(tenant_id), |set, visible| {
            visible && set.allows(module, action)
        })
        .await
    }

    /// Can the user perform `action` in `module` outside any tenant?
    ///
    /// Used for system-wide administrative checks; only system-scoped
    /// roles (and the elevated override) contribute here.
    pub async fn can_perform_system(
        &self,
        user_id: Uuid,
        module: Module,
        action: Action,
    ) -> AuthzResult<bool> {
        self.decide(user_id, None, |set, _| set.allows(module, action))
            .await
    }

    /// The tenants the user may see, ordered by name.
    pub async fn list_visible_tenants(&self, user_id: Uuid) -> AuthzResult<Vec<Tenant>> {
        visible_tenants(self.store.as_ref(), user_id).await
    }

    /// The users who currently have access to `module` within a
    /// tenant.
    ///
    /// Applies exactly the same aggregation and visibility-policy rule
    /// as `can_perform`, so notification routing and reporting see the
    /// same truth as the mutation paths. Elevated users are always
    /// included while the tenant is active. Result is ordered by
    /// display name.
    pub async fn list_users_with_module_access(
        &self,
        tenant_id: Uuid,
        module: Module,
    ) -> AuthzResult<Vec<User>> {
        let tenant = self
            .store
            .get_tenant(tenant_id)
            .await?
            .ok_or(AuthzError::TenantNotFound(tenant_id))?;
        if !tenant.is_active() {
            return Ok(Vec::new());
        }

        let mut candidates = self.store.list_active_members_of_tenant(tenant_id).await?;
        for elevated in self.store.list_elevated_users().await? {
            if !candidates.contains(&elevated.id) {
                candidates.push(elevated.id);
            }
        }

        let mut eligible = Vec::new();
        for user_id in candidates {
            let (set, visible) = match self.resolve_for(user_id, Some(tenant_id)).await {
                Ok(resolution) => resolution,
                // A membership row pointing at a vanished user is the
                // same class of inconsistency as an orphaned
                // assignment: skip it, loudly.
                Err(AuthzError::UserNotFound(missing)) => {
                    tracing::warn!(user_id = %missing, tenant_id = %tenant_id,
                        "membership references an unknown user; skipping");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if visible && set.allows_module(module, &self.policy) {
                if let Some(user) = self.store.get_user(user_id).await? {
                    eligible.push(user);
                }
            }
        }

        eligible.sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id)));
        Ok(eligible)
    }

    /// Drop every cached resolution for a user.
    ///
    /// Mutation paths call this synchronously after any role
    /// assignment or membership change, which is what makes revocation
    /// visible on the very next decision.
    pub async fn invalidate_user(&self, user_id: Uuid) -> usize {
        self.cache.invalidate_user(user_id).await
    }

    /// Run one decision under the timeout, failing closed on expiry.
    async fn decide<F>(
        &self,
        user_id: Uuid,
        tenant_ctx: Option<Uuid>,
        check: F,
    ) -> AuthzResult<bool>
    where
        F: FnOnce(&EffectivePermissionSet, bool) -> bool,
    {
        match timeout(
            self.config.decision_timeout,
            self.resolve_for(user_id, tenant_ctx),
        )
        .await
        {
            Ok(Ok((set, visible))) => Ok(check(&set, visible)),
            Ok(Err(err)) => {
                if err.is_server_error() {
                    tracing::error!(user_id = %user_id, tenant = ?tenant_ctx, error = %err,
                        "decision backend failure; failing closed");
                }
                Err(err)
            }
            Err(_) => {
                tracing::warn!(user_id = %user_id, tenant = ?tenant_ctx,
                    "decision timed out; failing closed");
                Ok(false)
            }
        }
    }

    /// Resolve (or fetch memoized) effective permissions and the
    /// tenant-visibility verdict for one (user, tenant context) pair.
    async fn resolve_for(
        &self,
        user_id: Uuid,
        tenant_ctx: Option<Uuid>,
    ) -> AuthzResult<(Arc<EffectivePermissionSet>, bool)> {
        if let Some(hit) = self.cache.get(user_id, tenant_ctx).await {
            return Ok(hit);
        }

        // Captured before any store read. If the gate invalidates the
        // user while this resolution is in flight, the generation moves
        // and the insert below is discarded, so a pre-revocation
        // snapshot can never be written back over the invalidation.
        let generation = self.cache.generation(user_id).await;

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthzError::UserNotFound(user_id))?;

        let tenant_visible = match tenant_ctx {
            Some(tenant_id) => {
                let tenant = self
                    .store
                    .get_tenant(tenant_id)
                    .await?
                    .ok_or(AuthzError::TenantNotFound(tenant_id))?;
                if user.is_elevated {
                    tenant.is_active()
                } else {
                    tenant.is_active()
                        && self
                            .store
                            .list_active_memberships_for_user(user_id)
                            .await?
                            .iter()
                            .any(|m| m.tenant_id == tenant_id)
                }
            }
            // System-wide evaluation has no tenant gate.
            None => true,
        };

        let resolved = resolve_roles(self.store.as_ref(), user_id).await?;
        let set = Arc::new(aggregate(&user, &resolved.roles, tenant_ctx));

        self.cache
            .insert(user_id, tenant_ctx, set.clone(), tenant_visible, generation)
            .await;

        Ok((set, tenant_visible))
    }
}
