//! Tenant visibility resolver
//!
//! Derives the list of tenants a user may see and act within. This is
//! a pure function of current membership and tenant state; it never
//! consults a client-side snapshot.

use uuid::Uuid;

use dealer_org::Tenant;

use crate::error::{AuthzError, AuthzResult};
use crate::store::DirectoryStore;

/// Resolve the tenants visible to a user, ordered by name.
///
/// Elevated users see every tenant with `Active` status. Everyone else
/// sees the tenants where they hold an active membership *and* the
/// tenant itself is active: membership to a suspended or deleted
/// dealer does not surface it.
///
/// # Errors
///
/// [`AuthzError::UserNotFound`] for an unknown user id.
pub async fn visible_tenants<S: DirectoryStore + ?Sized>(
    store: &S,
    user_id: Uuid,
) -> AuthzResult<Vec<Tenant>> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or(AuthzError::UserNotFound(user_id))?;

    let mut tenants: Vec<Tenant> = if user.is_elevated {
        store.list_active_tenants().await?
    } else {
        let memberships = store.list_active_memberships_for_user(user_id).await?;
        let mut visible = Vec::with_capacity(memberships.len());
        for membership in memberships {
            if let Some(tenant) = store.get_tenant(membership.tenant_id).await? {
                if tenant.is_active() && !visible.iter().any(|t: &Tenant| t.id == tenant.id) {
                    visible.push(tenant);
                }
            }
        }
        visible
    };

    tenants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(tenants)
}
