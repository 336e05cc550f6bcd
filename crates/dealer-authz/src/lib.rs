//! # Dealer Authorization Core
//!
//! Permission resolution and access decisions for the DealerDesk
//! platform. Every capability is derived from role assignments at
//! decision time; nothing is trusted from the caller.
//!
//! ## Components
//!
//! - **Store traits** ([`DirectoryStore`], [`DirectoryStoreMut`]):
//!   the seam to the backing directory, with [`MemoryDirectory`] as
//!   the in-process implementation
//! - **Role resolver** ([`resolve_roles`]): assignments to validated
//!   role definitions, skipping orphaned and mismatched records
//! - **Aggregator** ([`aggregate`]): union of role permissions into an
//!   [`EffectivePermissionSet`], with the elevated override
//! - **Visibility** ([`visible_tenants`]): which dealers a user sees
//! - **Decisions** ([`AccessControl`]): the memoized `can_*` API every
//!   other service consults
//! - **Mutation gate** ([`AdminGate`]): authorized writes with
//!   synchronous cache invalidation
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use dealer_authz::{AccessControl, MemoryDirectory};
//! use dealer_org::{Role, RoleAssignment, Tenant, TenantMembership, User};
//! use dealer_rbac::{Action, Module, PermissionSet};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryDirectory::new());
//! let user = User::new("Dana", "dana@example.com");
//! let tenant = Tenant::new("Harbor Motors", "harbor-motors");
//! let role = Role::new_tenant(
//!     "order_entry",
//!     tenant.id,
//!     PermissionSet::from_strs(&["orders:create"]),
//! );
//!
//! store.add_user(user.clone()).await;
//! store.add_tenant(tenant.clone()).await;
//! store.add_role(role.clone()).await;
//! store
//!     .add_membership(TenantMembership::new(tenant.id, user.id))
//!     .await;
//! store
//!     .add_assignment(RoleAssignment::new(user.id, role.id).scoped_to(tenant.id))
//!     .await;
//!
//! let access = AccessControl::new(store);
//! let allowed = access
//!     .can_perform(user.id, tenant.id, Module::Orders, Action::Create)
//!     .await
//!     .unwrap();
//! assert!(allowed);
//! # }
//! ```

pub mod aggregator;
pub mod cache;
pub mod decision;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod store;
pub mod visibility;

pub use aggregator::{aggregate, EffectivePermissionSet};
pub use cache::DecisionCache;
pub use decision::{AccessControl, DecisionConfig};
pub use error::{AuthzError, AuthzResult, StoreError};
pub use gate::AdminGate;
pub use resolver::{resolve_roles, ResolvedRoles};
pub use store::{DirectoryStore, DirectoryStoreMut, MemoryDirectory, StoreResult};
pub use visibility::visible_tenants;
