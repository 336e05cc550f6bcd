//! # Dealer identity and tenancy models
//!
//! This crate provides the identity and role-assignment domain models
//! for the DealerDesk multi-tenant platform: users, tenants (dealers),
//! roles with an explicit scope, role assignments, and tenant
//! memberships.
//!
//! ## Architecture
//!
//! ```text
//! User
//!   ├─ TenantMembership ─→ Tenant        (governs visibility)
//!   └─ RoleAssignment  ─→ Role           (governs capability)
//!                            └─ RoleScope: System | Tenant { tenant_id }
//! ```
//!
//! Membership and capability are deliberately distinct relations: a
//! user can belong to a dealer without holding any role there, and a
//! role row alone never makes a dealer visible.
//!
//! ## Role scope
//!
//! A role is either SYSTEM-scoped (applies everywhere, carries no
//! tenant) or TENANT-scoped (applies to exactly one dealer). The scope
//! is a tagged variant validated at construction; the inconsistent
//! states the source platform allowed (a "system" role carrying a
//! tenant id, a tenant role missing one) cannot be represented.
//!
//! ## Usage
//!
//! ```rust
//! use dealer_org::{Role, RoleAssignment, TenantMembership, User};
//! use dealer_rbac::PermissionSet;
//! use uuid::Uuid;
//!
//! let user = User::new("Dana Reyes", "dana@example.com");
//! let tenant_id = Uuid::now_v7();
//!
//! let role = Role::new_tenant(
//!     "dealer_admin",
//!     tenant_id,
//!     PermissionSet::from_strs(&["notification_rules:create"]),
//! );
//!
//! let membership = TenantMembership::new(tenant_id, user.id);
//! let assignment = RoleAssignment::new(user.id, role.id).scoped_to(tenant_id);
//! assert!(membership.is_current());
//! assert!(assignment.is_current());
//! ```

pub mod assignment;
pub mod membership;
pub mod role;
pub mod tenant;
pub mod user;

// Re-export main types for convenience
pub use assignment::RoleAssignment;
pub use membership::TenantMembership;
pub use role::{Role, RoleDefinitionError, RoleScope};
pub use tenant::{Tenant, TenantStatus};
pub use user::User;
