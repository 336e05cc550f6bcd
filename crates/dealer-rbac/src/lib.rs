//! # Dealer RBAC vocabulary
//!
//! This crate defines the permission vocabulary for the DealerDesk
//! platform: the functional modules, the actions that can be performed
//! within them, and the permission sets roles are built from.
//!
//! ## Overview
//!
//! ```text
//! ModulePermission = Module + Action
//!
//! Examples:
//!   "orders:create"              - Create orders
//!   "notification_rules:update"  - Edit notification routing rules
//!   "roles:manage"               - Full role administration
//! ```
//!
//! A [`PermissionSet`] is the bundle of permissions a role grants.
//! Permission checks are strictly additive: a set either contains a
//! grant (possibly via an implied action such as `manage`) or the
//! check fails. There is no deny entry in this model.
//!
//! ## Module visibility
//!
//! Whether a user can *see* a module at all is decided by a
//! [`VisibilityPolicy`]: a declarative mapping from module to the set
//! of actions any one of which implies module access. The mapping is
//! configuration, not hard-coded per call site.
//!
//! ## Usage
//!
//! ```rust
//! use dealer_rbac::{Action, Module, ModulePermission, PermissionSet};
//!
//! let mut set = PermissionSet::new();
//! set.add(ModulePermission::new(Module::Orders, Action::Create));
//! set.add(ModulePermission::new(Module::Orders, Action::Read));
//!
//! assert!(set.has(&ModulePermission::new(Module::Orders, Action::Create)));
//! assert!(!set.has(&ModulePermission::new(Module::Orders, Action::Delete)));
//! ```

pub mod actions;
pub mod modules;
pub mod permissions;
pub mod policy;

// Re-export main types for convenience
pub use actions::Action;
pub use modules::Module;
pub use permissions::{ModulePermission, PermissionSet};
pub use policy::VisibilityPolicy;
