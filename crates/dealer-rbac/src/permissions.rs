//! # Permissions
//!
//! Core permission types and sets. A permission combines a module with
//! an action; a permission set is the bundle a role grants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::actions::Action;
use crate::modules::Module;

/// A granular permission: an action within a module.
///
/// This is the atomic unit role permission sets are built from.
///
/// # Example
///
/// ```
/// use dealer_rbac::{Action, Module, ModulePermission};
///
/// let perm = ModulePermission::new(Module::Orders, Action::Create);
/// assert_eq!(perm.to_string(), "orders:create");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ModulePermission {
    /// The module this permission applies to.
    pub module: Module,
    /// The action allowed within the module.
    pub action: Action,
}

impl ModulePermission {
    /// Create a new permission.
    pub fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }

    /// Parse from string form (e.g., "orders:create").
    ///
    /// # Returns
    ///
    /// `Some(ModulePermission)` if both halves parse, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_rbac::{Action, Module, ModulePermission};
    ///
    /// let perm = ModulePermission::parse("orders:create").unwrap();
    /// assert_eq!(perm.module, Module::Orders);
    /// assert_eq!(perm.action, Action::Create);
    ///
    /// assert!(ModulePermission::parse("orders").is_none());
    /// assert!(ModulePermission::parse("orders:fly").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let (module, action) = s.split_once(':')?;
        Some(Self {
            module: Module::parse(module)?,
            action: Action::parse(action)?,
        })
    }

    /// Check if this permission satisfies a requested permission.
    ///
    /// A held permission satisfies a request when modules match and the
    /// held action either equals or implies the requested action
    /// (e.g., `manage` satisfies any request in its module).
    pub fn satisfies(&self, requested: &ModulePermission) -> bool {
        self.module == requested.module
            && (self.action == requested.action || self.action.implies(requested.action))
    }
}

impl fmt::Display for ModulePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module.as_str(), self.action.as_str())
    }
}

/// A set of permissions granted by a role.
///
/// Sets are strictly additive. Checking a permission considers implied
/// actions, so a set holding `orders:manage` answers `true` for any
/// orders permission.
///
/// # Example
///
/// ```
/// use dealer_rbac::{Action, Module, ModulePermission, PermissionSet};
///
/// let mut set = PermissionSet::new();
/// set.add(ModulePermission::new(Module::Orders, Action::Manage));
///
/// assert!(set.has(&ModulePermission::new(Module::Orders, Action::Delete)));
/// assert!(!set.has(&ModulePermission::new(Module::Invoices, Action::Read)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<ModulePermission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Create a set containing every module/action combination.
    ///
    /// Used for the elevated-user override, which grants the full
    /// permission catalog without explicit role rows.
    pub fn full_catalog() -> Self {
        let mut set = Self::new();
        for module in Module::all() {
            for action in Action::all() {
                set.add(ModulePermission::new(module, action));
            }
        }
        set
    }

    /// Create from a list of permission strings.
    ///
    /// Strings that fail to parse are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_rbac::PermissionSet;
    ///
    /// let set = PermissionSet::from_strs(&["orders:create", "orders:read"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_strs(perms: &[&str]) -> Self {
        let mut set = Self::new();
        for perm in perms {
            if let Some(p) = ModulePermission::parse(perm) {
                set.add(p);
            }
        }
        set
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: ModulePermission) {
        self.permissions.insert(permission);
    }

    /// Remove a permission from the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present
    pub fn remove(&mut self, permission: &ModulePermission) -> bool {
        self.permissions.remove(permission)
    }

    /// Check whether the set grants a permission.
    ///
    /// This checks for an exact grant or a grant whose action implies
    /// the requested one.
    pub fn has(&self, permission: &ModulePermission) -> bool {
        self.permissions.iter().any(|held| held.satisfies(permission))
    }

    /// Check whether the set grants any action from `actions` in `module`.
    pub fn has_any_in_module(&self, module: Module, actions: &HashSet<Action>) -> bool {
        actions
            .iter()
            .any(|action| self.has(&ModulePermission::new(module, *action)))
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        for perm in &other.permissions {
            self.permissions.insert(*perm);
        }
    }

    /// Iterate over the permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = &ModulePermission> {
        self.permissions.iter()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<ModulePermission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = ModulePermission>>(iter: T) -> Self {
        let mut set = PermissionSet::new();
        for perm in iter {
            set.add(perm);
        }
        set
    }
}
