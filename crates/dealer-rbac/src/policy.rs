//! # Visibility policy
//!
//! Declarative mapping from module to the set of actions any one of
//! which implies access to the module as a whole.
//!
//! The source platform inferred module access from informal, per-call
//! lists of action names. Here the mapping is a single piece of
//! configuration evaluated uniformly wherever module-level access is
//! checked (navigation, notification recipient lookup).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::actions::Action;
use crate::modules::Module;
use crate::permissions::PermissionSet;

/// Per-module "implies visibility" action sets.
///
/// Holding any listed action for a module grants access to the module.
/// The default mapping covers the common case (any read or write
/// action surfaces the module); deployments with different navigation
/// rules construct their own mapping.
///
/// # Example
///
/// ```
/// use dealer_rbac::{Action, Module, PermissionSet, VisibilityPolicy};
///
/// let policy = VisibilityPolicy::default();
/// let perms = PermissionSet::from_strs(&["orders:create"]);
///
/// assert!(policy.grants_module_access(&perms, Module::Orders));
/// assert!(!policy.grants_module_access(&perms, Module::Invoices));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisibilityPolicy {
    rules: HashMap<Module, HashSet<Action>>,
}

impl VisibilityPolicy {
    /// Create an empty policy (no module is visible to anyone).
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Build a policy from explicit rules.
    ///
    /// # Arguments
    ///
    /// * `rules` - (module, actions) pairs; any listed action implies
    ///   access to the module
    pub fn from_rules<I, A>(rules: I) -> Self
    where
        I: IntoIterator<Item = (Module, A)>,
        A: IntoIterator<Item = Action>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(module, actions)| (module, actions.into_iter().collect()))
                .collect(),
        }
    }

    /// Add or replace the rule for a module.
    pub fn with_rule<A>(mut self, module: Module, actions: A) -> Self
    where
        A: IntoIterator<Item = Action>,
    {
        self.rules.insert(module, actions.into_iter().collect());
        self
    }

    /// Get the action set that implies access to a module.
    ///
    /// # Returns
    ///
    /// `None` if the module has no rule (never visible)
    pub fn actions_for(&self, module: Module) -> Option<&HashSet<Action>> {
        self.rules.get(&module)
    }

    /// Check whether a permission set grants access to a module.
    ///
    /// Access is granted when the set holds any action listed for the
    /// module, directly or via an implying action such as `manage`.
    pub fn grants_module_access(&self, permissions: &PermissionSet, module: Module) -> bool {
        match self.rules.get(&module) {
            Some(actions) => permissions.has_any_in_module(module, actions),
            None => false,
        }
    }
}

impl Default for VisibilityPolicy {
    /// The platform default: any read or write capability within a
    /// module surfaces it. Derived from the source platform's informal
    /// lists; treated as a starting point, not normative.
    fn default() -> Self {
        let common = [
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::List,
            Action::Manage,
        ];
        Self::from_rules(Module::all().into_iter().map(|module| (module, common)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_any_write_implies_access() {
        let policy = VisibilityPolicy::default();
        let perms = PermissionSet::from_strs(&["notification_rules:update"]);

        assert!(policy.grants_module_access(&perms, Module::NotificationRules));
        assert!(!policy.grants_module_access(&perms, Module::Orders));
    }

    #[test]
    fn test_empty_policy_denies_everything() {
        let policy = VisibilityPolicy::empty();
        let perms = PermissionSet::full_catalog();

        for module in Module::all() {
            assert!(!policy.grants_module_access(&perms, module));
        }
    }

    #[test]
    fn test_custom_rule_overrides_default() {
        // Reports only surface for users who can export them
        let policy = VisibilityPolicy::default().with_rule(Module::Reports, [Action::Export]);

        let reader = PermissionSet::from_strs(&["reports:read"]);
        let exporter = PermissionSet::from_strs(&["reports:export"]);

        assert!(!policy.grants_module_access(&reader, Module::Reports));
        assert!(policy.grants_module_access(&exporter, Module::Reports));
    }

    #[test]
    fn test_manage_satisfies_visibility_rule() {
        let policy = VisibilityPolicy::default().with_rule(Module::Orders, [Action::Create]);
        let admin = PermissionSet::from_strs(&["orders:manage"]);

        assert!(policy.grants_module_access(&admin, Module::Orders));
    }

    #[test]
    fn test_empty_permission_set_never_grants_access() {
        let policy = VisibilityPolicy::default();
        let perms = PermissionSet::new();

        for module in Module::all() {
            assert!(!policy.grants_module_access(&perms, module));
        }
    }
}
