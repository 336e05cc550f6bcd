//! # Actions
//!
//! Defines the granular actions that can be performed within a module.

use serde::{Deserialize, Serialize};

/// Actions that can be performed within a module.
///
/// Actions are monotonic capabilities: holding one never removes
/// anything, and there is no explicit deny action. Conflict between
/// roles is resolved by union, so the presence of a grant always wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view a record.
    Read,

    /// Create new records.
    Create,

    /// Modify existing records.
    Update,

    /// Remove records.
    Delete,

    /// Browse/query multiple records.
    List,

    /// Download or export data.
    Export,

    /// Approve pending records (orders awaiting confirmation, etc.).
    Approve,

    /// Administer the module's configuration.
    ///
    /// `Manage` implies every other action within the module.
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::List => "list",
            Action::Export => "export",
            Action::Approve => "approve",
            Action::Manage => "manage",
        }
    }

    /// Parse an action from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_rbac::Action;
    ///
    /// assert_eq!(Action::parse("create"), Some(Action::Create));
    /// assert_eq!(Action::parse("edit"), Some(Action::Update)); // Alias
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "read" | "view" | "get" => Some(Action::Read),
            "create" | "add" | "new" => Some(Action::Create),
            "update" | "edit" | "modify" => Some(Action::Update),
            "delete" | "remove" => Some(Action::Delete),
            "list" | "browse" | "search" => Some(Action::List),
            "export" | "download" => Some(Action::Export),
            "approve" | "accept" => Some(Action::Approve),
            "manage" | "admin" => Some(Action::Manage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::List,
            Action::Export,
            Action::Approve,
            Action::Manage,
        ]
    }

    /// Check if this action implies another action.
    ///
    /// Some actions implicitly grant other actions:
    /// - `Manage` implies all other actions
    /// - `Create`, `Update`, `Delete` and `Approve` imply `Read`
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_rbac::Action;
    ///
    /// assert!(Action::Manage.implies(Action::Delete));
    /// assert!(Action::Update.implies(Action::Read));
    /// assert!(!Action::Read.implies(Action::Update));
    /// ```
    pub fn implies(&self, other: Action) -> bool {
        match self {
            Action::Manage => true,
            Action::Create | Action::Update | Action::Delete | Action::Approve => {
                other == Action::Read
            }
            _ => false,
        }
    }

    /// Check if this is a write action.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Action::Create | Action::Update | Action::Delete | Action::Approve | Action::Manage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("read"), Some(Action::Read));
        assert_eq!(Action::parse("view"), Some(Action::Read));
        assert_eq!(Action::parse("create"), Some(Action::Create));
        assert_eq!(Action::parse("edit"), Some(Action::Update));
        assert_eq!(Action::parse("MANAGE"), Some(Action::Manage));
        assert_eq!(Action::parse("invalid"), None);
    }

    #[test]
    fn test_action_as_str_round_trip() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_action_implies() {
        // Manage implies everything
        for action in Action::all() {
            assert!(Action::Manage.implies(action));
        }

        // Write actions imply read
        assert!(Action::Create.implies(Action::Read));
        assert!(Action::Update.implies(Action::Read));
        assert!(Action::Delete.implies(Action::Read));
        assert!(Action::Approve.implies(Action::Read));

        // Read implies nothing
        assert!(!Action::Read.implies(Action::Update));
        assert!(!Action::Read.implies(Action::Create));

        // Write actions do not imply each other
        assert!(!Action::Create.implies(Action::Delete));
        assert!(!Action::Update.implies(Action::Create));
    }

    #[test]
    fn test_is_write() {
        assert!(Action::Create.is_write());
        assert!(Action::Manage.is_write());
        assert!(!Action::Read.is_write());
        assert!(!Action::List.is_write());
        assert!(!Action::Export.is_write());
    }
}
