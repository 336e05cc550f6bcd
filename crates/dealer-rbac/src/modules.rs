//! # Modules
//!
//! Defines the functional modules of the dealership platform.
//! Modules are the coarse-grained units permissions are scoped to.

use serde::{Deserialize, Serialize};

/// Functional modules of the dealership platform.
///
/// Every granular permission is scoped to exactly one module. The set
/// of modules is closed: downstream code matches on it exhaustively,
/// so adding a module is a deliberate platform-level change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Order management (vehicle orders, order lines, status changes).
    Orders,

    /// Invoicing (invoice records and their lifecycle).
    Invoices,

    /// Reporting (aggregated operational reports).
    Reports,

    /// Notification routing rules (who gets notified about what).
    NotificationRules,

    /// Role administration (custom tenant roles and assignments).
    Roles,

    /// Tenant administration (dealer records and lifecycle).
    Tenants,

    /// Bulk data imports (CSV ingestion).
    Imports,
}

impl Module {
    /// Get the string representation of the module.
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Orders => "orders",
            Module::Invoices => "invoices",
            Module::Reports => "reports",
            Module::NotificationRules => "notification_rules",
            Module::Roles => "roles",
            Module::Tenants => "tenants",
            Module::Imports => "imports",
        }
    }

    /// Parse a module from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Module)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_rbac::Module;
    ///
    /// assert_eq!(Module::parse("orders"), Some(Module::Orders));
    /// assert_eq!(Module::parse("NOTIFICATION_RULES"), Some(Module::NotificationRules));
    /// assert_eq!(Module::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "orders" => Some(Module::Orders),
            "invoices" | "invoicing" => Some(Module::Invoices),
            "reports" | "reporting" => Some(Module::Reports),
            "notification_rules" | "notifications" => Some(Module::NotificationRules),
            "roles" => Some(Module::Roles),
            "tenants" | "dealers" => Some(Module::Tenants),
            "imports" | "import" => Some(Module::Imports),
            _ => None,
        }
    }

    /// Get all modules.
    pub fn all() -> Vec<Self> {
        vec![
            Module::Orders,
            Module::Invoices,
            Module::Reports,
            Module::NotificationRules,
            Module::Roles,
            Module::Tenants,
            Module::Imports,
        ]
    }

    /// Get a human-readable display name for the module.
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_rbac::Module;
    ///
    /// assert_eq!(Module::NotificationRules.display_name(), "Notification Rules");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Module::Orders => "Orders",
            Module::Invoices => "Invoices",
            Module::Reports => "Reports",
            Module::NotificationRules => "Notification Rules",
            Module::Roles => "Roles",
            Module::Tenants => "Tenants",
            Module::Imports => "Imports",
        }
    }

    /// Check if this module is administrative.
    ///
    /// Administrative modules mutate the authorization model itself
    /// (roles, tenants) rather than business records.
    pub fn is_administrative(&self) -> bool {
        matches!(self, Module::Roles | Module::Tenants)
    }
}
