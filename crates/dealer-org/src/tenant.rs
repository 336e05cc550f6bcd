//! Tenant (dealer) domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Lifecycle status of a tenant.
///
/// Status gates visibility regardless of role: a suspended or deleted
/// dealer does not surface for anyone holding a membership or role
/// there, and only `Active` tenants appear in elevated users' listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Operating normally
    Active,

    /// Temporarily disabled (billing hold, compliance review)
    Suspended,

    /// Soft-deleted; retained for audit only
    Deleted,
}

impl TenantStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Deleted => "deleted",
        }
    }

    /// Parse status from string representation.
    ///
    /// # Example
    ///
    /// ```
    /// use dealer_org::TenantStatus;
    ///
    /// assert_eq!(TenantStatus::parse("active"), Some(TenantStatus::Active));
    /// assert_eq!(TenantStatus::parse("SUSPENDED"), Some(TenantStatus::Suspended));
    /// assert_eq!(TenantStatus::parse("gone"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(TenantStatus::Active),
            "suspended" => Some(TenantStatus::Suspended),
            "deleted" => Some(TenantStatus::Deleted),
            _ => None,
        }
    }

    /// Check if the tenant is operational.
    pub fn is_active(&self) -> bool {
        matches!(self, TenantStatus::Active)
    }
}

/// A tenant (dealer) in the multi-tenant system.
///
/// Dealers are the organizational units the platform partitions by:
/// users belong to dealers through memberships, and tenant-scoped
/// roles are defined per dealer.
///
/// # Examples
///
/// ```
/// use dealer_org::{Tenant, TenantStatus};
///
/// let tenant = Tenant::new("Harbor Motors", "harbor-motors");
/// assert_eq!(tenant.status, TenantStatus::Active);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier
    pub id: Uuid,

    /// Human-readable dealer name
    pub name: String,

    /// URL-friendly slug (unique across platform)
    pub slug: String,

    /// Lifecycle status
    pub status: TenantStatus,

    /// When the dealer was created
    pub created_at: DateTime<Utc>,

    /// When the dealer was last updated
    pub updated_at: DateTime<Utc>,

    /// Custom metadata for extensibility
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Tenant {
    /// Creates a new active tenant.
    ///
    /// # Arguments
    ///
    /// * `name` - The dealer name
    /// * `slug` - URL-friendly slug (must be unique)
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            status: TenantStatus::Active,
            created_at: now,
            updated_at: now,
            metadata: HashMap::new(),
        }
    }

    /// Suspend the tenant.
    pub fn suspend(&mut self) {
        self.status = TenantStatus::Suspended;
        self.updated_at = Utc::now();
    }

    /// Reinstate a suspended tenant.
    pub fn reinstate(&mut self) {
        self.status = TenantStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Soft-delete the tenant.
    pub fn mark_deleted(&mut self) {
        self.status = TenantStatus::Deleted;
        self.updated_at = Utc::now();
    }

    /// Check if the tenant is operational.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_creation() {
        let tenant = Tenant::new("Harbor Motors", "harbor-motors");
        assert_eq!(tenant.name, "Harbor Motors");
        assert_eq!(tenant.slug, "harbor-motors");
        assert!(tenant.is_active());
    }

    #[test]
    fn test_tenant_lifecycle() {
        let mut tenant = Tenant::new("Harbor Motors", "harbor-motors");

        tenant.suspend();
        assert_eq!(tenant.status, TenantStatus::Suspended);
        assert!(!tenant.is_active());

        tenant.reinstate();
        assert!(tenant.is_active());

        tenant.mark_deleted();
        assert_eq!(tenant.status, TenantStatus::Deleted);
        assert!(!tenant.is_active());
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            TenantStatus::Active,
            TenantStatus::Suspended,
            TenantStatus::Deleted,
        ] {
            assert_eq!(TenantStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TenantStatus::parse("gone"), None);
    }
}
