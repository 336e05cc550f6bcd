//! Error types for authorization operations
//!
//! Two layers: [`StoreError`] at the directory-adapter seam, and
//! [`AuthzError`] for everything the core surfaces to callers.
//!
//! Note that an ordinary "no" from a permission check is **not** an
//! error: `can_perform` returns `Ok(false)`. The [`AuthzError::Forbidden`]
//! variant exists for the administrative mutation gate, where callers
//! must branch on a distinct, matchable denial signal.

use thiserror::Error;
use uuid::Uuid;

use dealer_org::RoleDefinitionError;

/// Errors from the backing directory store.
///
/// Missing records are represented as `Ok(None)` by the store traits;
/// these variants cover infrastructure failure only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("directory store unavailable: {0}")]
    Unavailable(String),

    /// A record could not be decoded
    #[error("corrupt directory record: {0}")]
    Corrupted(String),
}

/// Authorization error types.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The user id is unknown (distinct from a user with no roles)
    #[error("unknown user: {0}")]
    UserNotFound(Uuid),

    /// The tenant id is unknown
    #[error("unknown tenant: {0}")]
    TenantNotFound(Uuid),

    /// The role id is unknown
    #[error("unknown role: {0}")]
    RoleNotFound(Uuid),

    /// A referenced role assignment is unknown
    #[error("unknown role assignment: {0}")]
    AssignmentNotFound(Uuid),

    /// A referenced tenant membership is unknown
    #[error("unknown tenant membership: {0}")]
    MembershipNotFound(Uuid),

    /// A role record violates the scope invariant
    #[error("invalid role definition: {0}")]
    InvalidRoleDefinition(#[from] RoleDefinitionError),

    /// An administrative mutation was denied.
    ///
    /// This is the expected, frequent outcome of the mutation gate,
    /// not an exceptional condition; callers branch on it to render an
    /// actionable message. Retrying is never appropriate.
    #[error("forbidden: user {user_id} may not {action} in the {module} module")]
    Forbidden {
        /// The acting user
        user_id: Uuid,
        /// The module the mutation targets
        module: String,
        /// The denied action
        action: String,
        /// The tenant context, when the mutation was tenant-scoped
        tenant_id: Option<Uuid>,
    },

    /// The backing store was unreachable.
    ///
    /// Decision paths fail closed on this: access is never granted
    /// while the store is down. Callers may retry a bounded number of
    /// times.
    #[error("authorization backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

impl From<StoreError> for AuthzError {
    fn from(err: StoreError) -> Self {
        AuthzError::Unavailable(err.to_string())
    }
}

impl AuthzError {
    /// Check if this error should be logged at error level.
    ///
    /// Denials and missing records are expected outcomes; only
    /// infrastructure failure is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthzError::Unavailable(_))
    }

    /// Check if retrying the operation may help.
    ///
    /// Only transient store failure is retryable; a `Forbidden` never
    /// is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthzError::Unavailable(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthzError::UserNotFound(_) => "USER_NOT_FOUND",
            AuthzError::TenantNotFound(_) => "TENANT_NOT_FOUND",
            AuthzError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            AuthzError::AssignmentNotFound(_) => "ASSIGNMENT_NOT_FOUND",
            AuthzError::MembershipNotFound(_) => "MEMBERSHIP_NOT_FOUND",
            AuthzError::InvalidRoleDefinition(_) => "INVALID_ROLE_DEFINITION",
            AuthzError::Forbidden { .. } => "FORBIDDEN",
            AuthzError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}
