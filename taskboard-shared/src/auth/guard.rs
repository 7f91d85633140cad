/// Capability guard for organization-scoped resources
///
/// Every task endpoint is gated by exactly one capability check. Capabilities
/// are a closed set rather than free-form strings, so a handler cannot ask
/// for a permission that does not exist.
///
/// # Permission Model
///
/// The identity provider grants permission strings per organization. The four
/// this system understands map onto [`Capability`]:
///
/// | Permission string | Capability |
/// |---|---|
/// | `org:tasks:view` | `ViewTasks` |
/// | `org:tasks:create` | `CreateTasks` |
/// | `org:tasks:edit` | `EditTasks` |
/// | `org:tasks:delete` | `DeleteTasks` |
///
/// Strings outside this set are ignored when building the caller context, so
/// new provider-side permissions never break request handling.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// A named permission over the tasks resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// List and read tasks
    ViewTasks,

    /// Create tasks
    CreateTasks,

    /// Update tasks
    EditTasks,

    /// Delete tasks
    DeleteTasks,
}

impl Capability {
    /// Parses a provider permission string
    ///
    /// Returns `None` for permissions this system does not understand.
    pub fn from_permission(s: &str) -> Option<Self> {
        match s {
            "org:tasks:view" => Some(Capability::ViewTasks),
            "org:tasks:create" => Some(Capability::CreateTasks),
            "org:tasks:edit" => Some(Capability::EditTasks),
            "org:tasks:delete" => Some(Capability::DeleteTasks),
            _ => None,
        }
    }

    /// The wire permission string for this capability
    pub fn as_permission(&self) -> &'static str {
        match self {
            Capability::ViewTasks => "org:tasks:view",
            Capability::CreateTasks => "org:tasks:create",
            Capability::EditTasks => "org:tasks:edit",
            Capability::DeleteTasks => "org:tasks:delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_permission())
    }
}

/// Error type for guard checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Identity resolved but the required capability is missing
    #[error("Missing required permission: {0}")]
    MissingCapability(Capability),

    /// The session token carries no active organization
    #[error("Session has no active organization")]
    NoActiveOrganization,
}

/// Per-request caller context
///
/// Built once per request from validated session claims, carried through the
/// request via axum extensions, and discarded when the response is sent.
/// Never cached across requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: String,

    /// Active organization id (the tenant every query is scoped to)
    pub org_id: String,

    /// Capabilities granted to the caller in this organization
    pub permissions: HashSet<Capability>,
}

impl AuthContext {
    /// Builds a caller context from validated session claims
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::NoActiveOrganization`] when the token has no
    /// `org_id` claim; such callers cannot reach organization-scoped data.
    pub fn from_claims(claims: Claims) -> Result<Self, AuthzError> {
        let org_id = claims.org_id.ok_or(AuthzError::NoActiveOrganization)?;

        let permissions = claims
            .org_permissions
            .iter()
            .filter_map(|p| Capability::from_permission(p))
            .collect();

        Ok(Self {
            user_id: claims.sub,
            org_id,
            permissions,
        })
    }

    /// Checks whether the caller holds a capability
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.permissions.contains(&capability)
    }

    fn require(&self, capability: Capability) -> Result<&Self, AuthzError> {
        if self.has_capability(capability) {
            Ok(self)
        } else {
            Err(AuthzError::MissingCapability(capability))
        }
    }

    /// Gates list/read operations
    pub fn require_view(&self) -> Result<&Self, AuthzError> {
        self.require(Capability::ViewTasks)
    }

    /// Gates create operations
    pub fn require_create(&self) -> Result<&Self, AuthzError> {
        self.require(Capability::CreateTasks)
    }

    /// Gates update operations
    pub fn require_edit(&self) -> Result<&Self, AuthzError> {
        self.require(Capability::EditTasks)
    }

    /// Gates delete operations
    pub fn require_delete(&self) -> Result<&Self, AuthzError> {
        self.require(Capability::DeleteTasks)
    }
}
