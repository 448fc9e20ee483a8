use serde::{Deserialize, Serialize};

use crate::RoleId;

/// Verified principal attached to a request by the authentication step.
///
/// Holds references to role documents, never embedded copies of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalAuthorizationContext {
    principal_id: String,
    role_reference_ids: Vec<RoleId>,
}

impl PrincipalAuthorizationContext {
    /// Creates a principal context from verified credential data.
    #[must_use]
    pub fn new(principal_id: impl Into<String>, role_reference_ids: Vec<RoleId>) -> Self {
        Self {
            principal_id: principal_id.into(),
            role_reference_ids,
        }
    }

    /// Returns the stable principal identity.
    #[must_use]
    pub fn principal_id(&self) -> &str {
        self.principal_id.as_str()
    }

    /// Returns the role documents referenced by the principal.
    #[must_use]
    pub fn role_reference_ids(&self) -> &[RoleId] {
        self.role_reference_ids.as_slice()
    }
}
