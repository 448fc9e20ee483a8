use std::sync::Arc;

use async_trait::async_trait;

use rolegate_core::{AppError, AppResult, PrincipalAuthorizationContext};
use rolegate_domain::{ApplicationScope, Permission};

use crate::{PermissionCheckRequest, PermissionChecker, RoleRepository};

/// Authority deciding whether a principal's referenced roles grant a permission.
#[derive(Clone)]
pub struct PermissionResolutionService {
    repository: Arc<dyn RoleRepository>,
}

impl PermissionResolutionService {
    /// Creates a resolution service reading from the role store.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Returns whether the principal's role references grant `permission` in `application`.
    ///
    /// Only the references carried by the principal are consulted. A stored
    /// `*:*` in a matching scope grants every permission.
    pub async fn has_permission(
        &self,
        principal: &PrincipalAuthorizationContext,
        permission: &Permission,
        application: &ApplicationScope,
    ) -> AppResult<bool> {
        let role_reference_ids = principal.role_reference_ids();
        if role_reference_ids.is_empty() {
            return Ok(false);
        }

        let roles = match self.repository.find_by_ids(role_reference_ids).await {
            Ok(roles) => roles,
            Err(AppError::NotFound(_)) => return Ok(false),
            Err(error) => return Err(error),
        };

        Ok(roles
            .iter()
            .filter(|role| role.applies_to(application))
            .any(|role| role.grants(permission)))
    }
}

#[async_trait]
impl PermissionChecker for PermissionResolutionService {
    async fn check_permission(&self, request: &PermissionCheckRequest) -> AppResult<bool> {
        self.has_permission(
            &request.principal,
            &request.permission,
            &request.application,
        )
        .await
    }
}
