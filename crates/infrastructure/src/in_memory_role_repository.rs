use std::collections::HashMap;

use async_trait::async_trait;
use rolegate_application::{NewRoleDocument, RoleRepository};
use rolegate_core::{AppError, AppResult, RoleId};
use rolegate_domain::{ApplicationScope, Permission, RoleDocument};
use tokio::sync::RwLock;

/// In-memory role store.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<RoleId, RoleDocument>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut roles: Vec<RoleDocument>) -> Vec<RoleDocument> {
    roles.sort_by(|left, right| {
        (left.name(), left.application()).cmp(&(right.name(), right.application()))
    });
    roles
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create_role(&self, input: NewRoleDocument) -> AppResult<RoleDocument> {
        let mut roles = self.roles.write().await;

        if roles
            .values()
            .any(|role| role.name() == &input.name && role.application() == &input.application)
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists for application '{}'",
                input.name, input.application
            )));
        }

        let role = RoleDocument::new(
            RoleId::new(),
            input.name,
            input.application,
            input.permissions,
        );
        roles.insert(role.role_id(), role.clone());
        Ok(role)
    }

    async fn add_permissions(
        &self,
        role_id: RoleId,
        permissions: Vec<Permission>,
    ) -> AppResult<RoleDocument> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        role.merge_permissions(permissions);
        Ok(role.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDocument>> {
        Ok(self.roles.read().await.get(&role_id).cloned())
    }

    async fn find_by_name_and_scope(
        &self,
        name: &str,
        application: &ApplicationScope,
    ) -> AppResult<Option<RoleDocument>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.name().as_str() == name && role.application() == application)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<RoleDocument>> {
        let roles = self.roles.read().await;
        Ok(sorted(
            roles
                .values()
                .filter(|role| role.name().as_str() == name)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleDocument>> {
        if role_ids.is_empty() {
            return Err(AppError::NotFound("no role ids were given".to_owned()));
        }

        let roles = self.roles.read().await;
        let mut found: Vec<RoleDocument> = Vec::new();
        for role_id in role_ids {
            if let Some(role) = roles.get(role_id)
                && !found.iter().any(|value| value.role_id() == *role_id)
            {
                found.push(role.clone());
            }
        }

        if found.is_empty() {
            return Err(AppError::NotFound(
                "none of the given role ids exist".to_owned(),
            ));
        }

        Ok(found)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.roles
            .write()
            .await
            .remove(&role_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    async fn list_roles(
        &self,
        application: Option<&ApplicationScope>,
    ) -> AppResult<Vec<RoleDocument>> {
        let roles = self.roles.read().await;
        Ok(sorted(
            roles
                .values()
                .filter(|role| application.is_none_or(|scope| role.application() == scope))
                .cloned()
                .collect(),
        ))
    }
}
