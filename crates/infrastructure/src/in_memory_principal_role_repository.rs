use std::collections::HashMap;

use async_trait::async_trait;
use rolegate_application::PrincipalRoleRepository;
use rolegate_core::{AppError, AppResult, RoleId};
use tokio::sync::RwLock;

/// In-memory principal store holding role references.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalRoleRepository {
    references: RwLock<HashMap<String, Vec<RoleId>>>,
}

impl InMemoryPrincipalRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrincipalRoleRepository for InMemoryPrincipalRoleRepository {
    async fn list_role_references(&self, principal_id: &str) -> AppResult<Vec<RoleId>> {
        Ok(self
            .references
            .read()
            .await
            .get(principal_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_role_reference(
        &self,
        principal_id: &str,
        role_id: RoleId,
        superseded: &[RoleId],
    ) -> AppResult<Vec<RoleId>> {
        let mut references = self.references.write().await;
        let held = references.entry(principal_id.to_owned()).or_default();

        held.retain(|value| !superseded.contains(value));
        if !held.contains(&role_id) {
            held.push(role_id);
        }

        Ok(held.clone())
    }

    async fn remove_role_reference(
        &self,
        principal_id: &str,
        role_id: RoleId,
    ) -> AppResult<Vec<RoleId>> {
        let mut references = self.references.write().await;
        let Some(held) = references
            .get_mut(principal_id)
            .filter(|held| held.contains(&role_id))
        else {
            return Err(AppError::NotFound(format!(
                "principal '{principal_id}' does not hold role '{role_id}'"
            )));
        };

        held.retain(|value| *value != role_id);
        Ok(held.clone())
    }

    async fn count_role_references(&self, role_id: RoleId) -> AppResult<u64> {
        let references = self.references.read().await;
        let count = references
            .values()
            .filter(|held| held.contains(&role_id))
            .count();

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("reference count overflow: {error}")))
    }
}
