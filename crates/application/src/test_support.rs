use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use rolegate_core::{AppError, AppResult, RoleId};
use rolegate_domain::{ApplicationScope, Permission, RoleDocument};

use crate::{
    NewRoleDocument, PermissionCheckRequest, PermissionChecker, PrincipalRoleRepository,
    RoleRepository,
};

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    pub(crate) roles: Mutex<Vec<RoleDocument>>,
    pub(crate) fail_reads: bool,
}

impl FakeRoleRepository {
    pub(crate) fn with_roles(roles: Vec<RoleDocument>) -> Self {
        Self {
            roles: Mutex::new(roles),
            fail_reads: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            roles: Mutex::new(Vec::new()),
            fail_reads: true,
        }
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn create_role(&self, input: NewRoleDocument) -> AppResult<RoleDocument> {
        let mut roles = self.roles.lock().await;
        if roles
            .iter()
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
        roles.push(role.clone());
        Ok(role)
    }

    async fn add_permissions(
        &self,
        role_id: RoleId,
        permissions: Vec<Permission>,
    ) -> AppResult<RoleDocument> {
        let mut roles = self.roles.lock().await;
        let role = roles
            .iter_mut()
            .find(|role| role.role_id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        role.merge_permissions(permissions);
        Ok(role.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDocument>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.role_id() == role_id)
            .cloned())
    }

    async fn find_by_name_and_scope(
        &self,
        name: &str,
        application: &ApplicationScope,
    ) -> AppResult<Option<RoleDocument>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.name().as_str() == name && role.application() == application)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<RoleDocument>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| role.name().as_str() == name)
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleDocument>> {
        if self.fail_reads {
            return Err(AppError::Internal("role store unavailable".to_owned()));
        }

        let found: Vec<RoleDocument> = self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| role_ids.contains(&role.role_id()))
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(AppError::NotFound("no roles matched the given ids".to_owned()));
        }

        Ok(found)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.role_id() != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }
        Ok(())
    }

    async fn list_roles(
        &self,
        application: Option<&ApplicationScope>,
    ) -> AppResult<Vec<RoleDocument>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| application.is_none_or(|scope| role.application() == scope))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakePrincipalRoleRepository {
    pub(crate) references: Mutex<HashMap<String, Vec<RoleId>>>,
}

#[async_trait]
impl PrincipalRoleRepository for FakePrincipalRoleRepository {
    async fn list_role_references(&self, principal_id: &str) -> AppResult<Vec<RoleId>> {
        Ok(self
            .references
            .lock()
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
        let mut references = self.references.lock().await;
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
        let mut references = self.references.lock().await;
        let held = references.entry(principal_id.to_owned()).or_default();
        let before = held.len();
        held.retain(|value| value != &role_id);
        if held.len() == before {
            return Err(AppError::NotFound(format!(
                "principal '{principal_id}' does not hold role '{role_id}'"
            )));
        }
        Ok(held.clone())
    }

    async fn count_role_references(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .references
            .lock()
            .await
            .values()
            .filter(|held| held.contains(&role_id))
            .count() as u64)
    }
}

/// Checker returning scripted answers while counting invocations.
pub(crate) struct ScriptedChecker {
    pub(crate) calls: AtomicUsize,
    pub(crate) granted: Vec<String>,
    pub(crate) fail: bool,
}

impl ScriptedChecker {
    pub(crate) fn granting(granted: &[&str]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            granted: granted.iter().map(|value| (*value).to_owned()).collect(),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            granted: Vec::new(),
            fail: true,
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionChecker for ScriptedChecker {
    async fn check_permission(&self, request: &PermissionCheckRequest) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Internal("permission service timed out".to_owned()));
        }

        Ok(self
            .granted
            .iter()
            .any(|value| value == request.permission.as_str()))
    }
}
