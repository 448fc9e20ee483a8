use std::sync::Arc;

use rolegate_core::{AppError, AppResult, NonEmptyString, RequiredFields, RoleId};
use rolegate_domain::{ApplicationScope, Permission, RoleDocument};
use tokio::sync::Mutex;

use crate::{NewRoleDocument, PrincipalRoleRepository, RoleRepository};

/// Input payload for creating a role document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name.
    pub role: Option<String>,
    /// Application scope, `*` for every application.
    pub application: Option<String>,
    /// Initial permission strings.
    pub permissions: Option<Vec<String>>,
}

/// Input payload for extending a role's permission set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddPermissionsInput {
    /// Permission strings to union into the role.
    pub permissions: Option<Vec<String>>,
}

/// Input payload naming a role by its unique pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignRoleInput {
    /// Role name.
    pub role: Option<String>,
    /// Application scope of the role.
    pub application: Option<String>,
}

/// Role references held by one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalRoles {
    /// Principal identifier.
    pub principal_id: String,
    /// Referenced role ids.
    pub role_reference_ids: Vec<RoleId>,
}

/// Sole writer of the role store.
#[derive(Clone)]
pub struct RoleAdminService {
    roles: Arc<dyn RoleRepository>,
    principals: Arc<dyn PrincipalRoleRepository>,
    // Held across reference checks and the writes that depend on them.
    reference_guard: Arc<Mutex<()>>,
}

impl RoleAdminService {
    /// Creates the service from its role and principal stores.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        principals: Arc<dyn PrincipalRoleRepository>,
    ) -> Self {
        Self {
            roles,
            principals,
            reference_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a role document at version 1.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDocument> {
        RequiredFields::new()
            .text("role", input.role.as_deref())
            .text("application", input.application.as_deref())
            .list("permissions", input.permissions.as_deref())
            .finish()?;

        let name = NonEmptyString::new(input.role.unwrap_or_default().trim())?;
        let application = ApplicationScope::new(input.application.unwrap_or_default().trim())?;
        let permissions = parse_permissions(input.permissions.unwrap_or_default())?;

        self.roles
            .create_role(NewRoleDocument {
                name,
                application,
                permissions,
            })
            .await
    }

    /// Unions permissions into an existing role and bumps its version.
    pub async fn add_permissions(
        &self,
        role_id: RoleId,
        input: AddPermissionsInput,
    ) -> AppResult<RoleDocument> {
        RequiredFields::new()
            .list("permissions", input.permissions.as_deref())
            .finish()?;

        let permissions = parse_permissions(input.permissions.unwrap_or_default())?;
        self.roles.add_permissions(role_id, permissions).await
    }

    /// Assigns a role, replacing any reference to another role of the same name.
    pub async fn assign_role(
        &self,
        principal_id: &str,
        input: AssignRoleInput,
    ) -> AppResult<PrincipalRoles> {
        let principal_id = require_principal_id(principal_id)?;
        let _guard = self.reference_guard.lock().await;
        let role = self.resolve_named_role(input).await?;

        let superseded: Vec<RoleId> = self
            .roles
            .find_by_name(role.name().as_str())
            .await?
            .iter()
            .map(RoleDocument::role_id)
            .filter(|role_id| *role_id != role.role_id())
            .collect();

        let role_reference_ids = self
            .principals
            .replace_role_reference(principal_id, role.role_id(), &superseded)
            .await?;

        Ok(PrincipalRoles {
            principal_id: principal_id.to_owned(),
            role_reference_ids,
        })
    }

    /// Removes a principal's reference to a role.
    pub async fn unassign_role(
        &self,
        principal_id: &str,
        input: AssignRoleInput,
    ) -> AppResult<PrincipalRoles> {
        let principal_id = require_principal_id(principal_id)?;
        let role = self.resolve_named_role(input).await?;

        let role_reference_ids = self
            .principals
            .remove_role_reference(principal_id, role.role_id())
            .await?;

        Ok(PrincipalRoles {
            principal_id: principal_id.to_owned(),
            role_reference_ids,
        })
    }

    /// Lists the role references a principal holds.
    pub async fn list_principal_roles(&self, principal_id: &str) -> AppResult<PrincipalRoles> {
        let principal_id = require_principal_id(principal_id)?;
        let role_reference_ids = self.principals.list_role_references(principal_id).await?;

        Ok(PrincipalRoles {
            principal_id: principal_id.to_owned(),
            role_reference_ids,
        })
    }

    /// Deletes a role that no principal references.
    ///
    /// The reference count and the delete run under the same guard as
    /// assignment, so no principal can pick the role up in between.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let _guard = self.reference_guard.lock().await;
        if self.roles.find_role(role_id).await?.is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        let references = self.principals.count_role_references(role_id).await?;
        if references > 0 {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still assigned to {references} principal(s)"
            )));
        }

        self.roles.delete_role(role_id).await
    }

    /// Lists roles, optionally restricted to one application.
    pub async fn list_roles(&self, application: Option<&str>) -> AppResult<Vec<RoleDocument>> {
        let application = application
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ApplicationScope::new)
            .transpose()?;

        self.roles.list_roles(application.as_ref()).await
    }

    /// Fetches the existing subset of the given role ids.
    pub async fn find_roles_by_ids(
        &self,
        role_ids: Option<Vec<String>>,
    ) -> AppResult<Vec<RoleDocument>> {
        RequiredFields::new()
            .list("roleIds", role_ids.as_deref())
            .finish()?;

        let role_ids = role_ids
            .unwrap_or_default()
            .iter()
            .map(|value| RoleId::from_transport(value))
            .collect::<AppResult<Vec<_>>>()?;

        self.roles.find_by_ids(&role_ids).await
    }

    /// Ensures the wildcard role exists and is held by `principal_id`.
    pub async fn bootstrap_superadmin(
        &self,
        principal_id: &str,
        role_name: &str,
    ) -> AppResult<RoleDocument> {
        let scope = ApplicationScope::any();
        let role = match self.roles.find_by_name_and_scope(role_name, &scope).await? {
            Some(role) => role,
            None => {
                let created = self
                    .roles
                    .create_role(NewRoleDocument {
                        name: NonEmptyString::new(role_name)?,
                        application: scope.clone(),
                        permissions: vec![Permission::superadmin()],
                    })
                    .await;

                match created {
                    Ok(role) => role,
                    Err(AppError::Conflict(_)) => self
                        .roles
                        .find_by_name_and_scope(role_name, &scope)
                        .await?
                        .ok_or_else(|| {
                            AppError::Internal(format!(
                                "superadmin role '{role_name}' vanished during bootstrap"
                            ))
                        })?,
                    Err(error) => return Err(error),
                }
            }
        };

        if !role.grants(&Permission::superadmin()) {
            return Err(AppError::Conflict(format!(
                "role '{role_name}' exists without the wildcard permission"
            )));
        }

        self.assign_role(
            principal_id,
            AssignRoleInput {
                role: Some(role_name.to_owned()),
                application: Some(scope.as_str().to_owned()),
            },
        )
        .await?;

        Ok(role)
    }

    async fn resolve_named_role(&self, input: AssignRoleInput) -> AppResult<RoleDocument> {
        RequiredFields::new()
            .text("role", input.role.as_deref())
            .text("application", input.application.as_deref())
            .finish()?;

        let name = input.role.unwrap_or_default();
        let name = name.trim();
        let application = ApplicationScope::new(input.application.unwrap_or_default().trim())?;

        self.roles
            .find_by_name_and_scope(name, &application)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "role '{name}' was not found for application '{application}'"
                ))
            })
    }
}

fn require_principal_id(principal_id: &str) -> AppResult<&str> {
    RequiredFields::new()
        .text("principalId", Some(principal_id))
        .finish()?;
    Ok(principal_id.trim())
}

fn parse_permissions(values: Vec<String>) -> AppResult<Vec<Permission>> {
    values
        .into_iter()
        .map(|value| Permission::new(value.trim()))
        .collect()
}
