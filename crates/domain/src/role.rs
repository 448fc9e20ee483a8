use std::collections::BTreeSet;

use rolegate_core::{AppError, AppResult, NonEmptyString, RoleId};
use serde::Serialize;

use crate::{ApplicationScope, Permission};

/// Versioned permission set owned by a `(name, application)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDocument {
    role_id: RoleId,
    name: NonEmptyString,
    application: ApplicationScope,
    permissions: BTreeSet<Permission>,
    version: u64,
}

impl RoleDocument {
    /// Creates a freshly stored role document at version 1.
    #[must_use]
    pub fn new(
        role_id: RoleId,
        name: NonEmptyString,
        application: ApplicationScope,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            role_id,
            name,
            application,
            permissions: permissions.into_iter().collect(),
            version: 1,
        }
    }

    /// Rebuilds a role document from persisted state.
    pub fn from_stored(
        role_id: RoleId,
        name: impl Into<String>,
        application: impl Into<String>,
        permissions: impl IntoIterator<Item = String>,
        version: u64,
    ) -> AppResult<Self> {
        if version == 0 {
            return Err(AppError::Internal(format!(
                "role '{role_id}' was stored with version 0"
            )));
        }

        let permissions = permissions
            .into_iter()
            .map(Permission::new)
            .collect::<AppResult<BTreeSet<_>>>()?;

        Ok(Self {
            role_id,
            name: NonEmptyString::new(name)?,
            application: ApplicationScope::new(application)?,
            permissions,
            version,
        })
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the application scope.
    #[must_use]
    pub fn application(&self) -> &ApplicationScope {
        &self.application
    }

    /// Returns the permission set in stable order.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns the mutation counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Unions `additions` into the set and bumps the version, even when nothing new was added.
    pub fn merge_permissions(&mut self, additions: impl IntoIterator<Item = Permission>) {
        self.permissions.extend(additions);
        self.version = self.version.saturating_add(1);
    }

    /// Returns whether the document participates in checks for `scope`.
    #[must_use]
    pub fn applies_to(&self, scope: &ApplicationScope) -> bool {
        self.application.matches(scope)
    }

    /// Returns whether the document grants `permission`, directly or through `*:*`.
    #[must_use]
    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
            || self.permissions.iter().any(Permission::is_superadmin)
    }
}
