use async_trait::async_trait;

use rolegate_core::{AppResult, NonEmptyString, RoleId};
use rolegate_domain::{ApplicationScope, Permission, RoleDocument};

/// Validated payload for persisting a new role document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoleDocument {
    /// Role name, unique together with the application.
    pub name: NonEmptyString,
    /// Application the role applies to.
    pub application: ApplicationScope,
    /// Initial grants.
    pub permissions: Vec<Permission>,
}

/// Repository port for role documents.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Stores a new document at version 1, failing with `Conflict` on a duplicate pair.
    async fn create_role(&self, input: NewRoleDocument) -> AppResult<RoleDocument>;

    /// Atomically unions grants into a document and bumps its version.
    async fn add_permissions(
        &self,
        role_id: RoleId,
        permissions: Vec<Permission>,
    ) -> AppResult<RoleDocument>;

    /// Finds one document by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDocument>>;

    /// Finds one document by its unique pair.
    async fn find_by_name_and_scope(
        &self,
        name: &str,
        application: &ApplicationScope,
    ) -> AppResult<Option<RoleDocument>>;

    /// Lists every document sharing a role name across applications.
    async fn find_by_name(&self, name: &str) -> AppResult<Vec<RoleDocument>>;

    /// Returns the existing subset of `role_ids`, failing with `NotFound` when nothing resolves.
    async fn find_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleDocument>>;

    /// Removes a document, failing with `NotFound` when absent.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Lists documents, optionally restricted to one application.
    async fn list_roles(
        &self,
        application: Option<&ApplicationScope>,
    ) -> AppResult<Vec<RoleDocument>>;
}

/// Repository port for the role references principals hold.
#[async_trait]
pub trait PrincipalRoleRepository: Send + Sync {
    /// Lists role references held by a principal.
    async fn list_role_references(&self, principal_id: &str) -> AppResult<Vec<RoleId>>;

    /// Atomically drops `superseded` references and adds `role_id`.
    async fn replace_role_reference(
        &self,
        principal_id: &str,
        role_id: RoleId,
        superseded: &[RoleId],
    ) -> AppResult<Vec<RoleId>>;

    /// Removes one reference, failing with `NotFound` when it is not held.
    async fn remove_role_reference(
        &self,
        principal_id: &str,
        role_id: RoleId,
    ) -> AppResult<Vec<RoleId>>;

    /// Counts principals referencing a role.
    async fn count_role_references(&self, role_id: RoleId) -> AppResult<u64>;
}
