use rolegate_application::PrincipalRoles;
use rolegate_domain::RoleDocument;
use serde::{Deserialize, Serialize};

/// Incoming payload for role creation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub role: Option<String>,
    pub application: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// Incoming payload for extending a role's permissions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPermissionsRequest {
    pub permissions: Option<Vec<String>>,
}

/// Incoming payload naming a role by name and application.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReferenceRequest {
    pub role: Option<String>,
    pub application: Option<String>,
}

/// Incoming payload for bulk role lookup.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRolesRequest {
    pub role_ids: Option<Vec<String>>,
}

/// Incoming payload for a permission check.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPermissionRequest {
    pub permission: Option<String>,
    pub application: Option<String>,
    pub allow_superadmin: Option<bool>,
}

/// Query string for role listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListRolesQuery {
    pub application: Option<String>,
}

/// Role document returned to callers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub role: String,
    pub application: String,
    pub permissions: Vec<String>,
    pub version: u64,
}

impl From<RoleDocument> for RoleResponse {
    fn from(value: RoleDocument) -> Self {
        Self {
            id: value.role_id().to_string(),
            role: value.name().as_str().to_owned(),
            application: value.application().as_str().to_owned(),
            permissions: value
                .permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            version: value.version(),
        }
    }
}

/// Role references held by a principal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalRolesResponse {
    pub principal_id: String,
    pub role_ids: Vec<String>,
}

impl From<PrincipalRoles> for PrincipalRolesResponse {
    fn from(value: PrincipalRoles) -> Self {
        Self {
            principal_id: value.principal_id,
            role_ids: value
                .role_reference_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Permission decision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPermissionResponse {
    pub has_permission: bool,
}

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
