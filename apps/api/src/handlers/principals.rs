use axum::Json;
use axum::extract::{Path, State};
use rolegate_application::AssignRoleInput;
use rolegate_gate::{ApiEnvelope, ApiJson, ApiResult};

use crate::dto::{PrincipalRolesResponse, RoleReferenceRequest};
use crate::state::AppState;

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<String>,
    ApiJson(payload): ApiJson<RoleReferenceRequest>,
) -> ApiResult<Json<ApiEnvelope<PrincipalRolesResponse>>> {
    let assigned = state
        .role_admin_service
        .assign_role(
            principal_id.as_str(),
            AssignRoleInput {
                role: payload.role,
                application: payload.application,
            },
        )
        .await?;

    Ok(ApiEnvelope::ok(PrincipalRolesResponse::from(assigned)))
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<String>,
    ApiJson(payload): ApiJson<RoleReferenceRequest>,
) -> ApiResult<Json<ApiEnvelope<PrincipalRolesResponse>>> {
    let remaining = state
        .role_admin_service
        .unassign_role(
            principal_id.as_str(),
            AssignRoleInput {
                role: payload.role,
                application: payload.application,
            },
        )
        .await?;

    Ok(ApiEnvelope::ok(PrincipalRolesResponse::from(remaining)))
}

pub async fn list_principal_roles_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<PrincipalRolesResponse>>> {
    let held = state
        .role_admin_service
        .list_principal_roles(principal_id.as_str())
        .await?;

    Ok(ApiEnvelope::ok(PrincipalRolesResponse::from(held)))
}
