use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegate_application::{AddPermissionsInput, CreateRoleInput};
use rolegate_core::RoleId;
use rolegate_gate::{ApiEnvelope, ApiJson, ApiResult};

use crate::dto::{
    AddPermissionsRequest, CreateRoleRequest, ListRolesQuery, LookupRolesRequest, RoleResponse,
};
use crate::state::AppState;

pub async fn create_role_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<RoleResponse>>)> {
    let role = state
        .role_admin_service
        .create_role(CreateRoleInput {
            role: payload.role,
            application: payload.application,
            permissions: payload.permissions,
        })
        .await?;

    Ok((StatusCode::CREATED, ApiEnvelope::ok(RoleResponse::from(role))))
}

pub async fn add_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    ApiJson(payload): ApiJson<AddPermissionsRequest>,
) -> ApiResult<Json<ApiEnvelope<RoleResponse>>> {
    let role_id = RoleId::from_transport(role_id.as_str())?;
    let role = state
        .role_admin_service
        .add_permissions(
            role_id,
            AddPermissionsInput {
                permissions: payload.permissions,
            },
        )
        .await?;

    Ok(ApiEnvelope::ok(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::from_transport(role_id.as_str())?;
    state.role_admin_service.delete_role(role_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(query): Query<ListRolesQuery>,
) -> ApiResult<Json<ApiEnvelope<Vec<RoleResponse>>>> {
    let roles = state
        .role_admin_service
        .list_roles(query.application.as_deref())
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(ApiEnvelope::ok(roles))
}

pub async fn lookup_roles_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LookupRolesRequest>,
) -> ApiResult<Json<ApiEnvelope<Vec<RoleResponse>>>> {
    let roles = state
        .role_admin_service
        .find_roles_by_ids(payload.role_ids)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(ApiEnvelope::ok(roles))
}
