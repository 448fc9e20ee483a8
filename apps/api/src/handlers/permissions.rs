use axum::Json;
use axum::extract::{Extension, State};
use rolegate_core::{PrincipalAuthorizationContext, RequiredFields};
use rolegate_domain::{ApplicationScope, Permission};
use rolegate_gate::{ApiEnvelope, ApiJson, ApiResult};

use crate::dto::{CheckPermissionRequest, CheckPermissionResponse};
use crate::state::AppState;

pub async fn check_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<PrincipalAuthorizationContext>,
    ApiJson(payload): ApiJson<CheckPermissionRequest>,
) -> ApiResult<Json<ApiEnvelope<CheckPermissionResponse>>> {
    RequiredFields::new()
        .text("permission", payload.permission.as_deref())
        .text("application", payload.application.as_deref())
        .finish()?;

    let permission = Permission::new(payload.permission.unwrap_or_default())?;
    let application = ApplicationScope::new(payload.application.unwrap_or_default())?;

    let has_permission = state
        .resolution_service
        .has_permission(&principal, &permission, &application)
        .await?;

    tracing::debug!(
        principal_id = principal.principal_id(),
        permission = permission.as_str(),
        application = application.as_str(),
        allow_superadmin = payload.allow_superadmin.unwrap_or(true),
        has_permission,
        "permission check resolved"
    );

    Ok(ApiEnvelope::ok(CheckPermissionResponse { has_permission }))
}
