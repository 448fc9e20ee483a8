use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use rolegate_core::{AppError, PrincipalAuthorizationContext, RequiredFields};
use rolegate_gate::{ApiEnvelope, ApiJson, ApiResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content_store::ContentItem;
use crate::state::ContentState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateContentRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_content_handler(
    State(state): State<ContentState>,
) -> ApiResult<Json<ApiEnvelope<Vec<ContentItem>>>> {
    Ok(ApiEnvelope::ok(state.store.list().await))
}

pub async fn create_content_handler(
    State(state): State<ContentState>,
    Extension(principal): Extension<PrincipalAuthorizationContext>,
    ApiJson(payload): ApiJson<CreateContentRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<ContentItem>>)> {
    RequiredFields::new()
        .text("title", payload.title.as_deref())
        .finish()?;

    let item = state
        .store
        .insert(
            payload.title.unwrap_or_default().trim().to_owned(),
            payload.body.unwrap_or_default(),
            principal.principal_id(),
        )
        .await;

    Ok((StatusCode::CREATED, ApiEnvelope::ok(item)))
}

pub async fn delete_content_handler(
    State(state): State<ContentState>,
    Path(content_id): Path<String>,
) -> ApiResult<StatusCode> {
    let content_id = Uuid::parse_str(content_id.trim()).map_err(|error| {
        AppError::Validation(format!("invalid content id '{content_id}': {error}"))
    })?;
    state.store.remove(content_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
