//! Rolegate content service: content routes guarded through the remote permission check.

#![forbid(unsafe_code)]

mod content_config;
mod content_router;
mod content_store;
mod handlers;
mod state;

use std::sync::Arc;

use rolegate_application::PermissionGate;
use rolegate_core::AppError;
use rolegate_infrastructure::{HttpPermissionChecker, JwtTokenVerifier};
use tracing::info;

use crate::content_config::{ContentConfig, init_tracing};
use crate::content_store::ContentStore;
use crate::state::ContentState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ContentConfig::load()?;
    let checker = HttpPermissionChecker::new(
        config.permission_service_url.as_str(),
        config.permission_check_timeout,
    )?;

    let state = ContentState {
        store: ContentStore::new(),
        gate: PermissionGate::new(Arc::new(checker)),
        token_verifier: Arc::new(JwtTokenVerifier::new(config.jwt_secret.as_str())),
        application: config.content_application.clone(),
    };

    let app = content_router::build_router(state)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        permission_service_url = %config.permission_service_url,
        application = %config.content_application,
        "rolegate-content listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("content server error: {error}")))
}
