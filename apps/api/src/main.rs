//! Rolegate user service binary.

#![forbid(unsafe_code)]
// Routing, persistence and tracing crates are consumed through the library target.
#![allow(unused_crate_dependencies)]

use rolegate_api::api_config::{ApiConfig, init_tracing};
use rolegate_api::{api_router, api_services, bootstrap};
use rolegate_core::AppError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let app_state = api_services::build_app_state(&config).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    bootstrap::bootstrap_superadmin(&app_state, &config).await?;

    let app = api_router::build_router(app_state)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "rolegate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
