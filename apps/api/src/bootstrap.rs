use rolegate_core::AppError;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Ensures the configured principal holds the superadmin role, when one is configured.
pub async fn bootstrap_superadmin(state: &AppState, config: &ApiConfig) -> Result<(), AppError> {
    let Some(principal_id) = config.bootstrap_superadmin_principal.as_deref() else {
        return Ok(());
    };

    let role = state
        .role_admin_service
        .bootstrap_superadmin(principal_id, config.superadmin_role_name.as_str())
        .await?;

    info!(
        principal_id,
        role_id = %role.role_id(),
        role = role.name().as_str(),
        "superadmin role ensured"
    );

    Ok(())
}
