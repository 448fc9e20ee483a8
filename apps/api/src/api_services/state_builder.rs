use std::sync::Arc;

use rolegate_application::{
    PermissionGate, PermissionResolutionService, PrincipalRoleRepository, RoleAdminService,
    RoleRepository, TokenVerifier,
};
use rolegate_core::AppError;
use rolegate_infrastructure::{
    InMemoryPrincipalRoleRepository, InMemoryRoleRepository, JwtTokenVerifier,
    PostgresPrincipalRoleRepository, PostgresRoleRepository,
};
use tracing::info;

use crate::api_config::{ApiConfig, RoleStoreConfig};
use crate::state::AppState;

use super::database::open_role_store;

/// Builds state over the configured role store.
pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let (roles, principals): (Arc<dyn RoleRepository>, Arc<dyn PrincipalRoleRepository>) =
        match &config.role_store {
            RoleStoreConfig::Memory => {
                info!("using in-memory role store");
                (
                    Arc::new(InMemoryRoleRepository::new()),
                    Arc::new(InMemoryPrincipalRoleRepository::new()),
                )
            }
            RoleStoreConfig::Postgres { database_url } => {
                let pool = open_role_store(database_url).await?;
                info!("using postgres role store");
                (
                    Arc::new(PostgresRoleRepository::new(pool.clone())),
                    Arc::new(PostgresPrincipalRoleRepository::new(pool)),
                )
            }
        };

    Ok(assemble_state(
        roles,
        principals,
        Arc::new(JwtTokenVerifier::new(config.jwt_secret.as_str())),
        config.role_admin_application.clone(),
    ))
}

/// Wires services and the admin gate over the given stores.
pub fn assemble_state(
    roles: Arc<dyn RoleRepository>,
    principals: Arc<dyn PrincipalRoleRepository>,
    token_verifier: Arc<dyn TokenVerifier>,
    role_admin_application: String,
) -> AppState {
    let resolution_service = PermissionResolutionService::new(roles.clone());

    AppState {
        role_admin_service: RoleAdminService::new(roles, principals),
        admin_gate: PermissionGate::new(Arc::new(resolution_service.clone())),
        resolution_service,
        token_verifier,
        role_admin_application,
    }
}
