use std::sync::Arc;

use rolegate_application::{
    PermissionGate, PermissionResolutionService, RoleAdminService, TokenVerifier,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Role administration service.
    pub role_admin_service: RoleAdminService,
    /// Permission resolution authority.
    pub resolution_service: PermissionResolutionService,
    /// In-process gate guarding the admin routes.
    pub admin_gate: PermissionGate,
    /// Bearer credential verifier.
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// Scope of the `role:*` admin permissions.
    pub role_admin_application: String,
}
