use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, patch, post};
use rolegate_application::GateRule;
use rolegate_core::AppError;
use rolegate_gate::{RouteGate, authenticate, require_principal};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the user service router.
pub fn build_router(app_state: AppState) -> Result<Router, AppError> {
    let admin_gate = |permission: &str| -> Result<RouteGate, AppError> {
        Ok(RouteGate::new(
            app_state.admin_gate.clone(),
            GateRule::require(permission, app_state.role_admin_application.as_str(), true)?,
        ))
    };

    let role_routes = Router::new()
        .route(
            "/roles",
            admin_gate("role:read")?
                .guard(get(handlers::roles::list_roles_handler))
                .merge(admin_gate("role:create")?.guard(post(handlers::roles::create_role_handler))),
        )
        .route(
            "/roles/lookup",
            admin_gate("role:read")?.guard(post(handlers::roles::lookup_roles_handler)),
        )
        .route(
            "/roles/{role_id}",
            admin_gate("role:delete")?
                .guard(delete(handlers::roles::delete_role_handler)),
        )
        .route(
            "/roles/{role_id}/permissions",
            admin_gate("role:update")?.guard(patch(handlers::roles::add_permissions_handler)),
        )
        .route(
            "/principals/{principal_id}/roles",
            admin_gate("role:read")?
                .guard(get(handlers::principals::list_principal_roles_handler))
                .merge(
                    admin_gate("role:assign")?
                        .guard(post(handlers::principals::assign_role_handler)),
                )
                .merge(
                    admin_gate("role:assign")?
                        .guard(delete(handlers::principals::unassign_role_handler)),
                ),
        );

    let check_routes = Router::new()
        .route(
            "/roles/check-permission",
            post(handlers::permissions::check_permission_handler),
        )
        .route_layer(from_fn(require_principal));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(check_routes)
        .merge(role_routes)
        .layer(from_fn_with_state(
            app_state.token_verifier.clone(),
            authenticate,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
