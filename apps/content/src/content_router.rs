use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use rolegate_application::GateRule;
use rolegate_core::AppError;
use rolegate_gate::{RouteGate, authenticate};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::ContentState;

pub fn build_router(state: ContentState) -> Result<Router, AppError> {
    let application = state.application.as_str();
    let gate = |rule: GateRule| RouteGate::new(state.gate.clone(), rule);

    let content_routes = Router::new()
        .route(
            "/api/content",
            gate(GateRule::require("content:read", application, true)?)
                .guard(get(handlers::list_content_handler))
                .merge(
                    gate(GateRule::require("content:create", application, true)?)
                        .guard(post(handlers::create_content_handler)),
                ),
        )
        .route(
            "/api/content/{content_id}",
            gate(GateRule::require_any_of(
                &["content:delete", "content:moderate"],
                application,
                true,
            )?)
            .guard(delete(handlers::delete_content_handler)),
        );

    let token_verifier = state.token_verifier.clone();

    Ok(Router::new()
        .route("/health", get(handlers::health_handler))
        .merge(content_routes)
        .layer(from_fn_with_state(token_verifier, authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
