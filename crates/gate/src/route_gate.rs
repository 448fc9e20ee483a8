use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use rolegate_application::{GateRule, PermissionGate};
use rolegate_core::{AppError, PrincipalAuthorizationContext};

use crate::{ApiResult, CallerAuthorization};

/// Permission gate bound to one route's rule.
#[derive(Clone)]
pub struct RouteGate {
    gate: PermissionGate,
    rule: Arc<GateRule>,
}

impl RouteGate {
    /// Binds `rule` to the gate.
    #[must_use]
    pub fn new(gate: PermissionGate, rule: GateRule) -> Self {
        Self {
            gate,
            rule: Arc::new(rule),
        }
    }

    /// Wraps a method router so its handlers only run once the rule passes.
    pub fn guard<S>(self, method_router: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        method_router.route_layer(from_fn_with_state(self, enforce_route_gate))
    }
}

/// Rejects the request unless its principal satisfies the bound rule.
pub async fn enforce_route_gate(
    State(route_gate): State<RouteGate>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let principal = request
        .extensions()
        .get::<PrincipalAuthorizationContext>();
    let authorization = request
        .extensions()
        .get::<CallerAuthorization>()
        .map(|value| value.0.as_str());

    let decision = route_gate
        .gate
        .authorize(principal, authorization, &route_gate.rule)
        .await;

    if let Err(error) = decision {
        let principal_id =
            principal.map_or("<anonymous>", PrincipalAuthorizationContext::principal_id);
        match &error {
            AppError::PermissionCheckFailed(detail) => tracing::warn!(
                principal_id,
                permission = %route_gate.rule,
                error = %detail,
                "permission check failed"
            ),
            AppError::Forbidden(_) => tracing::info!(
                principal_id,
                permission = %route_gate.rule,
                "permission denied"
            ),
            _ => tracing::debug!(
                permission = %route_gate.rule,
                error = %error,
                "request rejected by route gate"
            ),
        }
        return Err(error.into());
    }

    Ok(next.run(request).await)
}
