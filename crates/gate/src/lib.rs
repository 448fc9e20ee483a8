//! Axum adapter shared by every service that guards routes with permissions.

#![forbid(unsafe_code)]

mod authentication;
mod error;
mod extract;
mod route_gate;

pub use authentication::{
    CallerAuthorization, TokenVerifierState, authenticate, require_principal,
};
pub use error::{ApiEnvelope, ApiError, ApiResult, ErrorEnvelope};
pub use extract::ApiJson;
pub use route_gate::{RouteGate, enforce_route_gate};
