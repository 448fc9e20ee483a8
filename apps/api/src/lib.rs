//! Rolegate user service: role administration and the permission-check endpoint.

#![forbid(unsafe_code)]

/// Environment configuration and tracing setup.
pub mod api_config;
/// HTTP routes.
pub mod api_router;
/// Store selection and state assembly.
pub mod api_services;
/// Startup superadmin bootstrap.
pub mod bootstrap;
mod dto;
mod handlers;
/// Shared router state.
pub mod state;
