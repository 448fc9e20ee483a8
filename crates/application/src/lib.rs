//! Application services and ports.

#![forbid(unsafe_code)]

mod permission_gate;
mod permission_resolution_service;
mod role_admin_service;
mod role_ports;
mod token_verifier;

#[cfg(test)]
mod test_support;

pub use permission_gate::{
    GateRule, PermissionCheckRequest, PermissionChecker, PermissionGate, PermissionRequirement,
};
pub use permission_resolution_service::PermissionResolutionService;
pub use role_admin_service::{
    AddPermissionsInput, AssignRoleInput, CreateRoleInput, PrincipalRoles, RoleAdminService,
};
pub use role_ports::{NewRoleDocument, PrincipalRoleRepository, RoleRepository};
pub use token_verifier::TokenVerifier;
