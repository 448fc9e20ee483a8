//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_permission_checker;
mod in_memory_principal_role_repository;
mod in_memory_role_repository;
mod jwt_token_verifier;
mod postgres_principal_role_repository;
mod postgres_role_repository;

pub use http_permission_checker::HttpPermissionChecker;
pub use in_memory_principal_role_repository::InMemoryPrincipalRoleRepository;
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use jwt_token_verifier::{JwtTokenVerifier, PrincipalClaims};
pub use postgres_principal_role_repository::PostgresPrincipalRoleRepository;
pub use postgres_role_repository::PostgresRoleRepository;
