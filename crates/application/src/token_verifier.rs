use rolegate_core::{AppResult, PrincipalAuthorizationContext};

/// Port for the upstream authentication step.
///
/// Implementations verify a bearer credential and return the principal it
/// names together with the role references it carries.
pub trait TokenVerifier: Send + Sync {
    /// Verifies a raw bearer token.
    fn verify(&self, token: &str) -> AppResult<PrincipalAuthorizationContext>;
}
