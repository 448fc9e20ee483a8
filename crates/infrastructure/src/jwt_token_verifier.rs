use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use rolegate_application::TokenVerifier;
use rolegate_core::{AppError, AppResult, PrincipalAuthorizationContext, RoleId};
use serde::{Deserialize, Serialize};

/// Claims carried by bearer credentials issued by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalClaims {
    /// Principal identifier.
    pub sub: String,
    /// Role reference ids held when the credential was issued.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry as seconds since the Unix epoch.
    pub exp: u64,
}

/// HS256 bearer token verifier.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Creates a verifier for tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> AppResult<PrincipalAuthorizationContext> {
        let claims = decode::<PrincipalClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| AppError::Unauthenticated(format!("invalid bearer token: {error}")))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthenticated(
                "bearer token has an empty subject".to_owned(),
            ));
        }

        let role_reference_ids = claims
            .roles
            .iter()
            .map(|value| RoleId::from_transport(value))
            .collect::<AppResult<Vec<_>>>()
            .map_err(|error| {
                AppError::Unauthenticated(format!("bearer token carries bad role ids: {error}"))
            })?;

        Ok(PrincipalAuthorizationContext::new(
            claims.sub,
            role_reference_ids,
        ))
    }
}
