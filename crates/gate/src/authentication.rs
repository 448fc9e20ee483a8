use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use rolegate_application::TokenVerifier;
use rolegate_core::{AppError, PrincipalAuthorizationContext};

use crate::ApiResult;

/// Shared verifier handed to [`authenticate`].
pub type TokenVerifierState = Arc<dyn TokenVerifier>;

/// Raw `Authorization` header value, forwarded unchanged to remote checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerAuthorization(pub String);

/// Annotates the request with the verified principal, when there is one.
///
/// Never rejects: an absent or unverifiable credential leaves the request
/// without a principal and the route gate answers 401.
pub async fn authenticate(
    State(verifier): State<TokenVerifierState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let verified = bearer_token(request.headers()).map(|token| verifier.verify(token));
    match verified {
        Some(Ok(principal)) => {
            request.extensions_mut().insert(principal);
        }
        Some(Err(error)) => {
            tracing::debug!(error = %error, "bearer credential rejected");
        }
        None => {}
    }

    if let Some(authorization) = authorization {
        request
            .extensions_mut()
            .insert(CallerAuthorization(authorization));
    }

    next.run(request).await
}

/// Rejects requests that reached the route without a verified principal.
pub async fn require_principal(request: Request, next: Next) -> ApiResult<Response> {
    if request
        .extensions()
        .get::<PrincipalAuthorizationContext>()
        .is_none()
    {
        return Err(AppError::Unauthenticated("authentication required".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::bearer_token;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
    }

    #[test]
    fn ignores_other_schemes_and_blank_tokens() {
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
