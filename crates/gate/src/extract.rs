use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use rolegate_core::AppError;

use crate::ApiError;

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(format!(
            "invalid request body: {}",
            rejection.body_text()
        )))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::post;
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::ApiJson;

    #[derive(Deserialize)]
    struct Payload {
        permissions: Vec<String>,
    }

    async fn accept(ApiJson(payload): ApiJson<Payload>) -> String {
        payload.permissions.join(",")
    }

    async fn post_body(content_type: Option<&str>, body: &'static str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(body))
            .unwrap_or_else(|error| panic!("{error}"));

        let response = Router::new()
            .route("/", post(accept))
            .oneshot(request)
            .await
            .unwrap_or_else(|error| panic!("{error}"));
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|error| panic!("{error}"));
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn well_typed_body_is_extracted() {
        let (status, _) = post_body(Some("application/json"), r#"{"permissions":["a:b"]}"#).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn mistyped_body_is_an_enveloped_bad_request() {
        let (status, body) =
            post_body(Some("application/json"), r#"{"permissions":"content:read"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|message| message.starts_with("validation error: invalid request body"))
        );
    }

    #[tokio::test]
    async fn missing_content_type_and_broken_syntax_are_enveloped() {
        let (unsupported, unsupported_body) = post_body(None, r#"{"permissions":[]}"#).await;
        let (broken, broken_body) = post_body(Some("application/json"), "{").await;

        assert_eq!(unsupported, StatusCode::BAD_REQUEST);
        assert_eq!(unsupported_body["success"], false);
        assert_eq!(broken, StatusCode::BAD_REQUEST);
        assert_eq!(broken_body["success"], false);
    }
}
