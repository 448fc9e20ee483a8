use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use rolegate_core::RoleId;
use rolegate_infrastructure::{
    InMemoryPrincipalRoleRepository, InMemoryRoleRepository, JwtTokenVerifier, PrincipalClaims,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_services::assemble_state;

use super::build_router;

const SECRET: &str = "router-test-secret-0123456789abcdef";

struct TestApi {
    router: Router,
    admin_token: String,
}

fn token(subject: &str, roles: &[String]) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() + 600)
        .unwrap_or_else(|error| panic!("{error}"));
    encode(
        &Header::default(),
        &PrincipalClaims {
            sub: subject.to_owned(),
            roles: roles.to_vec(),
            exp,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap_or_else(|error| panic!("{error}"))
}

async fn test_api() -> TestApi {
    let state = assemble_state(
        Arc::new(InMemoryRoleRepository::new()),
        Arc::new(InMemoryPrincipalRoleRepository::new()),
        Arc::new(JwtTokenVerifier::new(SECRET)),
        "user".to_owned(),
    );
    let root = state
        .role_admin_service
        .bootstrap_superadmin("admin", "superadmin")
        .await
        .unwrap_or_else(|error| panic!("{error}"));

    TestApi {
        router: build_router(state).unwrap_or_else(|error| panic!("{error}")),
        admin_token: token("admin", &[root.role_id().to_string()]),
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|error| panic!("{error}"));

    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("{error}"));
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|error| panic!("{error}"));
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|error| panic!("{error}"))
    };
    (status, value)
}

async fn create_role(api: &TestApi, role: &str, application: &str, permissions: &[&str]) -> String {
    let (status, body) = send(
        &api.router,
        Method::POST,
        "/roles",
        Some(api.admin_token.as_str()),
        Some(json!({ "role": role, "application": application, "permissions": permissions })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"]
        .as_str()
        .map(str::to_owned)
        .unwrap_or_else(|| panic!("missing role id in {body}"))
}

async fn assign(api: &TestApi, principal_id: &str, role: &str, application: &str) -> Vec<String> {
    let (status, body) = send(
        &api.router,
        Method::POST,
        format!("/principals/{principal_id}/roles").as_str(),
        Some(api.admin_token.as_str()),
        Some(json!({ "role": role, "application": application })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["roleIds"]
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

async fn check(api: &TestApi, bearer: &str, permission: &str, application: &str) -> Value {
    let (status, body) = send(
        &api.router,
        Method::POST,
        "/roles/check-permission",
        Some(bearer),
        Some(json!({ "permission": permission, "application": application, "allowSuperadmin": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["hasPermission"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let api = test_api().await;

    let (status, body) = send(&api.router, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn editor_in_cms_can_create_but_not_delete() {
    let api = test_api().await;
    create_role(&api, "editor", "cms", &["content:read", "content:create"]).await;
    let role_ids = assign(&api, "u1", "editor", "cms").await;
    let editor = token("u1", &role_ids);

    assert_eq!(check(&api, editor.as_str(), "content:create", "cms").await, json!(true));
    assert_eq!(check(&api, editor.as_str(), "content:delete", "cms").await, json!(false));
    assert_eq!(check(&api, editor.as_str(), "content:create", "media").await, json!(false));
}

#[tokio::test]
async fn wildcard_role_grants_everything_everywhere() {
    let api = test_api().await;
    create_role(&api, "root", "*", &["*:*"]).await;
    let role_ids = assign(&api, "u2", "root", "*").await;
    let root = token("u2", &role_ids);

    assert_eq!(check(&api, root.as_str(), "billing:refund", "subscription").await, json!(true));
    assert_eq!(check(&api, root.as_str(), "video:upload", "media").await, json!(true));
}

#[tokio::test]
async fn check_permission_requires_a_verified_principal() {
    let api = test_api().await;
    let body = json!({ "permission": "content:read", "application": "cms" });

    let (anonymous, envelope) = send(
        &api.router,
        Method::POST,
        "/roles/check-permission",
        None,
        Some(body.clone()),
    )
    .await;
    let (forged, _) = send(
        &api.router,
        Method::POST,
        "/roles/check-permission",
        Some("not-a-jwt"),
        Some(body),
    )
    .await;

    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);
    assert_eq!(envelope["success"], false);
    assert_eq!(forged, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn check_permission_reports_missing_fields() {
    let api = test_api().await;

    let (status, body) = send(
        &api.router,
        Method::POST,
        "/roles/check-permission",
        Some(api.admin_token.as_str()),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missingFields"], json!(["permission", "application"]));
}

#[tokio::test]
async fn role_administration_requires_role_permissions() {
    let api = test_api().await;
    create_role(&api, "editor", "cms", &["content:read"]).await;
    let role_ids = assign(&api, "u1", "editor", "cms").await;
    let editor = token("u1", &role_ids);

    let (forbidden, body) = send(
        &api.router,
        Method::POST,
        "/roles",
        Some(editor.as_str()),
        Some(json!({ "role": "sneaky", "application": "cms", "permissions": ["*:*"] })),
    )
    .await;
    let (anonymous, _) = send(&api.router, Method::GET, "/roles", None, None).await;

    assert_eq!(forbidden, StatusCode::FORBIDDEN);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("role:create"))
    );
    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_role_validates_and_rejects_duplicates() {
    let api = test_api().await;

    let (missing, missing_body) = send(
        &api.router,
        Method::POST,
        "/roles",
        Some(api.admin_token.as_str()),
        Some(json!({ "role": "editor" })),
    )
    .await;
    create_role(&api, "editor", "cms", &["content:read"]).await;
    let (duplicate, _) = send(
        &api.router,
        Method::POST,
        "/roles",
        Some(api.admin_token.as_str()),
        Some(json!({ "role": "editor", "application": "cms", "permissions": ["content:delete"] })),
    )
    .await;

    assert_eq!(missing, StatusCode::BAD_REQUEST);
    assert_eq!(missing_body["missingFields"], json!(["application", "permissions"]));
    assert_eq!(duplicate, StatusCode::CONFLICT);
}

#[tokio::test]
async fn add_permissions_bumps_version() {
    let api = test_api().await;
    let role_id = create_role(&api, "editor", "cms", &["content:read"]).await;

    let (status, body) = send(
        &api.router,
        Method::PATCH,
        format!("/roles/{role_id}/permissions").as_str(),
        Some(api.admin_token.as_str()),
        Some(json!({ "permissions": ["content:read", "content:update"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["permissions"], json!(["content:read", "content:update"]));
}

#[tokio::test]
async fn referenced_role_cannot_be_deleted_until_unassigned() {
    let api = test_api().await;
    let role_id = create_role(&api, "editor", "cms", &["content:read"]).await;
    assign(&api, "u1", "editor", "cms").await;
    let uri = format!("/roles/{role_id}");

    let (blocked, _) = send(
        &api.router,
        Method::DELETE,
        uri.as_str(),
        Some(api.admin_token.as_str()),
        None,
    )
    .await;
    let (unassigned, _) = send(
        &api.router,
        Method::DELETE,
        "/principals/u1/roles",
        Some(api.admin_token.as_str()),
        Some(json!({ "role": "editor", "application": "cms" })),
    )
    .await;
    let (deleted, _) = send(
        &api.router,
        Method::DELETE,
        uri.as_str(),
        Some(api.admin_token.as_str()),
        None,
    )
    .await;

    assert_eq!(blocked, StatusCode::CONFLICT);
    assert_eq!(unassigned, StatusCode::OK);
    assert_eq!(deleted, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn lookup_and_listing() {
    let api = test_api().await;
    let role_id = create_role(&api, "editor", "cms", &["content:read"]).await;
    create_role(&api, "uploader", "media", &["video:upload"]).await;

    let (found, found_body) = send(
        &api.router,
        Method::POST,
        "/roles/lookup",
        Some(api.admin_token.as_str()),
        Some(json!({ "roleIds": [role_id, RoleId::new().to_string()] })),
    )
    .await;
    let (missing, _) = send(
        &api.router,
        Method::POST,
        "/roles/lookup",
        Some(api.admin_token.as_str()),
        Some(json!({ "roleIds": [RoleId::new().to_string()] })),
    )
    .await;
    let (listed, listed_body) = send(
        &api.router,
        Method::GET,
        "/roles?application=media",
        Some(api.admin_token.as_str()),
        None,
    )
    .await;

    assert_eq!(found, StatusCode::OK);
    assert_eq!(found_body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(missing, StatusCode::NOT_FOUND);
    assert_eq!(listed, StatusCode::OK);
    assert_eq!(listed_body["data"][0]["role"], "uploader");
}

#[tokio::test]
async fn mistyped_body_keeps_the_error_envelope() {
    let api = test_api().await;

    let (status, body) = send(
        &api.router,
        Method::POST,
        "/roles",
        Some(api.admin_token.as_str()),
        Some(json!({ "role": "editor", "application": "cms", "permissions": "content:read" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}
