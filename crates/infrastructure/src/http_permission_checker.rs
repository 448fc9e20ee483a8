use std::time::Duration;

use async_trait::async_trait;
use rolegate_application::{PermissionCheckRequest, PermissionChecker};
use rolegate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Remote checker calling the user service's check-permission endpoint.
#[derive(Clone)]
pub struct HttpPermissionChecker {
    http_client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckPermissionBody<'a> {
    permission: &'a str,
    application: &'a str,
    allow_superadmin: bool,
}

#[derive(Debug, Deserialize)]
struct CheckPermissionEnvelope {
    success: bool,
    data: Option<CheckPermissionData>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckPermissionData {
    has_permission: bool,
}

impl HttpPermissionChecker {
    /// Creates a checker for the permission service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build permission check client: {error}"))
            })?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/roles/check-permission", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl PermissionChecker for HttpPermissionChecker {
    async fn check_permission(&self, request: &PermissionCheckRequest) -> AppResult<bool> {
        let mut builder = self.http_client.post(self.endpoint.as_str()).json(
            &CheckPermissionBody {
                permission: request.permission.as_str(),
                application: request.application.as_str(),
                allow_superadmin: request.allow_superadmin,
            },
        );
        if let Some(authorization) = request.authorization.as_deref() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(|error| {
            if error.is_timeout() {
                AppError::Internal(format!("permission check timed out: {error}"))
            } else {
                AppError::Internal(format!("permission check transport error: {error}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(AppError::Internal(format!(
                "permission check failed with status {status}: {body}"
            )));
        }

        let envelope = response
            .json::<CheckPermissionEnvelope>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("permission check returned malformed payload: {error}"))
            })?;

        match envelope {
            CheckPermissionEnvelope {
                success: true,
                data: Some(data),
                ..
            } => {
                tracing::debug!(
                    principal_id = request.principal.principal_id(),
                    permission = request.permission.as_str(),
                    granted = data.has_permission,
                    "remote permission check answered"
                );
                Ok(data.has_permission)
            }
            CheckPermissionEnvelope { message, .. } => Err(AppError::Internal(format!(
                "permission check was not answered: {}",
                message.unwrap_or_else(|| "missing decision".to_owned())
            ))),
        }
    }
}
