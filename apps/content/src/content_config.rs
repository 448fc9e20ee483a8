use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rolegate_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub content_host: String,
    pub content_port: u16,
    pub jwt_secret: String,
    pub permission_service_url: String,
    pub permission_check_timeout: Duration,
    pub content_application: String,
}

impl ContentConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let jwt_secret = required_env(&lookup, "JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(AppError::Validation(
                "JWT_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let content_host = lookup("CONTENT_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let content_port = parse_env(&lookup, "CONTENT_PORT", 3002_u16)?;

        let permission_service_url = lookup("PERMISSION_SERVICE_URL")
            .unwrap_or_else(|| "http://127.0.0.1:3001".to_owned());
        let parsed = Url::parse(permission_service_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid PERMISSION_SERVICE_URL '{permission_service_url}': {error}"
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "PERMISSION_SERVICE_URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let timeout_ms = parse_env(&lookup, "PERMISSION_CHECK_TIMEOUT_MS", 3000_u64)?;
        if timeout_ms == 0 {
            return Err(AppError::Validation(
                "PERMISSION_CHECK_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        let content_application = lookup("CONTENT_APPLICATION")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "cms".to_owned());

        Ok(Self {
            content_host,
            content_port,
            jwt_secret,
            permission_service_url: permission_service_url.trim_end_matches('/').to_owned(),
            permission_check_timeout: Duration::from_millis(timeout_ms),
            content_application,
        })
    }

    pub fn socket_address(&self) -> AppResult<SocketAddr> {
        let host = IpAddr::from_str(&self.content_host).map_err(|error| {
            AppError::Internal(format!(
                "invalid CONTENT_HOST '{}': {error}",
                self.content_host
            ))
        })?;
        Ok(SocketAddr::from((host, self.content_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
