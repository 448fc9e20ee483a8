use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rolegate_core::AppError;
use tracing_subscriber::EnvFilter;

/// Backing store selected by `ROLE_STORE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleStoreConfig {
    /// Process-local store, lost on restart.
    Memory,
    /// PostgreSQL store with embedded migrations.
    Postgres {
        /// Connection string from `DATABASE_URL`.
        database_url: String,
    },
}

/// User service configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Apply migrations and exit.
    pub migrate_only: bool,
    /// Listen host.
    pub api_host: String,
    /// Listen port.
    pub api_port: u16,
    /// HS256 secret shared with the credential issuer.
    pub jwt_secret: String,
    /// Role store backend.
    pub role_store: RoleStoreConfig,
    /// Application scope the `role:*` admin permissions are checked in.
    pub role_admin_application: String,
    /// Principal granted the superadmin role at startup.
    pub bootstrap_superadmin_principal: Option<String>,
    /// Name of the wildcard role created by the bootstrap.
    pub superadmin_role_name: String,
}

impl ApiConfig {
    /// Loads configuration from the process environment and arguments.
    pub fn load() -> Result<Self, AppError> {
        let mut config = Self::from_lookup(|name| env::var(name).ok())?;
        config.migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Ok(config)
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let jwt_secret = required_env(&lookup, "JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(AppError::Validation(
                "JWT_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };

        let role_store = match lookup("ROLE_STORE")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => RoleStoreConfig::Memory,
            "postgres" => RoleStoreConfig::Postgres {
                database_url: required_non_empty_env(&lookup, "DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "ROLE_STORE must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let role_admin_application = non_empty_or(&lookup, "ROLE_ADMIN_APPLICATION", "user");
        let superadmin_role_name = non_empty_or(&lookup, "SUPERADMIN_ROLE_NAME", "superadmin");
        let bootstrap_superadmin_principal = lookup("BOOTSTRAP_SUPERADMIN_PRINCIPAL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            migrate_only: false,
            api_host,
            api_port,
            jwt_secret,
            role_store,
            role_admin_application,
            bootstrap_superadmin_principal,
            superadmin_role_name,
        })
    }

    /// Returns the listen address.
    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

/// Installs the compact `tracing` subscriber, `info` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = required_env(lookup, name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn non_empty_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
