use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;

use rolegate_core::{AppError, AppResult, PrincipalAuthorizationContext};
use rolegate_domain::{ApplicationScope, Permission};

/// One permission question sent to the resolution side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCheckRequest {
    /// Principal whose role references are evaluated.
    pub principal: PrincipalAuthorizationContext,
    /// Capability being asked for.
    pub permission: Permission,
    /// Application the capability is asked for.
    pub application: ApplicationScope,
    /// Superadmin bypass flag bound at route registration.
    pub allow_superadmin: bool,
    /// Caller credential forwarded unchanged, when one was presented.
    pub authorization: Option<String>,
}

/// Port answering permission questions, in-process or across the network.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Returns the decision, or an error when no decision could be reached.
    async fn check_permission(&self, request: &PermissionCheckRequest) -> AppResult<bool>;
}

/// Statically bound permission requirement for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequirement {
    /// Required capability.
    pub permission: Permission,
    /// Application scope the capability is checked in.
    pub application: ApplicationScope,
    /// Superadmin bypass flag forwarded with the check.
    pub allow_superadmin: bool,
}

impl PermissionRequirement {
    /// Parses a requirement from its string parts.
    pub fn new(permission: &str, application: &str, allow_superadmin: bool) -> AppResult<Self> {
        Ok(Self {
            permission: Permission::new(permission)?,
            application: ApplicationScope::new(application)?,
            allow_superadmin,
        })
    }
}

/// Decision rule a gate enforces for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRule {
    /// One permission must be granted.
    Single(PermissionRequirement),
    /// At least one of the permissions must be granted; checked in order.
    AnyOf {
        /// Candidate permissions, never empty.
        permissions: Vec<Permission>,
        /// Application scope every candidate is checked in.
        application: ApplicationScope,
        /// Superadmin bypass flag forwarded with each check.
        allow_superadmin: bool,
    },
}

impl GateRule {
    /// Builds a single-permission rule.
    pub fn require(permission: &str, application: &str, allow_superadmin: bool) -> AppResult<Self> {
        PermissionRequirement::new(permission, application, allow_superadmin).map(Self::Single)
    }

    /// Builds an any-of rule; the candidate list must not be empty.
    pub fn require_any_of(
        permissions: &[&str],
        application: &str,
        allow_superadmin: bool,
    ) -> AppResult<Self> {
        if permissions.is_empty() {
            return Err(AppError::Validation(
                "any-of permission rule needs at least one permission".to_owned(),
            ));
        }

        Ok(Self::AnyOf {
            permissions: permissions
                .iter()
                .map(|value| Permission::new(*value))
                .collect::<AppResult<Vec<_>>>()?,
            application: ApplicationScope::new(application)?,
            allow_superadmin,
        })
    }
}

impl Display for GateRule {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(requirement) => {
                write!(
                    formatter,
                    "{}@{}",
                    requirement.permission, requirement.application
                )
            }
            Self::AnyOf {
                permissions,
                application,
                ..
            } => {
                let joined = permissions
                    .iter()
                    .map(Permission::as_str)
                    .collect::<Vec<_>>()
                    .join("|");
                write!(formatter, "{joined}@{application}")
            }
        }
    }
}

/// Reusable interceptor deciding whether a guarded operation may proceed.
///
/// The gate never grants on an infrastructure fault: checker errors surface as
/// `PermissionCheckFailed`, distinct from a `Forbidden` decision.
#[derive(Clone)]
pub struct PermissionGate {
    checker: Arc<dyn PermissionChecker>,
}

impl PermissionGate {
    /// Creates a gate backed by the given checker.
    #[must_use]
    pub fn new(checker: Arc<dyn PermissionChecker>) -> Self {
        Self { checker }
    }

    /// Applies a route rule to the request's principal.
    pub async fn authorize(
        &self,
        principal: Option<&PrincipalAuthorizationContext>,
        authorization: Option<&str>,
        rule: &GateRule,
    ) -> AppResult<()> {
        match rule {
            GateRule::Single(requirement) => {
                self.require(principal, authorization, requirement).await
            }
            GateRule::AnyOf {
                permissions,
                application,
                allow_superadmin,
            } => {
                self.require_any_of(
                    principal,
                    authorization,
                    permissions,
                    application,
                    *allow_superadmin,
                )
                .await
            }
        }
    }

    /// Requires one permission.
    pub async fn require(
        &self,
        principal: Option<&PrincipalAuthorizationContext>,
        authorization: Option<&str>,
        requirement: &PermissionRequirement,
    ) -> AppResult<()> {
        let principal = authenticated(principal)?;

        if self
            .check(
                principal,
                authorization,
                &requirement.permission,
                &requirement.application,
                requirement.allow_superadmin,
            )
            .await?
        {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "missing permission '{}'",
            requirement.permission
        )))
    }

    /// Requires any one of `permissions`, stopping at the first grant.
    pub async fn require_any_of(
        &self,
        principal: Option<&PrincipalAuthorizationContext>,
        authorization: Option<&str>,
        permissions: &[Permission],
        application: &ApplicationScope,
        allow_superadmin: bool,
    ) -> AppResult<()> {
        let principal = authenticated(principal)?;

        for permission in permissions {
            if self
                .check(
                    principal,
                    authorization,
                    permission,
                    application,
                    allow_superadmin,
                )
                .await?
            {
                return Ok(());
            }
        }

        Err(AppError::Forbidden("insufficient permissions".to_owned()))
    }

    async fn check(
        &self,
        principal: &PrincipalAuthorizationContext,
        authorization: Option<&str>,
        permission: &Permission,
        application: &ApplicationScope,
        allow_superadmin: bool,
    ) -> AppResult<bool> {
        let request = PermissionCheckRequest {
            principal: principal.clone(),
            permission: permission.clone(),
            application: application.clone(),
            allow_superadmin,
            authorization: authorization.map(str::to_owned),
        };

        self.checker
            .check_permission(&request)
            .await
            .map_err(|error| match error {
                AppError::PermissionCheckFailed(_) => error,
                other => AppError::PermissionCheckFailed(other.to_string()),
            })
    }
}

fn authenticated(
    principal: Option<&PrincipalAuthorizationContext>,
) -> AppResult<&PrincipalAuthorizationContext> {
    principal.ok_or_else(|| AppError::Unauthenticated("authentication required".to_owned()))
}
