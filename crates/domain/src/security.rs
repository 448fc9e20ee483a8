use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rolegate_core::AppError;
use serde::{Deserialize, Serialize};

/// Token that matches any application scope, and both halves of `*:*`.
const WILDCARD: &str = "*";

/// A capability string of the form `resource:action`, or the universal `*:*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(String);

impl Permission {
    /// Parses and validates a permission value.
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        let trimmed = value.trim();

        let Some((resource, action)) = trimmed.split_once(':') else {
            return Err(AppError::Validation(format!(
                "permission '{value}' must have the form 'resource:action'"
            )));
        };

        if resource.is_empty()
            || action.is_empty()
            || action.contains(':')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(AppError::Validation(format!(
                "permission '{value}' must have the form 'resource:action'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the universal superadmin grant `*:*`.
    #[must_use]
    pub fn superadmin() -> Self {
        Self(format!("{WILDCARD}:{WILDCARD}"))
    }

    /// Returns whether this is the universal superadmin grant.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        self.0 == format!("{WILDCARD}:{WILDCARD}")
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.0
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Application a role document or check applies to; `*` means every application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationScope(String);

impl ApplicationScope {
    /// Parses and validates a scope value.
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "application scope '{value}' must be a single non-empty token"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the wildcard scope.
    #[must_use]
    pub fn any() -> Self {
        Self(WILDCARD.to_owned())
    }

    /// Returns whether this is the wildcard scope.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }

    /// Returns whether two scopes overlap, honouring the wildcard on either side.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.is_wildcard() || other.is_wildcard() || self.0 == other.0
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ApplicationScope {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApplicationScope> for String {
    fn from(value: ApplicationScope) -> Self {
        value.0
    }
}

impl Display for ApplicationScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}
