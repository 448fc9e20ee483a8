use crate::{AppError, AppResult};

/// Collects missing required fields so callers get one aggregated error.
#[derive(Debug, Default)]
#[must_use]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    /// Starts an empty presence check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a text field that is present and not blank.
    pub fn text(mut self, name: &str, value: Option<&str>) -> Self {
        if value.is_none_or(|value| value.trim().is_empty()) {
            self.missing.push(name.to_owned());
        }
        self
    }

    /// Requires a list field that is present and has at least one entry.
    pub fn list<T>(mut self, name: &str, values: Option<&[T]>) -> Self {
        if values.is_none_or(<[T]>::is_empty) {
            self.missing.push(name.to_owned());
        }
        self
    }

    /// Fails with every missing field at once.
    pub fn finish(self) -> AppResult<()> {
        if self.missing.is_empty() {
            return Ok(());
        }

        Err(AppError::MissingFields(self.missing))
    }
}
