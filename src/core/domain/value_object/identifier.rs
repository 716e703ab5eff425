//! Identifiers that end up as URL path segments.

use crate::core::domain::error::ValidationError;
use std::fmt;

const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Checks a trimmed identifier for emptiness, length and characters that would
/// escape its path segment.
fn validate_identifier(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: format!("{} must not be empty", field),
        });
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::Format(format!(
            "{} cannot exceed {} characters",
            field, MAX_IDENTIFIER_LENGTH
        )));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(ValidationError::Format(format!(
            "{} contains characters not allowed in a resource identifier",
            field
        )));
    }
    if matches!(value, "." | "..") {
        return Err(ValidationError::Format(format!(
            "{} cannot be a relative path segment",
            field
        )));
    }
    Ok(())
}

/// A server (instance) identifier, trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        validate_identifier("instance_id", value)?;
        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Keystone project identifier, the scope of every token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        validate_identifier("project_id", value)?;
        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The Keystone domain the user belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDomain(String);

impl UserDomain {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(ValidationError::Field {
                field: "user_domain".to_string(),
                message: "User domain cannot be empty".to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserDomain {
    fn default() -> Self {
        Self("Default".to_string())
    }
}
