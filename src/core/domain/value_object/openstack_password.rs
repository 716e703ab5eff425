use crate::core::domain::error::ValidationError;
use std::fmt;

/// A Keystone password (plaintext, only stored for the lifetime of the client).
#[derive(Clone, PartialEq, Eq)]
pub struct OpenStackPassword(String);

impl OpenStackPassword {
    pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
        let password = password.into();
        validate_password(&password)?;
        Ok(Self(password))
    }

    /// Creates a new password without validation.
    #[cfg(test)]
    pub(crate) fn new_unchecked(password: String) -> Self {
        Self(password)
    }

    /// Returns the password as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps the password out of `{:?}` output and therefore out of logs.
impl fmt::Debug for OpenStackPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpenStackPassword(***)")
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Field {
            field: "password".to_string(),
            message: "Password cannot be empty".to_string(),
        });
    }
    if password.len() > 4096 {
        return Err(ValidationError::Format(
            "Password cannot exceed 4096 characters".to_string(),
        ));
    }
    Ok(())
}
