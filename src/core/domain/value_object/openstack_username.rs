use crate::core::domain::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 255;

/// A validated Keystone user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenStackUsername(String);

impl OpenStackUsername {
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self(username))
    }

    /// Creates a new username without validation.
    #[cfg(test)]
    pub(crate) fn new_unchecked(username: String) -> Self {
        Self(username)
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::Field {
            field: "username".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::Format(format!(
            "Username cannot exceed {} characters (got {})",
            MAX_USERNAME_LENGTH,
            username.len()
        )));
    }
    if username.chars().any(char::is_control) {
        return Err(ValidationError::Format(
            "Username contains control characters".to_string(),
        ));
    }
    Ok(())
}
