use crate::core::domain::error::ValidationError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// A Keystone token (the `X-Subject-Token` header) and the instant it stops being valid.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenStackToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl OpenStackToken {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        validate_token(&value)?;
        Ok(Self { value, expires_at })
    }

    /// Returns the token value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A token is expired once `now + margin` reaches its expiry instant.
    #[must_use]
    pub fn is_expired(&self, margin: Duration) -> bool {
        let margin = chrono::Duration::from_std(margin).unwrap_or_else(|_| chrono::Duration::zero());
        Utc::now() + margin >= self.expires_at
    }
}

impl fmt::Debug for OpenStackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenStackToken")
            .field("value", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub(crate) fn validate_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::Field {
            field: "token".to_string(),
            message: "Token cannot be empty".to_string(),
        });
    }
    // Header values must be visible ASCII.
    if !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(ValidationError::Format(
            "Token contains characters not allowed in a header".to_string(),
        ));
    }
    Ok(())
}
