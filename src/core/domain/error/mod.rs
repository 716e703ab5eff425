use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Upstream response bodies are cut to this many bytes before they are
/// attached to an error or written to the log.
pub const MAX_BODY_LENGTH: usize = 512;

/// The main error type for OpenStack operations.
///
/// Each variant corresponds to one entry of the public error taxonomy
/// (see [`OpenStackError::kind`]), so a caller always receives one of
/// `ValidationError`, `AuthError`, `NotFoundError`, `UpstreamError` or
/// `UnexpectedError`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpenStackError {
    /// Malformed or missing input, rejected before any network call
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The identity exchange was rejected or the identity service was unreachable
    ///
    /// # Fields
    /// * `message` - A description of the authentication failure
    /// * `http_status` - Status returned by Keystone, absent for transport failures
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        http_status: Option<u16>,
    },

    /// The primary lookup returned 404
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other non-2xx response, or a timeout, from an upstream call
    ///
    /// # Fields
    /// * `message` - What was being requested
    /// * `http_status` - Upstream status, absent when the call timed out
    /// * `body` - Truncated upstream response body
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        http_status: Option<u16>,
        body: Option<String>,
    },

    /// Anything that cannot be classified, including transport failures
    /// that produced no HTTP status
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl OpenStackError {
    pub(crate) fn authentication(message: impl Into<String>, http_status: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            http_status,
        }
    }

    pub(crate) fn upstream(
        message: impl Into<String>,
        http_status: Option<u16>,
        body: Option<&str>,
    ) -> Self {
        Self::Upstream {
            message: message.into(),
            http_status,
            body: body.map(truncate_body),
        }
    }

    /// Returns the public error type name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Authentication { .. } => "AuthError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Upstream { .. } => "UpstreamError",
            Self::Unexpected(_) => "UnexpectedError",
        }
    }

    /// Returns the HTTP status associated with the failure, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Authentication { http_status, .. } | Self::Upstream { http_status, .. } => {
                *http_status
            }
            Self::NotFound { .. } => Some(404),
            Self::Validation(_) | Self::Unexpected(_) => None,
        }
    }

    /// Builds the structured error returned to the tool host.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        let details = match self {
            Self::Validation(ValidationError::Field { field, .. }) => {
                Some(json!({ "field": field }))
            }
            Self::Upstream {
                body: Some(body), ..
            } => Some(json!({ "body": body })),
            _ => None,
        };

        ErrorEnvelope {
            error: ErrorBody {
                kind: self.kind(),
                message: self.to_string(),
                http_status: self.http_status(),
                details,
            },
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// `{"error": {...}}` wrapper of the structured error schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Cuts a response body down to [`MAX_BODY_LENGTH`] bytes on a char boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
}

/// Type alias for Results that may fail with an OpenStackError
pub type OpenStackResult<T> = Result<T, OpenStackError>;
