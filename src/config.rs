//! Client tuning knobs and environment-based configuration.

use crate::core::domain::error::{OpenStackResult, ValidationError};
use std::num::NonZeroU32;
use std::time::Duration;

/// How the server group of an instance is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerGroupLookup {
    /// Never query server groups.
    Disabled,
    /// Fetch the group referenced by the server record, if any.
    ByReference,
    /// Like `ByReference`; when the record carries no reference, list the
    /// project's groups and pick the one the instance is a member of.
    #[default]
    Discover,
}

/// Outbound request quota, enforced with a token bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Behavioural configuration of an [`crate::OpenStackClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Lifetime assumed for a token when Keystone does not report `expires_at`.
    pub token_lifetime: Duration,
    /// A token this close to its expiry is treated as expired.
    pub expiry_margin: Duration,
    pub rate_limit: Option<RateLimitConfig>,
    /// Upper bound of upstream calls in flight at once, across invocations.
    pub max_concurrent_requests: usize,
    pub server_group_lookup: ServerGroupLookup,
    /// Look the flavor up when the server record lacks its sizes.
    pub expand_flavor: bool,
    /// Prefer the public endpoints of the token's catalog over the configured ones.
    pub use_service_catalog: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_lifetime: Duration::from_secs(60 * 60),
            expiry_margin: Duration::from_secs(60),
            rate_limit: None,
            max_concurrent_requests: 8,
            server_group_lookup: ServerGroupLookup::default(),
            expand_flavor: false,
            use_service_catalog: false,
        }
    }
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_requests == 0 {
            return Err(ValidationError::Field {
                field: "max_concurrent_requests".to_string(),
                message: "At least one concurrent request must be allowed".to_string(),
            });
        }
        if let Some(rate_limit) = self.rate_limit {
            rate_limit.quota()?;
        }
        Ok(())
    }
}

impl RateLimitConfig {
    pub(crate) fn quota(&self) -> Result<governor::Quota, ValidationError> {
        let per_second = NonZeroU32::new(self.requests_per_second).ok_or_else(|| {
            ValidationError::Field {
                field: "requests_per_second".to_string(),
                message: "Rate limit must be greater than zero".to_string(),
            }
        })?;
        let burst = NonZeroU32::new(self.burst_size).ok_or_else(|| ValidationError::Field {
            field: "burst_size".to_string(),
            message: "Burst size must be greater than zero".to_string(),
        })?;
        Ok(governor::Quota::per_second(per_second).allow_burst(burst))
    }
}

/// Settings read from the `OS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EnvSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub project_id: String,
    pub user_domain: String,
    pub verify_ssl: bool,
    pub request_timeout: Option<Duration>,
}

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_USER_DOMAIN: &str = "Default";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

impl EnvSettings {
    pub fn from_env() -> OpenStackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, so tests need not touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OpenStackResult<Self> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let required = ["OS_USERNAME", "OS_PASSWORD", "OS_PROJECT_ID"];
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| value(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::Field {
                field: missing.join(", "),
                message: "Missing required environment variables".to_string(),
            }
            .into());
        }

        let request_timeout = match value("OS_REQUEST_TIMEOUT") {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            host: value("OS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            username: value("OS_USERNAME").unwrap_or_default(),
            password: value("OS_PASSWORD").unwrap_or_default(),
            project_id: value("OS_PROJECT_ID").unwrap_or_default(),
            user_domain: value("OS_USER_DOMAIN_NAME")
                .unwrap_or_else(|| DEFAULT_USER_DOMAIN.to_string()),
            verify_ssl: value("OS_VERIFY_SSL").is_some_and(|raw| parse_flag(&raw)),
            request_timeout,
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_timeout(raw: &str) -> Result<Duration, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| ValidationError::Field {
            field: "OS_REQUEST_TIMEOUT".to_string(),
            message: format!("Expected a positive number of seconds, got '{}'", raw),
        })
}
