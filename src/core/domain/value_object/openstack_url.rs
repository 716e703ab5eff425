use crate::core::domain::error::ValidationError;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];
const MAX_URL_LENGTH: usize = 2083;

/// A validated base URL of one OpenStack service (e.g. `http://controller:8774/v2.1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenStackUrl(String);

impl OpenStackUrl {
    pub fn new(url: impl AsRef<str>) -> Result<Self, ValidationError> {
        let url = url.as_ref().trim();
        validate_url(url)?;
        Ok(Self(url.trim_end_matches('/').to_string()))
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a path to the base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    /// Appends percent-encoded path segments, so ids taken from upstream
    /// payloads cannot change the path. `.` and `..` are rejected since the
    /// URL parser would drop them.
    pub fn with_segments<I>(&self, segments: I) -> Result<String, ValidationError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segments: Vec<I::Item> = segments.into_iter().collect();
        if let Some(segment) = segments
            .iter()
            .map(AsRef::<str>::as_ref)
            .find(|segment| matches!(*segment, "" | "." | ".."))
        {
            return Err(ValidationError::Format(format!(
                "Invalid path segment '{}'",
                segment
            )));
        }
        let mut url = url::Url::parse(&self.0)
            .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ValidationError::Format("URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Returns `true` when the last path segment of the base equals `segment`.
    #[must_use]
    pub fn ends_with_segment(&self, segment: &str) -> bool {
        self.0.rsplit('/').next() == Some(segment)
    }
}

pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme. Must be one of: {}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::Format("URL must include a host".to_string()));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::Format(
            "Service URL must not carry a query or fragment".to_string(),
        ));
    }

    Ok(())
}
