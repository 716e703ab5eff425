use crate::core::domain::error::OpenStackError;
use serde::Serialize;
use std::fmt;

/// The optional sub-query a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Interfaces,
    PortDetail,
    Volume,
    Image,
    ServerGroup,
    Project,
    Flavor,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Interfaces => "interfaces",
            Self::PortDetail => "port_detail",
            Self::Volume => "volume",
            Self::Image => "image",
            Self::ServerGroup => "server_group",
            Self::Project => "project",
            Self::Flavor => "flavor",
        };
        f.write_str(name)
    }
}

/// A tolerated failure of an optional sub-query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub stage: FetchStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub error_type: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl Diagnostic {
    /// Records `error` for `stage` and logs it at warn level.
    pub(crate) fn record(
        stage: FetchStage,
        resource_id: Option<&str>,
        error: &OpenStackError,
    ) -> Self {
        tracing::warn!(
            stage = %stage,
            resource_id = resource_id.unwrap_or("-"),
            error_type = error.kind(),
            "optional lookup failed: {}",
            error
        );
        Self {
            stage,
            resource_id: resource_id.map(str::to_string),
            error_type: error.kind(),
            message: error.to_string(),
            http_status: error.http_status(),
        }
    }
}
