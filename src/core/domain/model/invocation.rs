//! The host-facing invocation contract.

use crate::core::domain::{
    error::{ErrorEnvelope, OpenStackError, OpenStackResult},
    model::server_details::ServerDetails,
    value_object::{InstanceId, ProjectId},
};
use serde::{Deserialize, Serialize};

/// Input of a single lookup, as sent by the tool host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetServerRequest {
    pub instance_id: String,
    /// Defaults to the configured project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Accepted for forward compatibility; not used for routing.
    #[serde(default)]
    pub region: Option<String>,
}

impl GetServerRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Self::default()
        }
    }

    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Trims and checks the input. A blank `project_id` counts as absent.
    pub(crate) fn validate(&self, default_project: &ProjectId) -> OpenStackResult<ValidatedRequest> {
        let instance_id = InstanceId::new(&self.instance_id)?;
        let project_id = match self
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            Some(project) => ProjectId::new(project)?,
            None => default_project.clone(),
        };
        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(ValidatedRequest {
            instance_id,
            project_id,
            region,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedRequest {
    pub instance_id: InstanceId,
    pub project_id: ProjectId,
    pub region: Option<String>,
}

/// Either the normalized record or the structured error; serializes to the
/// bare record or to `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InvocationOutcome {
    Server(Box<ServerDetails>),
    Error(ErrorEnvelope),
}

impl InvocationOutcome {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Serializes the outcome; an outcome that cannot be serialized becomes
    /// an `UnexpectedError` envelope.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::to_value(
                OpenStackError::Unexpected(format!("failed to serialize result: {}", e))
                    .to_envelope(),
            )
            .unwrap_or(serde_json::Value::Null)
        })
    }
}

impl From<OpenStackResult<ServerDetails>> for InvocationOutcome {
    fn from(result: OpenStackResult<ServerDetails>) -> Self {
        match result {
            Ok(server) => Self::Server(Box::new(server)),
            Err(error) => Self::Error(error.to_envelope()),
        }
    }
}
