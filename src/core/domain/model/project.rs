use crate::core::domain::value_object::serde_helpers::null_default;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    pub project: Project,
}

/// A Keystone project from `GET /v3/projects/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain_id: Option<String>,
}
