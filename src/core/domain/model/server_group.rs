use crate::core::domain::value_object::serde_helpers::null_default;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ServerGroupResponse {
    pub server_group: ServerGroup,
}

#[derive(Debug, Deserialize)]
pub struct ServerGroupsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub server_groups: Vec<ServerGroup>,
}

/// An (anti-)affinity group from `os-server-groups`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerGroup {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub members: Vec<String>,
    /// Single policy (microversion 2.64+); older APIs use `policies`.
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub policies: Vec<String>,
}

impl ServerGroup {
    pub fn has_member(&self, instance_id: &str) -> bool {
        self.members.iter().any(|member| member == instance_id)
    }
}
