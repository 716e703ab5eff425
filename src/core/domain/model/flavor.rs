use crate::core::domain::value_object::serde_helpers::{lenient_u64, null_default};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FlavorResponse {
    pub flavor: Flavor,
}

/// A flavor from `GET /flavors/{id}`, used when the server embeds only its id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Flavor {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub vcpus: Option<u64>,
    /// RAM in MB.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub ram: Option<u64>,
    /// Root disk in GB.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub disk: Option<u64>,
}
