use crate::core::domain::value_object::serde_helpers::null_default;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: TokenBody,
}

/// The parts of a Keystone token body the client keeps; the token itself
/// travels in the `X-Subject-Token` header.
#[derive(Debug, Default, Deserialize)]
pub struct TokenBody {
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub project: Option<TokenProject>,
    #[serde(default, deserialize_with = "null_default")]
    pub catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenProject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEndpoint {
    pub interface: String,
    pub url: String,
    #[serde(default)]
    pub region: Option<String>,
}
