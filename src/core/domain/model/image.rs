use crate::core::domain::value_object::serde_helpers::null_default;
use serde::Deserialize;

/// An image from `GET /v2/images/{id}`; Glance returns it unwrapped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Image {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
