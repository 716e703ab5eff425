use crate::core::domain::value_object::serde_helpers::{lenient_bool, lenient_u64, null_default};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VolumeResponse {
    pub volume: Volume,
}

/// A block storage volume from `GET /v3/{project_id}/volumes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Volume {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Size in GB.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    /// Cinder reports this as the string `"true"`/`"false"`.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub bootable: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub attachments: Vec<VolumeAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VolumeAttachment {
    #[serde(default)]
    pub server_id: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub attachment_id: Option<String>,
}

impl Volume {
    /// Device path of the attachment to `server_id`, else of the first attachment.
    pub fn device_for(&self, server_id: &str) -> Option<&str> {
        self.attachments
            .iter()
            .find(|attachment| attachment.server_id.as_deref() == Some(server_id))
            .or_else(|| self.attachments.first())
            .and_then(|attachment| attachment.device.as_deref())
            .filter(|device| !device.is_empty())
    }
}
