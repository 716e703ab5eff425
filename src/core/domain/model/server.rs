//! The VM record returned by `GET /servers/{id}` on the compute service.
//!
//! Only the fields the normalizer needs are decoded; the untouched payload is
//! carried separately so it can be returned verbatim.

use crate::core::domain::value_object::serde_helpers::{
    image_reference, lenient_u64, null_default, string_map,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A compute server with Nova's extended attributes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Server {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub flavor: FlavorReference,
    /// `None` when the server booted from a volume (Nova sends `""`).
    #[serde(default, rename = "image", deserialize_with = "image_reference")]
    pub image_id: Option<String>,
    #[serde(
        default,
        rename = "OS-EXT-AZ:availability_zone",
        deserialize_with = "null_default"
    )]
    pub availability_zone: String,
    #[serde(default, rename = "OS-EXT-SRV-ATTR:host", deserialize_with = "null_default")]
    pub host: String,
    #[serde(
        default,
        rename = "OS-EXT-SRV-ATTR:hypervisor_hostname",
        deserialize_with = "null_default"
    )]
    pub hypervisor_hostname: String,
    /// Device the server boots from, e.g. `/dev/vda`.
    #[serde(default, rename = "OS-EXT-SRV-ATTR:root_device_name")]
    pub root_device_name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub security_groups: Vec<NamedReference>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "string_map")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_default")]
    pub updated: String,
    #[serde(
        default,
        rename = "os-extended-volumes:volumes_attached",
        deserialize_with = "null_default"
    )]
    pub volumes_attached: Vec<AttachedVolume>,
    /// Server group ids, exposed from compute microversion 2.71 on.
    #[serde(default, deserialize_with = "null_default")]
    pub server_groups: Vec<String>,
}

impl Server {
    /// Owning project, falling back from `tenant_id` to `project_id`.
    pub fn owning_project(&self) -> Option<&str> {
        self.tenant_id
            .as_deref()
            .or(self.project_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Security group names in first-seen order. Nova repeats a group once
    /// per port it is applied to.
    pub fn security_group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for group in &self.security_groups {
            if let Some(name) = group.name.as_deref().filter(|n| !n.is_empty()) {
                if !names.iter().any(|seen| seen == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Distinct ids of the attached volumes, in attachment order.
    pub fn attached_volume_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for volume in &self.volumes_attached {
            if !volume.id.is_empty() && !ids.contains(&volume.id) {
                ids.push(volume.id.clone());
            }
        }
        ids
    }
}

/// The `flavor` object of a server. Since microversion 2.47 it embeds the
/// flavor's name and sizes instead of only an id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlavorReference {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub vcpus: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub ram: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub disk: Option<u64>,
}

impl FlavorReference {
    pub fn display_name(&self) -> Option<&str> {
        self.original_name.as_deref().or(self.name.as_deref())
    }

    /// `true` when one of the sizes has to be looked up.
    pub fn is_incomplete(&self) -> bool {
        self.vcpus.is_none() || self.ram.is_none() || self.disk.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NamedReference {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttachedVolume {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub delete_on_termination: Option<bool>,
}
