//! The normalized server description returned to callers.
//!
//! Every field has a defined default so that a record can be produced from
//! any combination of present and missing optional data.

use crate::core::domain::model::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDetails {
    pub instance_id: String,
    pub name: String,
    pub status: String,
    pub project: ProjectSummary,
    pub flavor: FlavorSummary,
    pub image: ImageSummary,
    pub boot_from_volume: bool,
    pub volumes: Vec<VolumeSummary>,
    pub interfaces: Vec<InterfaceSummary>,
    pub availability_zone: String,
    pub host: String,
    pub hypervisor_hostname: String,
    pub security_groups: Vec<String>,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    /// ISO 8601, as reported by compute.
    pub created: String,
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_group: Option<ServerGroupSummary>,
    pub raw: RawPayloads,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

/// Flavor sizes are omitted when they could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_gb: Option<u64>,
}

/// `name` is empty when the image could not be resolved or the server has none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub id: String,
    pub name: String,
    pub size_gb: u64,
    pub status: String,
    pub bootable: bool,
    pub device: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSummary {
    pub port_id: String,
    pub net_id: String,
    pub mac: String,
    pub fixed_ips: Vec<String>,
    pub allowed_address_pairs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerGroupSummary {
    pub id: String,
    pub name: String,
}

/// Upstream payloads kept for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayloads {
    pub nova: Value,
}

/// A normalized record together with the tolerated failures that degraded it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerReport {
    pub server: ServerDetails,
    pub diagnostics: Vec<Diagnostic>,
}
