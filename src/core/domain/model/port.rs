//! Network interface records from compute (`os-interface`) and network (`ports`).

use crate::core::domain::value_object::serde_helpers::null_default;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct InterfaceAttachmentsResponse {
    #[serde(
        default,
        rename = "interfaceAttachments",
        deserialize_with = "null_default"
    )]
    pub interface_attachments: Vec<InterfaceAttachment>,
}

/// A port as listed by `GET /servers/{id}/os-interface`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InterfaceAttachment {
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub net_id: Option<String>,
    #[serde(default, alias = "mac_address")]
    pub mac_addr: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub fixed_ips: Vec<FixedIp>,
    #[serde(default)]
    pub port_state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortResponse {
    pub port: Port,
}

/// Port detail from `GET /v2.0/ports/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Port {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub fixed_ips: Vec<FixedIp>,
    #[serde(default, deserialize_with = "null_default")]
    pub allowed_address_pairs: Vec<AddressPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FixedIp {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
}

/// An anti-spoofing allow-list entry (an IP or CIDR, optionally with a MAC).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressPair {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
}

/// Non-empty addresses, in order.
pub fn fixed_ip_addresses(ips: &[FixedIp]) -> Vec<String> {
    ips.iter()
        .filter_map(|ip| ip.ip_address.as_deref())
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .collect()
}

impl Port {
    pub fn allowed_addresses(&self) -> Vec<String> {
        self.allowed_address_pairs
            .iter()
            .filter_map(|pair| pair.ip_address.as_deref())
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
            .collect()
    }
}
