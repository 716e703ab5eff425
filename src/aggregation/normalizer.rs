//! Pure reshaping of a [`ServerBundle`] into the public record.

use crate::{
    aggregation::ServerBundle,
    core::domain::model::{
        flavor::Flavor,
        port::{InterfaceAttachment, Port, fixed_ip_addresses},
        server::{FlavorReference, Server},
        server_details::{
            FlavorSummary, ImageSummary, InterfaceSummary, ProjectSummary, RawPayloads,
            ServerDetails, ServerGroupSummary, VolumeSummary,
        },
        volume::Volume,
    },
};
use std::collections::BTreeMap;

/// Builds the output record. Never fails: every missing section has a default.
pub fn normalize(bundle: &ServerBundle) -> ServerDetails {
    let server = &bundle.server;

    ServerDetails {
        instance_id: bundle.instance_id.clone(),
        name: server.name.clone(),
        status: server.status.clone(),
        project: ProjectSummary {
            id: bundle.project_id.clone(),
            name: bundle.project_name.clone().unwrap_or_default(),
        },
        flavor: flavor_summary(&server.flavor, bundle.flavor.as_ref()),
        image: ImageSummary {
            id: server.image_id.clone().unwrap_or_default(),
            name: bundle
                .image
                .as_ref()
                .and_then(|image| image.name.clone())
                .unwrap_or_default(),
        },
        boot_from_volume: boot_from_volume(server, &bundle.instance_id, &bundle.volumes),
        volumes: bundle
            .volumes
            .iter()
            .map(|volume| volume_summary(volume, &bundle.instance_id))
            .collect(),
        interfaces: interface_summaries(&bundle.interfaces, &bundle.ports),
        availability_zone: server.availability_zone.clone(),
        host: server.host.clone(),
        hypervisor_hostname: server.hypervisor_hostname.clone(),
        security_groups: server.security_group_names(),
        tags: server.tags.clone(),
        metadata: server.metadata.clone(),
        created: server.created.clone(),
        updated: server.updated.clone(),
        server_group: bundle.server_group.as_ref().map(|group| ServerGroupSummary {
            id: group.id.clone(),
            name: group.name.clone().unwrap_or_default(),
        }),
        raw: RawPayloads {
            nova: bundle.raw.clone(),
        },
    }
}

/// Whether the instance boots from a block storage volume.
///
/// With a known root device, true iff one of `volumes` is attached at that
/// device. Without one, true when volumes are attached and no image is
/// referenced.
pub fn boot_from_volume(server: &Server, instance_id: &str, volumes: &[Volume]) -> bool {
    match server.root_device_name.as_deref().filter(|d| !d.is_empty()) {
        Some(root_device) => volumes
            .iter()
            .any(|volume| volume.device_for(instance_id) == Some(root_device)),
        None => !server.volumes_attached.is_empty() && server.image_id.is_none(),
    }
}

fn flavor_summary(reference: &FlavorReference, expanded: Option<&Flavor>) -> FlavorSummary {
    FlavorSummary {
        id: reference
            .id
            .clone()
            .or_else(|| expanded.map(|flavor| flavor.id.clone()))
            .unwrap_or_default(),
        name: reference
            .display_name()
            .map(str::to_string)
            .or_else(|| expanded.and_then(|flavor| flavor.name.clone()))
            .unwrap_or_default(),
        vcpus: reference.vcpus.or_else(|| expanded.and_then(|f| f.vcpus)),
        ram_mb: reference.ram.or_else(|| expanded.and_then(|f| f.ram)),
        disk_gb: reference.disk.or_else(|| expanded.and_then(|f| f.disk)),
    }
}

fn volume_summary(volume: &Volume, instance_id: &str) -> VolumeSummary {
    VolumeSummary {
        id: volume.id.clone(),
        name: volume.name.clone().unwrap_or_default(),
        size_gb: volume.size.unwrap_or_default(),
        status: volume.status.clone(),
        bootable: volume.bootable,
        device: volume.device_for(instance_id).unwrap_or_default().to_string(),
    }
}

fn interface_summaries(
    interfaces: &[InterfaceAttachment],
    ports: &BTreeMap<String, Port>,
) -> Vec<InterfaceSummary> {
    let mut seen: Vec<&str> = Vec::new();
    let mut summaries = Vec::new();
    for interface in interfaces {
        let port_id = interface.port_id.as_deref().unwrap_or_default();
        if !port_id.is_empty() {
            if seen.contains(&port_id) {
                continue;
            }
            seen.push(port_id);
        }
        summaries.push(merge_interface(interface, ports.get(port_id)));
    }
    summaries
}

/// Values from the interface list win; the port detail fills the gaps and
/// alone provides the allowed address pairs.
fn merge_interface(interface: &InterfaceAttachment, port: Option<&Port>) -> InterfaceSummary {
    let fixed_ips = match fixed_ip_addresses(&interface.fixed_ips) {
        ips if ips.is_empty() => port
            .map(|port| fixed_ip_addresses(&port.fixed_ips))
            .unwrap_or_default(),
        ips => ips,
    };

    InterfaceSummary {
        port_id: interface.port_id.clone().unwrap_or_default(),
        net_id: first_non_empty(
            interface.net_id.as_deref(),
            port.and_then(|port| port.network_id.as_deref()),
        ),
        mac: first_non_empty(
            interface.mac_addr.as_deref(),
            port.and_then(|port| port.mac_address.as_deref()),
        ),
        fixed_ips,
        allowed_address_pairs: port.map(Port::allowed_addresses).unwrap_or_default(),
    }
}

fn first_non_empty(preferred: Option<&str>, fallback: Option<&str>) -> String {
    preferred
        .filter(|value| !value.is_empty())
        .or(fallback.filter(|value| !value.is_empty()))
        .unwrap_or_default()
        .to_string()
}
