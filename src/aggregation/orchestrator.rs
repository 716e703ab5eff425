//! Runs the lookups of one invocation and decides which failures abort it.
//!
//! Only the identity exchange and the compute record are mandatory. Every
//! other lookup is enrichment: its failure empties one section of the
//! result and is kept as a [`Diagnostic`].

use crate::{
    aggregation::ServerBundle,
    config::{ClientConfig, ServerGroupLookup},
    core::domain::{
        error::{OpenStackError, OpenStackResult},
        model::{
            diagnostic::{Diagnostic, FetchStage},
            flavor::Flavor,
            image::Image,
            invocation::ValidatedRequest,
            openstack_auth::OpenStackAuth,
            port::{InterfaceAttachment, Port},
            server::Server,
            server_group::ServerGroup,
            volume::Volume,
        },
        value_object::ProjectId,
    },
    resources::CloudApi,
};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A section of the result and the failures met while fetching it.
type Partial<T> = (T, Vec<Diagnostic>);

struct NetworkSection {
    interfaces: Vec<InterfaceAttachment>,
    ports: BTreeMap<String, Port>,
}

#[derive(Debug)]
pub struct ServerAggregator<A> {
    api: Arc<A>,
    config: Arc<ClientConfig>,
}

impl<A: CloudApi> ServerAggregator<A> {
    pub fn new(api: Arc<A>, config: Arc<ClientConfig>) -> Self {
        Self { api, config }
    }

    /// Gathers everything known about the requested instance.
    ///
    /// The lookups that depend on the compute record run concurrently once
    /// it is available. Dropping the returned future abandons all of them.
    ///
    /// # Errors
    /// - `OpenStackError::Authentication` when no token can be obtained
    /// - Any error of the compute lookup (`NotFound`, `Upstream`, `Unexpected`)
    /// - `OpenStackError::Unexpected` when the compute record cannot be decoded
    pub(crate) async fn aggregate(&self, request: &ValidatedRequest) -> OpenStackResult<ServerBundle> {
        if let Some(region) = request.region.as_deref() {
            tracing::debug!(region, "region hint is not used for routing");
        }

        let auth = self.api.authenticate(&request.project_id).await?;
        let raw = self
            .api
            .fetch_server(&auth, &request.project_id, &request.instance_id)
            .await?;
        let server: Server = serde_json::from_value(raw.clone()).map_err(|e| {
            OpenStackError::Unexpected(format!(
                "Failed to decode server {}: {}",
                request.instance_id, e
            ))
        })?;

        let instance_id = if server.id.is_empty() {
            request.instance_id.to_string()
        } else {
            server.id.clone()
        };
        let project_id = server
            .owning_project()
            .unwrap_or(request.project_id.as_str())
            .to_string();
        tracing::debug!(instance_id = %instance_id, status = %server.status, "compute record received");

        let (
            (network, network_diagnostics),
            (volumes, volume_diagnostics),
            (image, image_diagnostics),
            (server_group, group_diagnostics),
            (project_name, project_diagnostics),
            (flavor, flavor_diagnostics),
        ) = futures::join!(
            self.network(&auth, &instance_id),
            self.volumes(&auth, &request.project_id, &server),
            self.image(&auth, &server),
            self.server_group(&auth, &server, &instance_id),
            self.project_name(&auth, &project_id),
            self.flavor(&auth, &server),
        );

        let diagnostics: Vec<Diagnostic> = [
            network_diagnostics,
            volume_diagnostics,
            image_diagnostics,
            group_diagnostics,
            project_diagnostics,
            flavor_diagnostics,
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(ServerBundle {
            instance_id,
            project_id,
            project_name,
            server,
            raw,
            flavor,
            interfaces: network.interfaces,
            ports: network.ports,
            volumes,
            image,
            server_group,
            diagnostics,
        })
    }

    async fn network(&self, auth: &OpenStackAuth, instance_id: &str) -> Partial<NetworkSection> {
        let interfaces = match self.api.fetch_interfaces(auth, instance_id).await {
            Ok(interfaces) => interfaces,
            Err(e) => {
                let section = NetworkSection {
                    interfaces: Vec::new(),
                    ports: BTreeMap::new(),
                };
                return (
                    section,
                    vec![Diagnostic::record(FetchStage::Interfaces, Some(instance_id), &e)],
                );
            }
        };

        let mut port_ids: Vec<&str> = Vec::new();
        for port_id in interfaces
            .iter()
            .filter_map(|interface| interface.port_id.as_deref())
            .filter(|id| !id.is_empty())
        {
            if !port_ids.contains(&port_id) {
                port_ids.push(port_id);
            }
        }

        let results = join_all(
            port_ids
                .iter()
                .map(|port_id| self.api.fetch_port_detail(auth, port_id)),
        )
        .await;

        let mut ports = BTreeMap::new();
        let mut diagnostics = Vec::new();
        for (port_id, result) in port_ids.iter().zip(results) {
            match result {
                Ok(port) => {
                    ports.insert(port_id.to_string(), port);
                }
                Err(e) => diagnostics.push(Diagnostic::record(
                    FetchStage::PortDetail,
                    Some(*port_id),
                    &e,
                )),
            }
        }

        (NetworkSection { interfaces, ports }, diagnostics)
    }

    async fn volumes(
        &self,
        auth: &OpenStackAuth,
        project: &ProjectId,
        server: &Server,
    ) -> Partial<Vec<Volume>> {
        let volume_ids = server.attached_volume_ids();
        let results = join_all(
            volume_ids
                .iter()
                .map(|volume_id| self.api.fetch_volume(auth, project, volume_id)),
        )
        .await;

        let mut volumes = Vec::new();
        let mut diagnostics = Vec::new();
        for (volume_id, result) in volume_ids.iter().zip(results) {
            match result {
                Ok(volume) => volumes.push(volume),
                Err(e) => diagnostics.push(Diagnostic::record(
                    FetchStage::Volume,
                    Some(volume_id.as_str()),
                    &e,
                )),
            }
        }
        (volumes, diagnostics)
    }

    async fn image(&self, auth: &OpenStackAuth, server: &Server) -> Partial<Option<Image>> {
        // Booted from volume: nothing to look up.
        let Some(image_id) = server.image_id.as_deref().filter(|id| !id.is_empty()) else {
            return (None, Vec::new());
        };

        match self.api.fetch_image(auth, image_id).await {
            Ok(image) => (Some(image), Vec::new()),
            Err(e) => (
                None,
                vec![Diagnostic::record(FetchStage::Image, Some(image_id), &e)],
            ),
        }
    }

    async fn server_group(
        &self,
        auth: &OpenStackAuth,
        server: &Server,
        instance_id: &str,
    ) -> Partial<Option<ServerGroup>> {
        let lookup = self.config.server_group_lookup;
        if lookup == ServerGroupLookup::Disabled {
            return (None, Vec::new());
        }

        if let Some(group_id) = server.server_groups.iter().find(|id| !id.is_empty()) {
            return match self.api.fetch_server_group(auth, group_id).await {
                Ok(group) => (Some(group), Vec::new()),
                Err(e) => (
                    None,
                    vec![Diagnostic::record(FetchStage::ServerGroup, Some(group_id.as_str()), &e)],
                ),
            };
        }

        if lookup != ServerGroupLookup::Discover {
            return (None, Vec::new());
        }
        match self.api.find_server_group(auth, instance_id).await {
            Ok(group) => (group, Vec::new()),
            Err(e) => (
                None,
                vec![Diagnostic::record(FetchStage::ServerGroup, None, &e)],
            ),
        }
    }

    async fn project_name(&self, auth: &OpenStackAuth, project_id: &str) -> Partial<Option<String>> {
        if auth.project_id().as_str() == project_id {
            if let Some(name) = auth.project_name() {
                return (Some(name.to_string()), Vec::new());
            }
        }

        match self.api.fetch_project(auth, project_id).await {
            Ok(project) => (project.name, Vec::new()),
            Err(e) => (
                None,
                vec![Diagnostic::record(FetchStage::Project, Some(project_id), &e)],
            ),
        }
    }

    async fn flavor(&self, auth: &OpenStackAuth, server: &Server) -> Partial<Option<Flavor>> {
        if !self.config.expand_flavor || !server.flavor.is_incomplete() {
            return (None, Vec::new());
        }
        let Some(flavor_id) = server.flavor.id.as_deref().filter(|id| !id.is_empty()) else {
            return (None, Vec::new());
        };

        match self.api.fetch_flavor(auth, flavor_id).await {
            Ok(flavor) => (Some(flavor), Vec::new()),
            Err(e) => (
                None,
                vec![Diagnostic::record(FetchStage::Flavor, Some(flavor_id), &e)],
            ),
        }
    }
}
