//! Per-service fetchers and the seam the orchestrator calls them through.

pub mod compute;
pub mod identity;
pub mod image;
pub mod network;
pub mod volume;

use crate::core::{
    domain::{
        error::OpenStackResult,
        model::{
            flavor::Flavor, image::Image, openstack_auth::OpenStackAuth,
            port::{InterfaceAttachment, Port},
            project::Project,
            server_group::ServerGroup,
            volume::Volume,
        },
        value_object::{InstanceId, ProjectId},
    },
    infrastructure::api_client::ApiClient,
};
use async_trait::async_trait;
use serde_json::Value;

/// Upstream calls the aggregation needs, one method per REST lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Returns a token scoped to `project`.
    async fn authenticate(&self, project: &ProjectId) -> OpenStackResult<OpenStackAuth>;

    /// The compute record of `instance_id`, undecoded.
    async fn fetch_server(
        &self,
        auth: &OpenStackAuth,
        project: &ProjectId,
        instance_id: &InstanceId,
    ) -> OpenStackResult<Value>;

    async fn fetch_interfaces(
        &self,
        auth: &OpenStackAuth,
        instance_id: &str,
    ) -> OpenStackResult<Vec<InterfaceAttachment>>;

    async fn fetch_port_detail(&self, auth: &OpenStackAuth, port_id: &str) -> OpenStackResult<Port>;

    async fn fetch_volume(
        &self,
        auth: &OpenStackAuth,
        project: &ProjectId,
        volume_id: &str,
    ) -> OpenStackResult<Volume>;

    async fn fetch_image(&self, auth: &OpenStackAuth, image_id: &str) -> OpenStackResult<Image>;

    async fn fetch_server_group(
        &self,
        auth: &OpenStackAuth,
        group_id: &str,
    ) -> OpenStackResult<ServerGroup>;

    /// Lists the groups visible to the token and returns the one `instance_id` belongs to.
    async fn find_server_group(
        &self,
        auth: &OpenStackAuth,
        instance_id: &str,
    ) -> OpenStackResult<Option<ServerGroup>>;

    async fn fetch_project(&self, auth: &OpenStackAuth, project_id: &str) -> OpenStackResult<Project>;

    async fn fetch_flavor(&self, auth: &OpenStackAuth, flavor_id: &str) -> OpenStackResult<Flavor>;
}

#[async_trait]
impl CloudApi for ApiClient {
    async fn authenticate(&self, project: &ProjectId) -> OpenStackResult<OpenStackAuth> {
        ApiClient::authenticate(self, project).await
    }

    async fn fetch_server(
        &self,
        auth: &OpenStackAuth,
        project: &ProjectId,
        instance_id: &InstanceId,
    ) -> OpenStackResult<Value> {
        compute::fetch_server(self, auth, project, instance_id).await
    }

    async fn fetch_interfaces(
        &self,
        auth: &OpenStackAuth,
        instance_id: &str,
    ) -> OpenStackResult<Vec<InterfaceAttachment>> {
        compute::fetch_interfaces(self, auth, instance_id).await
    }

    async fn fetch_port_detail(&self, auth: &OpenStackAuth, port_id: &str) -> OpenStackResult<Port> {
        network::fetch_port_detail(self, auth, port_id).await
    }

    async fn fetch_volume(
        &self,
        auth: &OpenStackAuth,
        project: &ProjectId,
        volume_id: &str,
    ) -> OpenStackResult<Volume> {
        volume::fetch_volume(self, auth, project, volume_id).await
    }

    async fn fetch_image(&self, auth: &OpenStackAuth, image_id: &str) -> OpenStackResult<Image> {
        image::fetch_image(self, auth, image_id).await
    }

    async fn fetch_server_group(
        &self,
        auth: &OpenStackAuth,
        group_id: &str,
    ) -> OpenStackResult<ServerGroup> {
        compute::fetch_server_group(self, auth, group_id).await
    }

    async fn find_server_group(
        &self,
        auth: &OpenStackAuth,
        instance_id: &str,
    ) -> OpenStackResult<Option<ServerGroup>> {
        compute::find_server_group(self, auth, instance_id).await
    }

    async fn fetch_project(&self, auth: &OpenStackAuth, project_id: &str) -> OpenStackResult<Project> {
        identity::fetch_project(self, auth, project_id).await
    }

    async fn fetch_flavor(&self, auth: &OpenStackAuth, flavor_id: &str) -> OpenStackResult<Flavor> {
        compute::fetch_flavor(self, auth, flavor_id).await
    }
}
