//! Block storage (Cinder) lookups.

use crate::core::{
    domain::{
        error::OpenStackResult,
        model::{
            openstack_auth::OpenStackAuth,
            service_endpoints::ServiceKind,
            volume::{Volume, VolumeResponse},
        },
        value_object::ProjectId,
    },
    infrastructure::api_client::ApiClient,
};

/// `GET {volume}/{project_id}/volumes/{id}`. Catalog URLs of the volume
/// service usually end with the project id already; it is not repeated then.
pub async fn fetch_volume(
    api: &ApiClient,
    auth: &OpenStackAuth,
    project: &ProjectId,
    volume_id: &str,
) -> OpenStackResult<Volume> {
    let base = api.service_url(auth, ServiceKind::Volume);
    let url = if base.ends_with_segment(project.as_str()) {
        base.with_segments(["volumes", volume_id])?
    } else {
        base.with_segments([project.as_str(), "volumes", volume_id])?
    };
    let response: VolumeResponse = api.get(auth, &url, &format!("volume {}", volume_id)).await?;
    Ok(response.volume)
}
