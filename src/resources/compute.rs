//! Compute (Nova) lookups: server, interfaces, flavor and server groups.

use crate::core::{
    domain::{
        error::{OpenStackError, OpenStackResult},
        model::{
            flavor::{Flavor, FlavorResponse},
            openstack_auth::OpenStackAuth,
            port::{InterfaceAttachment, InterfaceAttachmentsResponse},
            server_group::{ServerGroup, ServerGroupResponse, ServerGroupsResponse},
            service_endpoints::ServiceKind,
        },
        value_object::{InstanceId, ProjectId},
    },
    infrastructure::api_client::ApiClient,
};
use serde_json::Value;

/// `GET {compute}/{project_id}/servers/{id}`.
///
/// Returns the `server` object of the response, or the whole body when the
/// response is not wrapped.
///
/// # Errors
/// `NotFound` when the instance does not exist in the project; see
/// [`ApiClient::get`] for the rest.
pub async fn fetch_server(
    api: &ApiClient,
    auth: &OpenStackAuth,
    project: &ProjectId,
    instance_id: &InstanceId,
) -> OpenStackResult<Value> {
    let url = api
        .service_url(auth, ServiceKind::Compute)
        .with_segments([project.as_str(), "servers", instance_id.as_str()])?;
    let what = format!("server {} in project {}", instance_id, project);

    match api.get::<Value>(auth, &url, &what).await? {
        Value::Object(mut body) => match body.remove("server") {
            Some(server @ Value::Object(_)) => Ok(server),
            Some(_) => Err(OpenStackError::Unexpected(format!(
                "Compute returned a malformed record for {}",
                what
            ))),
            None if body.get("id").and_then(Value::as_str) == Some(instance_id.as_str()) => {
                Ok(Value::Object(body))
            }
            None => Err(OpenStackError::Unexpected(format!(
                "Compute returned no record for {}",
                what
            ))),
        },
        _ => Err(OpenStackError::Unexpected(format!(
            "Compute returned a non-object body for {}",
            what
        ))),
    }
}

/// `GET {compute}/servers/{id}/os-interface`.
pub async fn fetch_interfaces(
    api: &ApiClient,
    auth: &OpenStackAuth,
    instance_id: &str,
) -> OpenStackResult<Vec<InterfaceAttachment>> {
    let url = api
        .service_url(auth, ServiceKind::Compute)
        .with_segments(["servers", instance_id, "os-interface"])?;
    let response: InterfaceAttachmentsResponse = api
        .get(auth, &url, &format!("interfaces of server {}", instance_id))
        .await?;
    Ok(response.interface_attachments)
}

/// `GET {compute}/flavors/{id}`.
pub async fn fetch_flavor(
    api: &ApiClient,
    auth: &OpenStackAuth,
    flavor_id: &str,
) -> OpenStackResult<Flavor> {
    let url = api
        .service_url(auth, ServiceKind::Compute)
        .with_segments(["flavors", flavor_id])?;
    let response: FlavorResponse = api.get(auth, &url, &format!("flavor {}", flavor_id)).await?;
    Ok(response.flavor)
}

/// `GET {compute}/os-server-groups/{id}`.
pub async fn fetch_server_group(
    api: &ApiClient,
    auth: &OpenStackAuth,
    group_id: &str,
) -> OpenStackResult<ServerGroup> {
    let url = api
        .service_url(auth, ServiceKind::Compute)
        .with_segments(["os-server-groups", group_id])?;
    let response: ServerGroupResponse = api
        .get(auth, &url, &format!("server group {}", group_id))
        .await?;
    Ok(response.server_group)
}

/// `GET {compute}/os-server-groups`, then the first group listing `instance_id` as a member.
pub async fn find_server_group(
    api: &ApiClient,
    auth: &OpenStackAuth,
    instance_id: &str,
) -> OpenStackResult<Option<ServerGroup>> {
    let url = api
        .service_url(auth, ServiceKind::Compute)
        .with_segments(["os-server-groups"])?;
    let response: ServerGroupsResponse = api.get(auth, &url, "server groups").await?;
    Ok(response
        .server_groups
        .into_iter()
        .find(|group| group.has_member(instance_id)))
}
