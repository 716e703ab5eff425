//! Networking (Neutron) lookups.

use crate::core::{
    domain::{
        error::OpenStackResult,
        model::{
            openstack_auth::OpenStackAuth,
            port::{Port, PortResponse},
            service_endpoints::ServiceKind,
        },
    },
    infrastructure::api_client::ApiClient,
};

/// `GET {network}/ports/{id}`.
pub async fn fetch_port_detail(
    api: &ApiClient,
    auth: &OpenStackAuth,
    port_id: &str,
) -> OpenStackResult<Port> {
    let url = api
        .service_url(auth, ServiceKind::Network)
        .with_segments(["ports", port_id])?;
    let response: PortResponse = api.get(auth, &url, &format!("port {}", port_id)).await?;
    Ok(response.port)
}
