//! Identity (Keystone) lookups made with an already issued token.

use crate::core::{
    domain::{
        error::OpenStackResult,
        model::{
            openstack_auth::OpenStackAuth,
            project::{Project, ProjectResponse},
            service_endpoints::ServiceKind,
        },
    },
    infrastructure::api_client::ApiClient,
};

/// `GET {identity}/projects/{id}`.
pub async fn fetch_project(
    api: &ApiClient,
    auth: &OpenStackAuth,
    project_id: &str,
) -> OpenStackResult<Project> {
    let url = api
        .service_url(auth, ServiceKind::Identity)
        .with_segments(["projects", project_id])?;
    let response: ProjectResponse = api
        .get(auth, &url, &format!("project {}", project_id))
        .await?;
    Ok(response.project)
}
