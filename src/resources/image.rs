//! Image (Glance) lookups.

use crate::core::{
    domain::{
        error::OpenStackResult,
        model::{image::Image, openstack_auth::OpenStackAuth, service_endpoints::ServiceKind},
    },
    infrastructure::api_client::ApiClient,
};

/// `GET {image}/images/{id}`. Glance returns the image unwrapped.
pub async fn fetch_image(
    api: &ApiClient,
    auth: &OpenStackAuth,
    image_id: &str,
) -> OpenStackResult<Image> {
    let url = api
        .service_url(auth, ServiceKind::Image)
        .with_segments(["images", image_id])?;
    api.get(auth, &url, &format!("image {}", image_id)).await
}
