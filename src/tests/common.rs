//! Fixtures shared by the unit and scenario tests.
//!
//! Every service of a test connection lives under one mock server, below a
//! per-service prefix: `/identity/v3`, `/compute/v2.1`, `/network/v2.0`,
//! `/volume/v3` and `/image/v2`.

use crate::{
    ClientConfig, OpenStackClient, OpenStackClientBuilder,
    auth::application::service::token_service::SUBJECT_TOKEN_HEADER,
    core::{
        domain::{
            model::{
                openstack_auth::OpenStackAuth,
                openstack_connection::OpenStackConnection,
                service_catalog::ServiceCatalog,
                service_endpoints::{ServiceEndpoints, ServiceKind},
            },
            value_object::{
                OpenStackHost, OpenStackPassword, OpenStackToken, OpenStackUrl, OpenStackUsername,
                ProjectId, UserDomain,
            },
        },
        infrastructure::api_client::ApiClient,
    },
};
use chrono::Utc;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub(crate) const SERVICE_PREFIXES: [(ServiceKind, &str); 5] = [
    (ServiceKind::Identity, "identity/v3"),
    (ServiceKind::Compute, "compute/v2.1"),
    (ServiceKind::Network, "network/v2.0"),
    (ServiceKind::Volume, "volume/v3"),
    (ServiceKind::Image, "image/v2"),
];

pub(crate) fn create_test_connection(server_url: &str) -> OpenStackConnection {
    create_test_connection_with_timeout(server_url, Duration::from_secs(5))
}

pub(crate) fn create_test_connection_with_timeout(
    server_url: &str,
    request_timeout: Duration,
) -> OpenStackConnection {
    let host = OpenStackHost::new_unchecked("127.0.0.1".to_string());
    let username = OpenStackUsername::new_unchecked("admin".to_string());
    let password = OpenStackPassword::new_unchecked("secret".to_string());
    let project_id = ProjectId::new("p1").unwrap();

    let mut endpoints = ServiceEndpoints::for_host(&host, false).unwrap();
    for (kind, prefix) in SERVICE_PREFIXES {
        endpoints.set(
            kind,
            OpenStackUrl::new(format!("{}/{}", server_url, prefix)).unwrap(),
        );
    }

    OpenStackConnection::new(
        host,
        username,
        password,
        project_id,
        UserDomain::default(),
        false,
        request_timeout,
        endpoints,
    )
}

/// A token valid for an hour, scoped to `project_id` ("demo-project" when it is `p1`).
pub(crate) fn create_test_auth(project_id: &str) -> OpenStackAuth {
    let token = OpenStackToken::new(
        "test-token".to_string(),
        Utc::now() + chrono::Duration::hours(1),
    )
    .unwrap();
    let project_name = (project_id == "p1").then(|| "demo-project".to_string());
    OpenStackAuth::new(
        token,
        ProjectId::new(project_id).unwrap(),
        project_name,
        ServiceCatalog::default(),
    )
}

pub(crate) async fn create_authenticated_client(
    mock_server: &MockServer,
) -> (ApiClient, OpenStackAuth) {
    let connection = create_test_connection(&mock_server.uri());
    let client = ApiClient::new(connection, ClientConfig::default()).unwrap();
    let auth = create_test_auth("p1");
    client.tokens().set_auth(auth.clone()).await;
    (client, auth)
}

/// A builder whose every endpoint points at `mock_server`.
pub(crate) fn test_client_builder(mock_server: &MockServer) -> OpenStackClientBuilder {
    let uri = mock_server.uri();
    OpenStackClient::builder()
        .host("127.0.0.1")
        .unwrap()
        .credentials("admin", "secret", "p1")
        .unwrap()
        .identity_url(format!("{}/identity/v3", uri))
        .unwrap()
        .compute_url(format!("{}/compute/v2.1", uri))
        .unwrap()
        .network_url(format!("{}/network/v2.0", uri))
        .unwrap()
        .volume_url(format!("{}/volume/v3", uri))
        .unwrap()
        .image_url(format!("{}/image/v2", uri))
        .unwrap()
        .request_timeout(Duration::from_secs(5))
}

pub(crate) fn create_test_client(mock_server: &MockServer, config: ClientConfig) -> OpenStackClient {
    test_client_builder(mock_server).config(config).build().unwrap()
}

/// Keystone token body; the token itself goes in the `X-Subject-Token` header.
pub(crate) fn token_body(expires_at: &str, project_id: &str) -> Value {
    json!({
        "token": {
            "methods": ["password"],
            "expires_at": expires_at,
            "issued_at": "2026-01-01T00:00:00.000000Z",
            "project": {"id": project_id, "name": "demo-project", "domain": {"id": "default"}},
            "user": {"id": "u-1", "name": "admin"},
            "catalog": []
        }
    })
}

/// Mounts a successful identity exchange issuing `token`.
pub(crate) async fn mount_identity(mock_server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(SUBJECT_TOKEN_HEADER, token)
                .set_body_json(token_body("2099-01-01T00:00:00.000000Z", "p1")),
        )
        .mount(mock_server)
        .await;
}

/// A compute record with one volume, an image, a server group and a root device.
pub(crate) fn server_payload(instance_id: &str) -> Value {
    json!({
        "id": instance_id,
        "name": "web-1",
        "status": "ACTIVE",
        "tenant_id": "p1",
        "user_id": "u-1",
        "flavor": {
            "original_name": "m1.small",
            "vcpus": 1,
            "ram": 2048,
            "disk": 20,
            "ephemeral": 0,
            "extra_specs": {}
        },
        "image": {"id": "img-1", "links": []},
        "OS-EXT-AZ:availability_zone": "nova",
        "OS-EXT-SRV-ATTR:host": "compute-01",
        "OS-EXT-SRV-ATTR:hypervisor_hostname": "compute-01.local",
        "OS-EXT-SRV-ATTR:root_device_name": "/dev/vda",
        "security_groups": [{"name": "default"}, {"name": "web"}, {"name": "default"}],
        "tags": ["prod"],
        "metadata": {"role": "frontend"},
        "created": "2026-01-01T00:00:00Z",
        "updated": "2026-01-02T00:00:00Z",
        "os-extended-volumes:volumes_attached": [{"id": "vol-1", "delete_on_termination": false}],
        "server_groups": ["grp-1"],
        "addresses": {"private": [{"addr": "10.0.0.5", "version": 4}]}
    })
}
