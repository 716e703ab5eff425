use crate::{
    ClientConfig, GetServerRequest,
    core::infrastructure::api_client::AUTH_TOKEN_HEADER,
    tests::common::{create_test_client, mount_identity, server_payload, token_body},
    auth::application::service::token_service::SUBJECT_TOKEN_HEADER,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_partial_json, header, method, path},
};

/// Mounts every upstream lookup of a healthy instance `abc-123`.
async fn mount_healthy_server(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p1/servers/abc-123"))
        .and(header(AUTH_TOKEN_HEADER, "tok-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"server": server_payload("abc-123")})),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interfaceAttachments": [
                {
                    "port_id": "port-1",
                    "net_id": "net-1",
                    "mac_addr": "fa:16:3e:00:00:01",
                    "port_state": "ACTIVE",
                    "fixed_ips": [{"ip_address": "10.0.0.5", "subnet_id": "sub-1"}]
                },
                {"port_id": "port-2", "net_id": "net-2", "port_state": "ACTIVE"}
            ]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/network/v2.0/ports/port-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "port": {
                "id": "port-1",
                "network_id": "net-1",
                "mac_address": "fa:16:3e:00:00:01",
                "fixed_ips": [{"ip_address": "10.0.0.5", "subnet_id": "sub-1"}],
                "allowed_address_pairs": [{"ip_address": "10.0.0.100/32", "mac_address": "fa:16:3e:00:00:01"}]
            }
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/network/v2.0/ports/port-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "port": {
                "id": "port-2",
                "network_id": "net-2",
                "mac_address": "fa:16:3e:00:00:02",
                "fixed_ips": [{"ip_address": "192.168.1.7", "subnet_id": "sub-2"}],
                "allowed_address_pairs": []
            }
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/volume/v3/p1/volumes/vol-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volume": {
                "id": "vol-1",
                "name": "root-disk",
                "size": 40,
                "status": "in-use",
                "bootable": "true",
                "attachments": [{"server_id": "abc-123", "device": "/dev/vda", "attachment_id": "att-1"}]
            }
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/image/v2/images/img-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "img-1",
            "name": "ubuntu-22.04",
            "status": "active"
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/os-server-groups/grp-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "server_group": {
                "id": "grp-1",
                "name": "web-anti-affinity",
                "members": ["abc-123"],
                "policy": "anti-affinity"
            }
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_get_server_full_record() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server, "tok-1").await;
    mount_healthy_server(&mock_server).await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let report = client
        .inspect(&GetServerRequest::new(" abc-123 "))
        .await
        .unwrap();
    assert!(report.diagnostics.is_empty());

    let server = report.server;
    assert_eq!(server.instance_id, "abc-123");
    assert_eq!(server.name, "web-1");
    assert_eq!(server.status, "ACTIVE");
    assert_eq!(server.project.id, "p1");
    assert_eq!(server.project.name, "demo-project");
    assert_eq!(server.flavor.name, "m1.small");
    assert_eq!(server.flavor.vcpus, Some(1));
    assert_eq!(server.flavor.ram_mb, Some(2048));
    assert_eq!(server.flavor.disk_gb, Some(20));
    assert_eq!(server.image.id, "img-1");
    assert_eq!(server.image.name, "ubuntu-22.04");
    assert!(server.boot_from_volume);
    assert_eq!(server.volumes.len(), 1);
    assert_eq!(server.volumes[0].device, "/dev/vda");
    assert!(server.volumes[0].bootable);
    assert_eq!(server.interfaces.len(), 2);
    assert_eq!(server.interfaces[0].allowed_address_pairs, vec!["10.0.0.100/32"]);
    assert_eq!(server.interfaces[1].mac, "fa:16:3e:00:00:02");
    assert_eq!(server.interfaces[1].fixed_ips, vec!["192.168.1.7"]);
    assert_eq!(server.availability_zone, "nova");
    assert_eq!(server.host, "compute-01");
    assert_eq!(server.hypervisor_hostname, "compute-01.local");
    assert_eq!(server.security_groups, vec!["default", "web"]);
    assert_eq!(server.tags, vec!["prod"]);
    assert_eq!(server.metadata.get("role").map(String::as_str), Some("frontend"));
    assert_eq!(server.created, "2026-01-01T00:00:00Z");
    let group = server.server_group.clone().unwrap();
    assert_eq!(group.name, "web-anti-affinity");
    assert_eq!(server.raw.nova, server_payload("abc-123"));
}

#[tokio::test]
async fn test_repeated_invocations_are_identical_and_share_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(SUBJECT_TOKEN_HEADER, "tok-1")
                .set_body_json(token_body("2099-01-01T00:00:00Z", "p1")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_healthy_server(&mock_server).await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let request = GetServerRequest::new("abc-123");
    let first = client.invoke(&request).await;
    let second = client.invoke(&request).await;

    assert!(!first.is_error());
    assert_eq!(first.to_json(), second.to_json());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_expired_token_is_exchanged_again() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(SUBJECT_TOKEN_HEADER, "tok-1")
                .set_body_json(token_body("2000-01-01T00:00:00Z", "p1")),
        )
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_healthy_server(&mock_server).await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let request = GetServerRequest::new("abc-123");
    assert!(!client.invoke(&request).await.is_error());
    assert!(!client.invoke(&request).await.is_error());
}

#[tokio::test]
async fn test_instance_not_found() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server, "tok-1").await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p1/servers/abc-123"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"code": 404, "message": "Instance abc-123 could not be found."}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let outcome = client.invoke(&GetServerRequest::new("abc-123")).await.to_json();

    assert_eq!(outcome["error"]["type"], "NotFoundError");
    assert_eq!(outcome["error"]["http_status"], 404);
    assert!(outcome["error"]["message"].as_str().unwrap().contains("abc-123"));
}

#[tokio::test]
async fn test_rejected_credentials_skip_compute() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "title": "Unauthorized"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let outcome = client.invoke(&GetServerRequest::new("abc-123")).await.to_json();

    assert_eq!(outcome["error"]["type"], "AuthError");
    assert_eq!(outcome["error"]["http_status"], 401);
    assert!(!client.is_authenticated(None).await);
}

#[tokio::test]
async fn test_blank_instance_never_reaches_the_network() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    for instance_id in ["", "   ", "\t\n"] {
        let outcome = client.invoke(&GetServerRequest::new(instance_id)).await.to_json();
        assert_eq!(outcome["error"]["type"], "ValidationError");
        assert_eq!(outcome["error"]["details"]["field"], "instance_id");
        assert!(outcome["error"].get("http_status").is_none());
    }
}

#[tokio::test]
async fn test_dot_instance_ids_never_reach_the_network() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server, "tok-1").await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"servers": [{"id": "other-vm"}]})),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    for instance_id in [".", "..", " .. "] {
        let outcome = client.invoke(&GetServerRequest::new(instance_id)).await.to_json();
        assert_eq!(outcome["error"]["type"], "ValidationError");
        assert!(outcome.get("instance_id").is_none());
    }
}

#[tokio::test]
async fn test_project_override_scopes_the_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .and(body_partial_json(json!({"auth": {"scope": {"project": {"id": "p2"}}}})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(SUBJECT_TOKEN_HEADER, "tok-2")
                .set_body_json(json!({
                    "token": {
                        "expires_at": "2099-01-01T00:00:00Z",
                        "project": {"id": "p2", "name": "analytics"}
                    }
                })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut payload = server_payload("abc-123");
    payload["tenant_id"] = json!("p2");
    payload["os-extended-volumes:volumes_attached"] = json!([]);
    payload["image"] = json!("");
    payload["server_groups"] = json!([]);
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p2/servers/abc-123"))
        .and(header(AUTH_TOKEN_HEADER, "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server": payload})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"interfaceAttachments": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/os-server-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server_groups": []})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let server = client.get_server("abc-123", Some("p2")).await.unwrap();

    assert_eq!(server.project.id, "p2");
    assert_eq!(server.project.name, "analytics");
    assert!(server.server_group.is_none());
    assert!(client.is_authenticated(Some("p2")).await);
    assert!(!client.is_authenticated(None).await);
}

#[tokio::test]
async fn test_catalog_endpoints_are_used_when_enabled() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(SUBJECT_TOKEN_HEADER, "tok-1")
                .set_body_json(json!({
                    "token": {
                        "expires_at": "2099-01-01T00:00:00Z",
                        "project": {"id": "p1", "name": "demo-project"},
                        "catalog": [
                            {
                                "type": "compute",
                                "name": "nova",
                                "endpoints": [
                                    {"interface": "internal", "url": "http://10.255.255.1:8774/v2.1", "region": "RegionOne"},
                                    {"interface": "public", "url": format!("{}/catalog/compute", uri), "region": "RegionOne"}
                                ]
                            },
                            {
                                "type": "volumev3",
                                "name": "cinderv3",
                                "endpoints": [
                                    {"interface": "public", "url": format!("{}/catalog/volume/p1", uri), "region": "RegionOne"}
                                ]
                            }
                        ]
                    }
                })),
        )
        .mount(&mock_server)
        .await;

    let mut payload = server_payload("abc-123");
    payload["image"] = json!("");
    payload["server_groups"] = json!([]);
    Mock::given(method("GET"))
        .and(path("/catalog/compute/p1/servers/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server": payload})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/compute/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"interfaceAttachments": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/compute/os-server-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server_groups": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/volume/p1/volumes/vol-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volume": {"id": "vol-1", "size": 10, "status": "in-use", "bootable": true,
                       "attachments": [{"server_id": "abc-123", "device": "/dev/vda"}]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        use_service_catalog: true,
        ..Default::default()
    };
    let client = create_test_client(&mock_server, config);
    let report = client.inspect(&GetServerRequest::new("abc-123")).await.unwrap();

    assert!(report.diagnostics.is_empty());
    assert!(report.server.boot_from_volume);
    assert_eq!(report.server.volumes[0].size_gb, 10);
}
