use crate::{
    ClientConfig, FetchStage, GetServerRequest, ServerGroupLookup,
    auth::application::service::token_service::SUBJECT_TOKEN_HEADER,
    tests::common::{
        create_test_client, mount_identity, server_payload, test_client_builder, token_body,
    },
};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_server_record(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p1/servers/abc-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"server": server_payload("abc-123")})),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_every_optional_lookup_failing() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server, "tok-1").await;
    mount_server_record(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(500).set_body_string("nova exploded"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/volume/v3/p1/volumes/vol-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image/v2/images/img-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/os-server-groups/grp-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, ClientConfig::default());
    let report = client
        .inspect(&GetServerRequest::new("abc-123"))
        .await
        .unwrap();

    let server = &report.server;
    assert_eq!(server.name, "web-1");
    assert!(server.interfaces.is_empty());
    assert!(server.volumes.is_empty());
    assert_eq!(server.image.id, "img-1");
    assert_eq!(server.image.name, "");
    assert!(server.server_group.is_none());
    assert!(!server.boot_from_volume);

    let stages: Vec<FetchStage> = report.diagnostics.iter().map(|d| d.stage).collect();
    assert_eq!(
        stages,
        vec![
            FetchStage::Interfaces,
            FetchStage::Volume,
            FetchStage::Image,
            FetchStage::ServerGroup
        ]
    );
    assert_eq!(report.diagnostics[1].resource_id.as_deref(), Some("vol-1"));
    assert_eq!(report.diagnostics[1].http_status, Some(503));
    assert!(report.diagnostics.iter().all(|d| d.error_type == "UpstreamError"));

    let outcome = client.invoke(&GetServerRequest::new("abc-123")).await;
    assert!(!outcome.is_error());
}

#[tokio::test]
async fn test_slow_port_detail_is_tolerated() {
    let mock_server = MockServer::start().await;
    mount_identity(&mock_server, "tok-1").await;

    let mut payload = server_payload("abc-123");
    payload["os-extended-volumes:volumes_attached"] = json!([]);
    payload["image"] = json!({"id": "img-1"});
    payload["server_groups"] = json!([]);
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p1/servers/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server": payload})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interfaceAttachments": [
                {"port_id": "port-1", "net_id": "net-1", "mac_addr": "fa:16:3e:00:00:01"},
                {"port_id": "port-2", "net_id": "net-2", "mac_addr": "fa:16:3e:00:00:02"},
                {"port_id": "port-1", "net_id": "net-1", "mac_addr": "fa:16:3e:00:00:01"}
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network/v2.0/ports/port-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "port": {
                "id": "port-1",
                "fixed_ips": [{"ip_address": "10.0.0.5"}],
                "allowed_address_pairs": [{"ip_address": "10.0.0.0/24"}]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network/v2.0/ports/port-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"port": {"id": "port-2", "fixed_ips": [{"ip_address": "10.0.1.5"}]}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image/v2/images/img-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "img-1", "name": "cirros"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/os-server-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server_groups": []})))
        .mount(&mock_server)
        .await;

    let client = test_client_builder(&mock_server)
        .request_timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let report = client
        .inspect(&GetServerRequest::new("abc-123"))
        .await
        .unwrap();

    let interfaces = &report.server.interfaces;
    assert_eq!(interfaces.len(), 2);
    assert_eq!(interfaces[0].port_id, "port-1");
    assert_eq!(interfaces[0].fixed_ips, vec!["10.0.0.5"]);
    assert_eq!(interfaces[0].allowed_address_pairs, vec!["10.0.0.0/24"]);
    assert_eq!(interfaces[1].port_id, "port-2");
    assert_eq!(interfaces[1].net_id, "net-2");
    assert_eq!(interfaces[1].mac, "fa:16:3e:00:00:02");
    assert!(interfaces[1].fixed_ips.is_empty());
    assert!(interfaces[1].allowed_address_pairs.is_empty());
    assert_eq!(report.server.image.name, "cirros");

    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.stage, FetchStage::PortDetail);
    assert_eq!(diagnostic.resource_id.as_deref(), Some("port-2"));
    assert_eq!(diagnostic.error_type, "UpstreamError");
    assert_eq!(diagnostic.http_status, None);
}

#[tokio::test]
async fn test_compute_unauthorized_forces_new_exchange() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/identity/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(SUBJECT_TOKEN_HEADER, "tok-1")
                .set_body_json(token_body("2099-01-01T00:00:00Z", "p1")),
        )
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p1/servers/abc-123"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let mut payload = server_payload("abc-123");
    payload["os-extended-volumes:volumes_attached"] = json!([]);
    payload["image"] = json!("");
    payload["server_groups"] = json!([]);
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/p1/servers/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"server": payload})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/abc-123/os-interface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"interfaceAttachments": []})))
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        server_group_lookup: ServerGroupLookup::Disabled,
        ..Default::default()
    };
    let client = create_test_client(&mock_server, config);
    let request = GetServerRequest::new("abc-123");

    let first = client.invoke(&request).await.to_json();
    assert_eq!(first["error"]["type"], "UpstreamError");
    assert_eq!(first["error"]["http_status"], 401);
    assert!(!client.is_authenticated(None).await);

    let second = client.invoke(&request).await;
    assert!(!second.is_error());
    assert!(client.is_authenticated(None).await);
}

#[tokio::test]
async fn test_unreachable_identity_is_auth_error_without_status() {
    let client = crate::OpenStackClient::builder()
        .host("127.0.0.1")
        .unwrap()
        .credentials("admin", "secret", "p1")
        .unwrap()
        .identity_url("http://127.0.0.1:9/v3")
        .unwrap()
        .request_timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let outcome = client.invoke(&GetServerRequest::new("abc-123")).await.to_json();
    assert_eq!(outcome["error"]["type"], "AuthError");
    assert!(outcome["error"].get("http_status").is_none());
}
