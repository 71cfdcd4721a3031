#![allow(clippy::unwrap_used)]
// Integration tests for `AcsClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use acslink_api::devices::{id_filter, wan_mac_filter};
use acslink_api::{AcsClient, BasicAuth, Error, Task};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AcsClient) {
    let server = MockServer::start().await;
    let client = AcsClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Some(BasicAuth {
            username: "acs".into(),
            password: "s3cret".to_string().into(),
        }),
    )
    .unwrap();
    (server, client)
}

fn device_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "_deviceId": { "_ProductClass": "1200R", "_SerialNumber": "ITBS0001" },
        "_lastInform": "2024-05-01T10:00:00.000Z",
        "InternetGatewayDevice": {
            "LANDevice": { "1": { "WLANConfiguration": { "1": { "SSID": { "_value": "Home5G" } } } } }
        }
    })
}

// ── Inventory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_sends_basic_auth() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(basic_auth("acs", "s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([device_json("dev-1"), device_json("dev-2")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, "dev-1");
    assert_eq!(devices[1].id, "dev-2");
    assert_eq!(
        devices[0].last_inform.as_deref(),
        Some("2024-05-01T10:00:00.000Z")
    );
}

#[tokio::test]
async fn test_find_by_wan_mac_passes_raw_value() {
    let (server, client) = setup().await;
    let expected = wan_mac_filter("AA:BB:CC:11:22:33").to_string();

    Mock::given(method("GET"))
        .and(path("/devices/"))
        .and(query_param("query", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([device_json("dev-9")])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.find_by_wan_mac("AA:BB:CC:11:22:33").await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "dev-9");
}

#[tokio::test]
async fn test_get_device_missing_returns_none() {
    let (server, client) = setup().await;
    let expected = id_filter("gone").to_string();

    Mock::given(method("GET"))
        .and(path("/devices/"))
        .and(query_param("query", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.get_device("gone").await.unwrap().is_none());
}

#[tokio::test]
async fn test_count_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            device_json("a"),
            device_json("b"),
            device_json("c")
        ])))
        .mount(&server)
        .await;

    assert_eq!(client.count_devices().await.unwrap(), 3);
}

// ── Tasks ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_submit_task_posts_parameter_values() {
    let (server, client) = setup().await;
    let ssid_path = "InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.SSID";

    Mock::given(method("POST"))
        .and(path("/devices/dev-1/tasks"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "name": "setParameterValues",
            "parameterValues": [[ssid_path, "NewName"]]
        })))
        .and(|req: &Request| req.url.query().is_none())
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "_id": "task-1",
            "name": "setParameterValues",
            "device": "dev-1",
            "timestamp": "2024-05-01T10:00:05.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client
        .submit_task("dev-1", &Task::set_parameter(ssid_path, "NewName"), false)
        .await
        .unwrap();

    assert_eq!(receipt.id.as_deref(), Some("task-1"));
    assert_eq!(receipt.device.as_deref(), Some("dev-1"));
    assert!(receipt.queued);
}

#[tokio::test]
async fn test_submit_task_with_connection_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/devices/dev-1/tasks"))
        .and(|req: &Request| req.url.query() == Some("connection_request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "task-2" })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client
        .submit_task("dev-1", &Task::set_parameter("X.Y", 1), true)
        .await
        .unwrap();

    assert!(!receipt.queued);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_is_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    assert!(
        matches!(result, Err(Error::Authentication { status: 401 })),
        "expected Authentication, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_500_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Device is offline"))
        .mount(&server)
        .await;

    let result = client
        .submit_task("dev-1", &Task::set_parameter("X.Y", "z"), false)
        .await;

    match result {
        Err(Error::Http { status, ref body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Device is offline");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "<html>maintenance</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = AcsClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1").unwrap(),
        None,
    )
    .unwrap();

    let result = client.list_devices().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}
