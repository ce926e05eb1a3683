#![allow(clippy::unwrap_used)]
// Integration tests for `AmbiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ambi_api::{AmbiClient, ControlQuantity, Error, Session};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AmbiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AmbiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn session() -> Session {
    Session::new("user-42", SecretString::from("token-abc".to_string()))
}

fn password(pw: &str) -> SecretString {
    SecretString::from(pw.to_string())
}

fn online_device() -> serde_json::Value {
    json!({
        "device_id": "dev-1",
        "operational": true,
        "is_online": true,
        "room_name": "Bedroom",
        "location": { "name": "Home" },
        "sensors": {
            "temperature": { "data": [{ "value": 23.5 }, { "value": 22.0 }] },
            "humidity": { "data": [{ "value": 55.2 }] }
        },
        "appliances": [{
            "appliance_state": { "data": [{ "fan": "Med-High", "mode": "Cool" }] }
        }],
        "control_target": { "quantity": "Climate" }
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .and(body_string_contains("email=me%40example.com"))
        .and(body_string_contains("pwd=hunter2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "user_id": "user-42", "token_id": "token-abc" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = client
        .login("me@example.com", &password("hunter2"))
        .await
        .unwrap();

    assert_eq!(session.user_id, "user-42");
    assert_eq!(session.token_id.expose_secret(), "token-abc");
    assert!(!session.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.login("me@example.com", &password("nope")).await;

    assert!(
        matches!(result, Err(Error::InvalidPassword)),
        "expected InvalidPassword, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_unknown_account() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.login("ghost@example.com", &password("x")).await;

    assert!(
        matches!(result, Err(Error::UnknownAccount)),
        "expected UnknownAccount, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_server_error_is_not_auth_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client
        .login("me@example.com", &password("x"))
        .await
        .unwrap_err();

    assert!(!err.is_auth_failure());
    assert!(matches!(err, Error::Api { status: 500, .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_empty_error_body_uses_status_reason() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client
        .login("me@example.com", &password("x"))
        .await
        .unwrap_err();

    match &err {
        Error::Api { status, message } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert_eq!(err.to_string(), "API error (HTTP 503): Service Unavailable");
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/User"))
        .and(query_param("expand", "appliance,device,location"))
        .and(query_param("user_id", "user-42"))
        .and(header("authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [
                online_device(),
                { "device_id": "dev-2", "operational": true, "is_online": false, "room_name": "Attic" }
            ]
        })))
        .mount(&server)
        .await;

    let devices = client.list_devices(&session()).await.unwrap();

    assert_eq!(devices.len(), 2);

    let first = &devices[0];
    assert_eq!(first.display_name(), "Home Bedroom");
    assert!(first.is_reporting());
    assert_eq!(first.temperature(), Some(23.5));
    assert_eq!(first.humidity(), Some(55.2));
    let state = first.appliance_state().unwrap();
    assert_eq!(state.fan.as_deref(), Some("Med-High"));
    assert_eq!(state.mode.as_deref(), Some("Cool"));
    assert_eq!(first.control_quantity(), Some("Climate"));

    let offline = &devices[1];
    assert!(!offline.is_reporting());
    assert_eq!(offline.temperature(), None);
    assert!(offline.appliance_state().is_none());
}

#[tokio::test]
async fn test_list_devices_busy_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/User"))
        .respond_with(ResponseTemplate::new(503).set_body_string(
            "<html><head><title>Just a moment...</title></head></html>",
        ))
        .mount(&server)
        .await;

    let err = client.list_devices(&session()).await.unwrap_err();
    assert!(err.is_busy(), "expected Busy, got: {err:?}");
}

#[tokio::test]
async fn test_list_devices_busy_page_with_success_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/User"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Just a moment..."))
        .mount(&server)
        .await;

    let err = client.list_devices(&session()).await.unwrap_err();
    assert!(err.is_busy(), "expected Busy, got: {err:?}");
}

#[tokio::test]
async fn test_list_devices_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/User"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_devices(&session()).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized), "got: {err:?}");
}

#[tokio::test]
async fn test_list_devices_malformed_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/User"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"devices\": 7}"))
        .mount(&server)
        .await;

    let err = client.list_devices(&session()).await.unwrap_err();
    assert!(err.is_malformed(), "got: {err:?}");
}

// ── Command tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_set_control_target_power_on() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/AbsoluteApplianceControlTarget"))
        .and(header("authorization", "Bearer token-abc"))
        .and(body_string_contains("device_id=dev-1"))
        .and(body_string_contains("quantity=Climate"))
        .and(body_string_contains("value=1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "quantity": "Climate" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .set_control_target(&session(), "dev-1", ControlQuantity::Climate, 1.0)
        .await
        .unwrap();

    assert_eq!(resp.quantity.as_deref(), Some("Climate"));
}

#[tokio::test]
async fn test_set_control_target_temperature() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/AbsoluteApplianceControlTarget"))
        .and(body_string_contains("quantity=Temperature"))
        .and(body_string_contains("value=24.5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "quantity": "Temperature" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .set_control_target(&session(), "dev-1", ControlQuantity::Temperature, 24.5)
        .await
        .unwrap();

    assert_eq!(resp.quantity.as_deref(), Some("Temperature"));
}

#[tokio::test]
async fn test_submit_feedback() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/UserFeedback"))
        .and(body_string_contains("device_id=dev-1"))
        .and(body_string_contains("feedback=-2"))
        .and(body_string_contains("user_id=user-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.submit_feedback(&session(), "dev-1", -2).await.unwrap();
    assert!(resp.quantity.is_none());
}
