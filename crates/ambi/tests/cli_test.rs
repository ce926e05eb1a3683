//! Integration tests for the `ambi` CLI binary.
//!
//! Argument parsing and config handling run without a network; the
//! one-shot device commands run against a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `ambi` binary with env isolation.
fn ambi_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ambi");
    cmd.env("HOME", "/tmp/ambi-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ambi-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/ambi-cli-test-nonexistent")
        .env_remove("AMBI_CONFIG")
        .env_remove("AMBI_OUTPUT")
        .env_remove("AMBI_TIMEOUT")
        .env_remove("AMBI_PASSWORD")
        .env_remove("AMBI_ACCOUNT__EMAIL")
        .env_remove("AMBI_ACCOUNT__BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// `ambi_cmd()` pointed at `config`.
fn ambi_with(config: &Path) -> assert_cmd::Command {
    let mut cmd = ambi_cmd();
    cmd.arg("--config").arg(config);
    cmd
}

fn write_config(dir: &Path, base_url: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            r#"
            [account]
            base_url = "{base_url}"
            email = "me@example.com"

            [[devices]]
            location_name = "Home"
            room_name = "Bedroom"
            "#
        ),
    )
    .unwrap();
    path
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .and(body_string_contains("pwd=hunter2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "user_id": "user-42", "token_id": "token-abc" })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/UserCredential"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/User"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [{
                "device_id": "dev-1",
                "operational": true,
                "is_online": true,
                "room_name": "Bedroom",
                "location": { "name": "Home" },
                "sensors": {
                    "temperature": { "data": [{ "value": 23.5 }] },
                    "humidity": { "data": [{ "value": 55.0 }] }
                },
                "appliances": [{
                    "appliance_state": { "data": [{ "fan": "Auto", "mode": "Cool" }] }
                }],
                "control_target": { "quantity": "Off" }
            }]
        })))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = ambi_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    ambi_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Ambi Climate")
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("switch"))
            .and(predicate::str::contains("temperature"))
            .and(predicate::str::contains("feedback")),
    );
}

#[test]
fn test_version_flag() {
    ambi_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ambi"));
}

#[test]
fn test_config_subcommands_exist() {
    ambi_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("add-device"))
                .and(predicate::str::contains("set-password")),
        );
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = ambi_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_power_state() {
    let output = ambi_cmd()
        .args(["switch", "Home Bedroom", "sideways"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_invalid_output_format() {
    let output = ambi_cmd()
        .args(["--output", "yaml", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Config handling ─────────────────────────────────────────────────

#[test]
fn test_status_without_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    ambi_with(&dir.path().join("missing.toml"))
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    ambi_with(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_add_device_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    ambi_with(&path)
        .args(["config", "init", "--email", "me@example.com"])
        .assert()
        .success();
    assert!(path.exists());

    ambi_with(&path)
        .args(["config", "init", "--email", "me@example.com"])
        .assert()
        .failure()
        .code(2);

    ambi_with(&path)
        .args(["config", "add-device", "Home", "Bedroom", "--heater-cooler"])
        .assert()
        .success();

    ambi_with(&path)
        .args(["config", "set", "bridge.read_mode", "direct"])
        .assert()
        .success();

    let output = ambi_with(&path)
        .args(["-o", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["account"]["email"], "me@example.com");
    assert_eq!(shown["bridge"]["read_mode"], "direct");
    assert_eq!(shown["devices"][0]["room_name"], "Bedroom");
    assert_eq!(shown["devices"][0]["heater_cooler_mode"], true);
}

#[test]
fn test_config_show_redacts_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[account]\nemail = \"me@example.com\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    ambi_with(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("********"));
}

#[test]
fn test_config_set_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    ambi_with(&dir.path().join("config.toml"))
        .args(["config", "set", "bridge.colour", "blue"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_duplicate_device_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "https://rest.ambiclimate.com/");
    ambi_with(&path)
        .args(["config", "add-device", "Home", "Bedroom"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already configured"));
}

// ── Device commands against a mock service ──────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_lists_devices() {
    let server = mock_service().await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), &server.uri());

    ambi_with(&path)
        .env("AMBI_PASSWORD", "hunter2")
        .args(["--output", "plain", "status"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Home Bedroom\n"));

    let output = ambi_with(&path)
        .env("AMBI_PASSWORD", "hunter2")
        .args(["--output", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["device"], "Home Bedroom");
    assert_eq!(rows[0]["temperature"], 23.5);
    assert_eq!(rows[0]["fan"], "Auto");
    assert_eq!(rows[0]["mode"], "Off");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_switch_on_reports_mode() {
    let server = mock_service().await;
    Mock::given(method("PUT"))
        .and(path("/AbsoluteApplianceControlTarget"))
        .and(body_string_contains("device_id=dev-1"))
        .and(body_string_contains("quantity=Climate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "quantity": "Climate" })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), &server.uri());

    ambi_with(&path)
        .env("AMBI_PASSWORD", "hunter2")
        .args(["--color", "never", "switch", "Home Bedroom", "on"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Switched Home Bedroom on (mode: Climate)",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unrecognised_feedback_sends_comfortable() {
    let server = mock_service().await;
    Mock::given(method("PUT"))
        .and(path("/UserFeedback"))
        .and(body_string_contains("device_id=dev-1"))
        .and(body_string_contains("feedback=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), &server.uri());

    ambi_with(&path)
        .env("AMBI_PASSWORD", "hunter2")
        .args(["--color", "never", "feedback", "Home Bedroom", "lukewarm"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("unrecognised feedback")
                .and(predicate::str::contains("Sent \"Comfortable\" for Home Bedroom")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_device_exits_not_found() {
    let server = mock_service().await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), &server.uri());

    ambi_with(&path)
        .env("AMBI_PASSWORD", "hunter2")
        .args(["temperature", "Home Attic", "21"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Home Attic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wrong_password_exits_auth() {
    let server = mock_service().await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), &server.uri());

    ambi_with(&path)
        .env("AMBI_PASSWORD", "wrong")
        .arg("status")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}
