//! End-to-end tests for the `icloud` binary against a mock CloudKit server.

use std::path::Path;
use std::process::Output;

use p256::ecdsa::SigningKey;
use p256::pkcs8::{EncodePrivateKey, LineEnding};
use rand::rngs::OsRng;
use serde_json::json;
use tokio::process::Command;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTAINER: &str = "iCloud.com.example.App";
const MODIFY_PATH: &str = "/database/1/iCloud.com.example.App/development/private/records/modify";

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_icloud"));
    cmd.args(args);
    for var in [
        "ICLOUD_CONTAINER",
        "ICLOUD_KEY_ID",
        "ICLOUD_PRIVATE_KEY",
        "ICLOUD_PRIVATE_KEY_FILE",
        "ICLOUD_ENVIRONMENT",
        "ICLOUD_ENDPOINT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Run the CLI against a mock server with a freshly generated key.
async fn run_cli_with_server(args: &[&str], server: &MockServer, key_file: &Path) -> Output {
    let mut cmd = command(args);
    cmd.env("ICLOUD_CONTAINER", CONTAINER)
        .env("ICLOUD_KEY_ID", "test-key")
        .env("ICLOUD_PRIVATE_KEY_FILE", key_file)
        .env("ICLOUD_ENDPOINT", server.uri());
    cmd.output().await.expect("Failed to execute CLI")
}

fn write_key(dir: &Path) -> std::path::PathBuf {
    let key = SigningKey::random(&mut OsRng);
    let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
    let path = dir.join("eckey.pem");
    std::fs::write(&path, pem.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_version() {
    let output = command(&["version"]).output().await.unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("icloud "));
    assert!(stdout.contains("Commit: "));
    assert!(stdout.contains("Default user agent: icloud-go"));
}

#[tokio::test]
async fn test_config_without_key() {
    let output = command(&[
        "config",
        "--container",
        CONTAINER,
        "--key-id",
        "abc123",
        "--environment",
        "production",
    ])
    .output()
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://api.apple-cloudkit.com/"));
    assert!(stdout.contains("/database/1/iCloud.com.example.App/production"));
    assert!(stdout.contains("Private key: not set"));
    assert!(stdout.contains("abc123"));
    assert!(stdout.contains("icloud-go"));
}

#[tokio::test]
async fn test_config_reports_loaded_key() {
    let dir = tempfile::tempdir().unwrap();
    let key_file = write_key(dir.path());

    let output = command(&["config", "--container", CONTAINER])
        .env("ICLOUD_PRIVATE_KEY_FILE", &key_file)
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Private key: loaded"));
}

#[tokio::test]
async fn test_config_requires_container() {
    let output = command(&["config"]).output().await.unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ICLOUD_CONTAINER"));
}

#[tokio::test]
async fn test_records_require_key() {
    let output = command(&[
        "records",
        "delete",
        "--database",
        "private",
        "--type",
        "Note",
        "--name",
        "n1",
        "--container",
        CONTAINER,
    ])
    .output()
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No private key"));
}

#[tokio::test]
async fn test_records_create() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let key_file = write_key(dir.path());

    Mock::given(method("POST"))
        .and(path(MODIFY_PATH))
        .and(header_exists("X-Apple-CloudKit-Request-SignatureV1"))
        .and(body_json(json!({
            "operations": [{
                "operationType": "create",
                "record": {
                    "recordName": "n1",
                    "recordType": "Note",
                    "fields": {
                        "title": {"value": "hello"},
                        "count": {"value": 3}
                    }
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "recordName": "n1",
                "recordType": "Note",
                "recordChangeTag": "ct1",
                "fields": {"title": {"value": "hello", "type": "STRING"}}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli_with_server(
        &[
            "records",
            "create",
            "--database",
            "private",
            "--type",
            "Note",
            "--name",
            "n1",
            "--field",
            "title=hello",
            "--field",
            "count=3",
        ],
        &server,
        &key_file,
    )
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap();
    let response: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(response["records"][0]["recordChangeTag"], "ct1");
    assert!(stdout.contains("Created record: n1"));
}

#[tokio::test]
async fn test_records_modify_from_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let key_file = write_key(dir.path());

    let request = json!({
        "operations": [
            {"operationType": "forceDelete", "record": {"recordName": "n1"}}
        ]
    });
    let request_file = dir.path().join("request.json");
    std::fs::write(&request_file, request.to_string()).unwrap();

    Mock::given(method("POST"))
        .and(path(MODIFY_PATH))
        .and(body_json(json!({
            "operations": [
                {"operationType": "forceDelete", "record": {"recordName": "n1"}}
            ],
            "atomic": true
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"records": [{"recordName": "n1"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli_with_server(
        &[
            "records",
            "modify",
            "--database",
            "private",
            "--json",
            request_file.to_str().unwrap(),
            "--atomic",
        ],
        &server,
        &key_file,
    )
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Modified 1 record(s)"));
}

#[tokio::test]
async fn test_api_error_is_reported() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let key_file = write_key(dir.path());

    Mock::given(method("POST"))
        .and(path(MODIFY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "reason": "slow down",
            "retryAfter": "30s",
            "serverErrorCode": "THROTTLED"
        })))
        .mount(&server)
        .await;

    let output = run_cli_with_server(
        &[
            "records",
            "delete",
            "--database",
            "private",
            "--type",
            "Note",
            "--name",
            "n1",
            "--force",
        ],
        &server,
        &key_file,
    )
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("slow down (THROTTLED:"), "stderr: {stderr}");
    assert!(stderr.contains("30s"), "stderr: {stderr}");
}
