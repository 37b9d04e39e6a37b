//! Integration tests for the HashiCorp Vault KV v2 backend
//!
//! A wiremock server stands in for the Vault HTTP API so the requests the
//! backend sends and the responses it understands can be checked without a
//! running Vault.

use std::sync::Arc;

use secret_vault::{
    BackendError, LogLevel, RemoteBackendConfig, RemoteOperation, RemoteSecretBackend,
    SecretString, SecretsError, Vault, VaultKvBackend, VaultLogger,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "s.test-token";

fn config_for(server: &MockServer) -> RemoteBackendConfig {
    RemoteBackendConfig {
        address: server.uri(),
        token: Some(SecretString::new(TOKEN)),
        namespace: None,
        mount_path: "secret".to_string(),
    }
}

/// Wrap `data` in the envelope every Vault API response carries.
fn envelope(data: Value) -> Value {
    json!({
        "request_id": "5f6c7c1e-0000-4000-8000-000000000000",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

fn version_metadata(version: u64) -> Value {
    json!({
        "created_time": "2024-05-01T12:00:00.000000Z",
        "custom_metadata": null,
        "deletion_time": "",
        "destroyed": false,
        "version": version
    })
}

fn read_response(value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(json!({
        "data": { "value": value },
        "metadata": version_metadata(1)
    })))
}

fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "errors": [message] }))
}

#[tokio::test]
async fn test_fetch_reads_value_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/db_password"))
        .and(header("X-Vault-Token", TOKEN))
        .respond_with(read_response("hunter2"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = VaultKvBackend::new(&config_for(&server)).unwrap();
    let value = backend.fetch("db_password").await.unwrap();

    assert_eq!(value, "hunter2");
}

#[tokio::test]
async fn test_fetch_missing_secret_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/absent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })))
        .mount(&server)
        .await;

    let backend = VaultKvBackend::new(&config_for(&server)).unwrap();
    let err = backend.fetch("absent").await.unwrap_err();

    assert!(matches!(err, BackendError::NotFound { ref name } if name == "absent"));
}

#[tokio::test]
async fn test_fetch_without_value_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": { "password": "stored-under-another-key" },
            "metadata": version_metadata(4)
        }))))
        .mount(&server)
        .await;

    let backend = VaultKvBackend::new(&config_for(&server)).unwrap();
    let err = backend.fetch("legacy").await.unwrap_err();

    assert!(matches!(err, BackendError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_fetch_permission_denied_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/locked"))
        .respond_with(error_response(403, "permission denied"))
        .mount(&server)
        .await;

    let backend = VaultKvBackend::new(&config_for(&server)).unwrap();
    let err = backend.fetch("locked").await.unwrap_err();

    assert!(matches!(err, BackendError::Api { status: 403, .. }));
}

#[tokio::test]
async fn test_create_sends_check_and_set_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/api_key"))
        .and(header("X-Vault-Token", TOKEN))
        .and(body_partial_json(json!({
            "data": { "value": "abc123" },
            "options": { "cas": 0 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(version_metadata(1))))
        .expect(1)
        .mount(&server)
        .await;

    let backend = VaultKvBackend::new(&config_for(&server)).unwrap();
    let handle = backend.create("api_key", "abc123").await.unwrap();

    assert_eq!(handle.path, "secret/api_key");
    assert_eq!(handle.version, 1);
    assert!(handle.created_at.is_some());
    assert_eq!(handle.to_string(), "secret/api_key@v1");
}

#[tokio::test]
async fn test_create_existing_secret_is_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/api_key"))
        .respond_with(error_response(
            400,
            "check-and-set parameter did not match the current version",
        ))
        .mount(&server)
        .await;

    let backend = VaultKvBackend::new(&config_for(&server)).unwrap();
    let err = backend.create("api_key", "again").await.unwrap_err();

    assert!(matches!(err, BackendError::AlreadyExists { ref name } if name == "api_key"));
}

#[tokio::test]
async fn test_namespace_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/scoped"))
        .and(header("X-Vault-Namespace", "team-a"))
        .respond_with(read_response("namespaced"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.namespace = Some("team-a".to_string());

    let backend = VaultKvBackend::new(&config).unwrap();
    assert_eq!(backend.fetch("scoped").await.unwrap(), "namespaced");
}

#[tokio::test]
async fn test_custom_mount_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/data/app_config"))
        .respond_with(read_response("nested"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.mount_path = "kv".to_string();

    let backend = VaultKvBackend::new(&config).unwrap();
    assert_eq!(backend.mount_path(), "kv");
    assert_eq!(backend.fetch("app_config").await.unwrap(), "nested");
}

#[tokio::test]
async fn test_vault_over_kv_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/service_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(version_metadata(1))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/service_token"))
        .respond_with(error_response(
            400,
            "check-and-set parameter did not match the current version",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/service_token"))
        .respond_with(read_response("t0ken"))
        .mount(&server)
        .await;

    let vault = Vault::connect(&config_for(&server), VaultLogger::new(LogLevel::Debug)).unwrap();
    assert_eq!(vault.backend_type(), "vault");

    vault.put_secret("service_token", "t0ken").await.unwrap();
    let err = vault.put_secret("service_token", "t0ken").await.unwrap_err();
    assert!(matches!(err, SecretsError::RemoteCall { operation: RemoteOperation::Create }));

    let value = vault.get_secret("service_token").await.unwrap();
    assert_eq!(value.as_text(), Some("t0ken"));
}

#[tokio::test]
async fn test_vault_type_guard_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(version_metadata(1))))
        .expect(0)
        .mount(&server)
        .await;

    let vault = Vault::connect(&config_for(&server), VaultLogger::default()).unwrap();
    let err = vault.put_secret("number", 7).await.unwrap_err();

    assert!(matches!(err, SecretsError::TypeMismatch { .. }));
    vault.delete_secret("number").await.unwrap();
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_remote_call_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let backend: Arc<dyn RemoteSecretBackend> = Arc::new(VaultKvBackend::new(&config).unwrap());
    let vault = Vault::new(backend, VaultLogger::default());

    let err = vault.get_secret("anything").await.unwrap_err();
    assert!(matches!(err, SecretsError::RemoteCall { operation: RemoteOperation::Fetch }));
}
