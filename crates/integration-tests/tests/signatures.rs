//! HTTP contract of the signature API, exercised over a real socket.

#![allow(clippy::unwrap_used)]

use vible_client::{ClientError, SignatureApi};
use vible_core::SignatureDraft;
use vible_core::wire::SUBMIT_SUCCESS_MESSAGE;
use vible_integration_tests::TestServer;

fn draft(name: &str) -> SignatureDraft {
    SignatureDraft {
        name: name.to_string(),
        message: "Good vibes only".to_string(),
        location: Some("Portland, OR".to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase())),
    }
}

#[tokio::test]
async fn test_health_and_readiness() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;

    let health = server.client().health().await.unwrap();
    assert_eq!(health.status, vible_core::HealthStatus::Healthy);

    let ready = reqwest::get(server.url("/health/ready")).await.unwrap();
    assert_eq!(ready.status(), 200);
}

#[tokio::test]
async fn test_submit_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;
    let client = server.client();

    let response = client.submit(&draft("Sarah")).await.unwrap();
    assert!(response.success);
    assert_eq!(response.message, SUBMIT_SUCCESS_MESSAGE);
    assert_eq!(response.total_signatures, 1);

    assert_eq!(client.count().await.unwrap(), 1);
    let recent = client.recent(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].name, "Sarah");

    let overview = client.overview().await.unwrap();
    assert_eq!(overview.total, 1);
    assert_eq!(overview.recent, recent);

    // The public list never carries contact or fingerprint fields.
    let raw: serde_json::Value = reqwest::get(server.url("/signatures/recent"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entry = raw[0].as_object().unwrap();
    assert!(!entry.contains_key("email"));
    assert!(!entry.contains_key("hashedIP"));
}

#[tokio::test]
async fn test_document_stores_fingerprint_not_ip() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;
    let client = server.client();
    client.submit(&draft("Alex")).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("signatures.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &records[0];

    assert!(!raw.contains("127.0.0.1"));
    assert!(record["hashedIP"].is_string());
    assert_eq!(record["sessionId"], client.session_id().to_string());
    assert!(
        record["userAgent"]
            .as_str()
            .unwrap()
            .starts_with("vible-client/")
    );
    assert_eq!(record["email"], "alex@example.com");
}

#[tokio::test]
async fn test_same_session_is_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;
    let client = server.client();

    client.submit(&draft("Maria")).await.unwrap();
    let err = client.submit(&draft("Maria again")).await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Duplicate signature detected");
        }
        other => panic!("expected API error, got {other:?}"),
    }

    // A new session from the same address is a different fingerprint.
    let response = server.client().submit(&draft("Maria")).await.unwrap();
    assert_eq!(response.total_signatures, 2);
}

#[tokio::test]
async fn test_validation_error_surfaces_server_message() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;
    let client = server.client();

    let err = client
        .submit(&SignatureDraft::new("  ", "Hi"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(matches!(
        err,
        ClientError::Api { ref message, .. } if message == "Name and message are required"
    ));
    assert_eq!(client.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn(dir.path()).await;

    let response = reqwest::get(server.url("/api/nothing")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "Not found"}));

    let response = reqwest::Client::new()
        .delete(server.url("/signatures"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_submissions_are_rate_limited_per_address() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::spawn_rate_limited(dir.path()).await;

    for i in 0..5 {
        server
            .client()
            .submit(&draft(&format!("Signer {i}")))
            .await
            .unwrap();
    }
    let err = server.client().submit(&draft("Signer 5")).await.unwrap_err();
    assert_eq!(err.status(), Some(429));
    match err {
        ClientError::Api { message, .. } => {
            assert!(message.starts_with("Too many requests"), "{message}");
        }
        other => panic!("expected API error, got {other:?}"),
    }

    // Reads stay available.
    assert_eq!(server.client().count().await.unwrap(), 5);
}
