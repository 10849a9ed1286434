//! Health API integration tests

use crate::common::TestApp;

mod common;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;
    let client = app.http_client();

    let response = client
        .get(&app.api_url("/health"))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_check_open_without_token() {
    let app = TestApp::spawn_with_token("secret-token").await;
    let client = app.http_client();

    // No Authorization header, health must still answer
    let response = client
        .get(&app.api_url("/health"))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert!(response.status().is_success());
}
