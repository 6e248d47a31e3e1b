mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn register_issues_a_bearer_token() {
    let env = common::TestEnv::start();
    let server = env.server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "ada@example.com", "password": "hunter2" }))
        .await;

    let body: Value = response.json();
    assert_eq!(body["token_type"].as_str(), Some("bearer"));
    assert!(!body["access_token"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();
    common::register(&server, "ada@example.com").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "ada@example.com", "password": "other" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["detail"].as_str(), Some("Email already registered"));
}

#[tokio::test]
async fn malformed_registration_is_rejected() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    server
        .post("/api/auth/register")
        .json(&json!({ "email": "not-an-email", "password": "hunter2" }))
        .await
        .assert_status_bad_request();
    server
        .post("/api/auth/register")
        .json(&json!({ "email": "ada@example.com", "password": "" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn login_with_valid_credentials() {
    let env = common::TestEnv::start();
    let server = env.server();
    common::register(&server, "ada@example.com").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "hunter2" }))
        .await;

    let body: Value = response.json();
    let token = body["access_token"].as_str().unwrap_or_default();
    server
        .get("/api/projects/")
        .authorization_bearer(token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn login_invalid_credentials() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();
    common::register(&server, "ada@example.com").await;

    for (email, password) in [
        ("ada@example.com", "wrongpassword"),
        ("nobody@example.com", "hunter2"),
    ] {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["detail"].as_str(), Some("Invalid credentials"));
    }
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    server.get("/api/projects/").await.assert_status_unauthorized();
    server
        .get("/api/projects/")
        .authorization_bearer("not.a.token")
        .await
        .assert_status_unauthorized();
    server
        .get(&format!("/api/export/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn health_is_public() {
    let env = common::TestEnv::start();
    let server = env.server();

    let body: Value = server.get("/api/health").await.json();
    assert_eq!(body, json!({ "status": "ok" }));
}
