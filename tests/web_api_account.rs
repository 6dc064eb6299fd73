//! Web API Account Tests
//!
//! Integration tests for signup and account settings.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{bearer, create_test_server, location, signup, signup_user, TEST_PASSWORD};

// ============================================================================
// Signup Tests
// ============================================================================

#[tokio::test]
async fn test_signup_form() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/signup").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["username_max_length"], 150);
    assert_eq!(body["data"]["password_min_length"], 8);
}

#[tokio::test]
async fn test_signup_success_logs_in() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/signup")
        .json(&json!({
            "username": "john",
            "email": "john@doe.com",
            "password": "abcdef123456",
            "password_confirmation": "abcdef123456"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(location(&response), "/api/boards");

    let body: Value = response.json();
    assert_eq!(body["data"]["user"]["username"], "john");
    let token = body["data"]["access_token"].as_str().unwrap();

    // The issued token authenticates immediately
    let account: Value = server
        .get("/api/account")
        .add_header(AUTHORIZATION, bearer(token))
        .await
        .json();
    assert_eq!(account["data"]["username"], "john");
    assert_eq!(account["data"]["email"], "john@doe.com");
    assert!(account["data"]["last_login"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let (server, _db) = create_test_server().await;
    signup(&server, "john").await;

    let response = server
        .post("/api/signup")
        .json(&json!({
            "username": "JOHN",
            "email": "other@doe.com",
            "password": TEST_PASSWORD,
            "password_confirmation": TEST_PASSWORD
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_signup_invalid_data() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/signup")
        .json(&json!({
            "username": "bad name",
            "email": "",
            "password": "abcdef123456",
            "password_confirmation": "abcdef654321"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    let details = &body["error"]["details"];
    assert!(details["username"].is_array());
    assert!(details["email"].is_array());
    assert!(details["password_confirmation"].is_array());
    assert!(details["password"].is_null());

    // No user was created
    server
        .post("/api/auth/login")
        .json(&json!({ "username": "bad name", "password": "abcdef123456" }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_signup_empty_body() {
    let (server, _db) = create_test_server().await;

    let response = server.post("/api/signup").json(&json!({})).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]["details"]["username"].is_array());
    assert!(body["error"]["details"]["password"].is_array());
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_account_requires_auth() {
    let (server, _db) = create_test_server().await;

    server.get("/api/account").await.assert_status_unauthorized();
    server
        .post("/api/account")
        .json(&json!({ "first_name": "Ada" }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_update_account() {
    let (server, _db) = create_test_server().await;
    let (user_id, token) = signup_user(&server, "ada").await;

    let response = server
        .post("/api/account")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@engine.org"
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(location(&response), "/api/account");
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], user_id);
    assert_eq!(body["data"]["first_name"], "Ada");
    assert_eq!(body["data"]["last_name"], "Lovelace");
    assert_eq!(body["data"]["email"], "ada@engine.org");

    let account: Value = server
        .get("/api/account")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(account["data"]["first_name"], "Ada");
}

#[tokio::test]
async fn test_update_account_invalid_email() {
    let (server, _db) = create_test_server().await;
    let (_, token) = signup_user(&server, "ada").await;

    let response = server
        .post("/api/account")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "first_name": "Ada", "last_name": "", "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]["details"]["email"].is_array());

    // Unchanged
    let account: Value = server
        .get("/api/account")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(account["data"]["first_name"], "");
    assert_eq!(account["data"]["email"], "ada@example.com");
}
