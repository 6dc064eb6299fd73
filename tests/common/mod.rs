//! Shared helpers for the web API integration tests.

#![allow(dead_code)]

use agora::config::Config;
use agora::forum::{BoardRepository, NewBoard};
use agora::web::WebServer;
use agora::Database;
use axum::http::header::SET_COOKIE;
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

/// Password used by every helper-created account.
pub const TEST_PASSWORD: &str = "s3cret-password";

/// Name of the visitor session cookie.
pub const SESSION_COOKIE: &str = "agora_session";

/// Create a test configuration.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.web.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.forum.topics_per_page = 20;
    config.forum.posts_per_page = 20;
    config
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with(create_test_config()).await
}

/// Create a test server from a custom configuration.
pub async fn create_test_server_with(config: Config) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let web = WebServer::new(&config, db.clone()).expect("Failed to create web server");
    let server = TestServer::new(web.router()).expect("Failed to create test server");

    (server, db)
}

/// Create a board directly in the database.
pub async fn create_test_board(db: &Database, name: &str) -> i64 {
    BoardRepository::new(db.pool())
        .create(&NewBoard::new(name, format!("{} board", name)))
        .await
        .expect("Failed to create test board")
        .id
}

/// Sign up a user and return the response body.
pub async fn signup(server: &TestServer, username: &str) -> Value {
    let response = server
        .post("/api/signup")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
            "password_confirmation": TEST_PASSWORD
        }))
        .await;

    response.json::<Value>()
}

/// Sign up a user and return `(user_id, access_token)`.
pub async fn signup_user(server: &TestServer, username: &str) -> (i64, String) {
    let body = signup(server, username).await;
    let id = body["data"]["user"]["id"]
        .as_i64()
        .expect("signup response has user id");
    let token = body["data"]["access_token"]
        .as_str()
        .expect("signup response has access token")
        .to_string();
    (id, token)
}

/// Bearer header value for an access token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Start a topic and return the created body.
pub async fn start_topic(
    server: &TestServer,
    token: &str,
    board_id: i64,
    subject: &str,
    message: &str,
) -> Value {
    let response = server
        .post(&format!("/api/boards/{}/new", board_id))
        .add_header(axum::http::header::AUTHORIZATION, bearer(token))
        .json(&json!({ "subject": subject, "message": message }))
        .await;

    response.json::<Value>()
}

/// Post a reply and return the response.
pub async fn reply(
    server: &TestServer,
    token: &str,
    board_id: i64,
    topic_id: i64,
    message: &str,
) -> TestResponse {
    server
        .post(&format!(
            "/api/boards/{}/topics/{}/reply",
            board_id, topic_id
        ))
        .add_header(axum::http::header::AUTHORIZATION, bearer(token))
        .json(&json!({ "message": message }))
        .await
}

/// The `name=value` pair of the session cookie set by a response.
pub fn session_cookie(response: &TestResponse) -> String {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE))
        .and_then(|v| v.split(';').next())
        .expect("response sets the session cookie")
        .to_string()
}

/// The Location header of a response.
pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .expect("response has a Location header")
        .to_str()
        .expect("Location is ASCII")
        .to_string()
}
