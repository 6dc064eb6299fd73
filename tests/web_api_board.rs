//! Web API Board Tests
//!
//! Integration tests for board, topic and post endpoints.

mod common;

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{
    bearer, create_test_board, create_test_config, create_test_server, create_test_server_with,
    location, reply, session_cookie, signup_user, start_topic,
};

// ============================================================================
// List Boards Tests
// ============================================================================

#[tokio::test]
async fn test_list_boards_empty() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/boards").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_boards_with_stats() {
    let (server, db) = create_test_server().await;
    let django = create_test_board(&db, "Django").await;
    create_test_board(&db, "Announcements").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, django, "Hello", "First!").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    reply(&server, &token, django, topic_id, "Second")
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/api/boards").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let boards = body["data"].as_array().unwrap();
    assert_eq!(boards.len(), 2);

    // Ordered by name
    assert_eq!(boards[0]["name"], "Announcements");
    assert_eq!(boards[0]["topics_count"], 0);
    assert_eq!(boards[0]["posts_count"], 0);
    assert!(boards[0]["last_post_at"].is_null());

    assert_eq!(boards[1]["name"], "Django");
    assert_eq!(boards[1]["description"], "Django board");
    assert_eq!(boards[1]["topics_count"], 1);
    assert_eq!(boards[1]["posts_count"], 2);
    assert!(boards[1]["last_post_at"].is_string());
}

// ============================================================================
// List Topics Tests
// ============================================================================

#[tokio::test]
async fn test_list_topics_board_not_found() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/boards/99/topics").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_topics_empty_board() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;

    let response = server.get(&format!("/api/boards/{}/topics", board_id)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["board"]["name"], "Django");
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["pagination"]["page"], 1);
    assert_eq!(body["data"]["pagination"]["num_pages"], 1);
    assert_eq!(body["data"]["pagination"]["has_next"], false);
}

#[tokio::test]
async fn test_list_topics_most_recently_active_first() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let first = start_topic(&server, &token, board_id, "Older", "one").await;
    start_topic(&server, &token, board_id, "Newer", "two").await;
    let first_id = first["data"]["topic"]["id"].as_i64().unwrap();

    let response = server.get(&format!("/api/boards/{}/topics", board_id)).await;
    let body: Value = response.json();
    let topics = body["data"]["topics"].as_array().unwrap();
    assert_eq!(topics[0]["subject"], "Newer");
    assert_eq!(topics[1]["subject"], "Older");
    assert_eq!(topics[1]["replies"], 0);

    // A reply bumps the older topic to the top
    reply(&server, &token, board_id, first_id, "bump")
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get(&format!("/api/boards/{}/topics", board_id)).await;
    let body: Value = response.json();
    let topics = body["data"]["topics"].as_array().unwrap();
    assert_eq!(topics[0]["subject"], "Older");
    assert_eq!(topics[0]["replies"], 1);
    assert_eq!(topics[0]["starter"]["username"], "alice");
}

#[tokio::test]
async fn test_list_topics_page_fallbacks() {
    let mut config = create_test_config();
    config.forum.topics_per_page = 2;
    let (server, db) = create_test_server_with(config).await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    for i in 0..5 {
        start_topic(&server, &token, board_id, &format!("Topic {}", i), "body").await;
    }

    let url = format!("/api/boards/{}/topics", board_id);

    let body: Value = server.get(&url).add_query_param("page", "2").await.json();
    assert_eq!(body["data"]["pagination"]["page"], 2);
    assert_eq!(body["data"]["pagination"]["num_pages"], 3);
    assert_eq!(body["data"]["pagination"]["total"], 5);
    assert_eq!(body["data"]["pagination"]["has_next"], true);
    assert_eq!(body["data"]["pagination"]["has_previous"], true);
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 2);

    // Non-integer page falls back to the first page
    let body: Value = server.get(&url).add_query_param("page", "abc").await.json();
    assert_eq!(body["data"]["pagination"]["page"], 1);
    assert_eq!(body["data"]["topics"][0]["subject"], "Topic 4");

    // Out-of-range page falls back to the last page
    let body: Value = server.get(&url).add_query_param("page", "99").await.json();
    assert_eq!(body["data"]["pagination"]["page"], 3);
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["topics"][0]["subject"], "Topic 0");
}

// ============================================================================
// New Topic Tests
// ============================================================================

#[tokio::test]
async fn test_new_topic_requires_auth() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;

    let response = server
        .post(&format!("/api/boards/{}/new", board_id))
        .json(&json!({ "subject": "Hi", "message": "there" }))
        .await;
    response.assert_status_unauthorized();

    let response = server.get(&format!("/api/boards/{}/new", board_id)).await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_new_topic_form() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let response = server
        .get(&format!("/api/boards/{}/new", board_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["board"]["id"], board_id);
    assert_eq!(body["data"]["subject_max_length"], 255);
    assert_eq!(body["data"]["message_max_length"], 4000);
}

#[tokio::test]
async fn test_new_topic_board_not_found() {
    let (server, _db) = create_test_server().await;
    let (_, token) = signup_user(&server, "alice").await;

    let response = server
        .post("/api/boards/99/new")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "subject": "Hi", "message": "there" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_new_topic_missing_board_wins_over_invalid_data() {
    let (server, _db) = create_test_server().await;
    let (_, token) = signup_user(&server, "alice").await;

    let response = server
        .post("/api/boards/99/new")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "subject": "", "message": "" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_new_topic_invalid_data() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let response = server
        .post(&format!("/api/boards/{}/new", board_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "subject": "   ", "message": "" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]["details"]["subject"].is_array());
    assert!(body["error"]["details"]["message"].is_array());

    // Nothing was stored
    let body: Value = server
        .get(&format!("/api/boards/{}/topics", board_id))
        .await
        .json();
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_new_topic_success() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (user_id, token) = signup_user(&server, "alice").await;

    let response = server
        .post(&format!("/api/boards/{}/new", board_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "subject": "Test title", "message": "Lorem ipsum dolor sit amet" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(location(&response), format!("/api/boards/{}/topics", board_id));

    let body: Value = response.json();
    assert_eq!(body["data"]["topic"]["subject"], "Test title");
    assert_eq!(body["data"]["topic"]["views"], 0);
    assert_eq!(body["data"]["topic"]["starter"]["id"], user_id);
    assert_eq!(body["data"]["post"]["message"], "Lorem ipsum dolor sit amet");
    assert_eq!(body["data"]["post"]["can_edit"], true);
    assert_eq!(
        body["data"]["topic"]["created_at"],
        body["data"]["post"]["created_at"]
    );
}

// ============================================================================
// Topic Posts Tests
// ============================================================================

#[tokio::test]
async fn test_topic_posts_not_found() {
    let (server, db) = create_test_server().await;
    let django = create_test_board(&db, "Django").await;
    let other = create_test_board(&db, "Other").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, django, "Hello", "World").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();

    server
        .get(&format!("/api/boards/{}/topics/999", django))
        .await
        .assert_status_not_found();

    // The topic exists, but not in this board
    server
        .get(&format!("/api/boards/{}/topics/{}", other, topic_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_topic_views_counted_once_per_session() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, board_id, "Help", "Please").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    let url = format!("/api/boards/{}/topics/{}", board_id, topic_id);

    let first = server.get(&url).await;
    first.assert_status_ok();
    let cookie = session_cookie(&first);
    let body: Value = first.json();
    assert_eq!(body["data"]["topic"]["views"], 1);
    assert_eq!(body["data"]["can_reply"], false);
    assert_eq!(body["data"]["posts"][0]["can_edit"], false);

    // Same session: not counted again
    let body: Value = server.get(&url).add_header(COOKIE, cookie.clone()).await.json();
    assert_eq!(body["data"]["topic"]["views"], 1);

    // A new session counts
    let body: Value = server.get(&url).await.json();
    assert_eq!(body["data"]["topic"]["views"], 2);

    // Back to the first session
    let body: Value = server.get(&url).add_header(COOKIE, cookie).await.json();
    assert_eq!(body["data"]["topic"]["views"], 2);
}

#[tokio::test]
async fn test_topic_posts_for_signed_in_viewer() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, alice) = signup_user(&server, "alice").await;
    let (_, bob) = signup_user(&server, "bob").await;

    let created = start_topic(&server, &alice, board_id, "Hello", "from alice").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    reply(&server, &bob, board_id, topic_id, "from bob")
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get(&format!("/api/boards/{}/topics/{}", board_id, topic_id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["can_reply"], true);
    let posts = body["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["message"], "from alice");
    assert_eq!(posts[0]["can_edit"], false);
    assert_eq!(posts[1]["message"], "from bob");
    assert_eq!(posts[1]["created_by"]["username"], "bob");
    assert_eq!(posts[1]["can_edit"], true);
}

// ============================================================================
// Reply Tests
// ============================================================================

#[tokio::test]
async fn test_reply_requires_auth() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, board_id, "Hello", "World").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/api/boards/{}/topics/{}/reply", board_id, topic_id))
        .json(&json!({ "message": "anonymous" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_reply_form_lists_recent_posts() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, board_id, "Hello", "post 0").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    for i in 1..12 {
        reply(&server, &token, board_id, topic_id, &format!("post {}", i))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .get(&format!("/api/boards/{}/topics/{}/reply", board_id, topic_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let recent = body["data"]["recent_posts"].as_array().unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0]["message"], "post 11");
    assert_eq!(recent[9]["message"], "post 2");
}

#[tokio::test]
async fn test_reply_invalid_message() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, board_id, "Hello", "World").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();

    let response = reply(&server, &token, board_id, topic_id, "").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let long = "x".repeat(4001);
    let response = reply(&server, &token, board_id, topic_id, &long).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reply_missing_topic_wins_over_invalid_message() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let response = reply(&server, &token, board_id, 999, "").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_reply_redirects_to_last_page() {
    let mut config = create_test_config();
    config.forum.posts_per_page = 2;
    let (server, db) = create_test_server_with(config).await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, token) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &token, board_id, "Hello", "World").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    let topic_url = format!("/api/boards/{}/topics/{}", board_id, topic_id);

    let response = reply(&server, &token, board_id, topic_id, "second").await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(location(&response), format!("{}?page=1", topic_url));

    let response = reply(&server, &token, board_id, topic_id, "third").await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(location(&response), format!("{}?page=2", topic_url));

    let body: Value = response.json();
    assert_eq!(body["data"]["message"], "third");
    assert_eq!(body["data"]["topic_id"], topic_id);
}

// ============================================================================
// Edit Post Tests
// ============================================================================

#[tokio::test]
async fn test_edit_post_by_non_owner_is_forbidden() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, alice) = signup_user(&server, "alice").await;
    let (_, bob) = signup_user(&server, "bob").await;

    let created = start_topic(&server, &alice, board_id, "Hello", "original").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    let post_id = created["data"]["post"]["id"].as_i64().unwrap();
    let edit_url = format!(
        "/api/boards/{}/topics/{}/posts/{}/edit",
        board_id, topic_id, post_id
    );

    server
        .get(&edit_url)
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status_forbidden();

    let response = server
        .post(&edit_url)
        .add_header(AUTHORIZATION, bearer(&bob))
        .json(&json!({ "message": "hijacked" }))
        .await;
    response.assert_status_forbidden();

    // Ownership is checked before the message
    let response = server
        .post(&edit_url)
        .add_header(AUTHORIZATION, bearer(&bob))
        .json(&json!({ "message": "" }))
        .await;
    response.assert_status_forbidden();

    // The post is unchanged
    let body: Value = server
        .get(&format!("/api/boards/{}/topics/{}", board_id, topic_id))
        .await
        .json();
    assert_eq!(body["data"]["posts"][0]["message"], "original");
    assert!(body["data"]["posts"][0]["updated_at"].is_null());
}

#[tokio::test]
async fn test_edit_post_by_owner() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (alice_id, alice) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &alice, board_id, "Hello", "original").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    let post_id = created["data"]["post"]["id"].as_i64().unwrap();
    let edit_url = format!(
        "/api/boards/{}/topics/{}/posts/{}/edit",
        board_id, topic_id, post_id
    );

    let form: Value = server
        .get(&edit_url)
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .json();
    assert_eq!(form["data"]["post"]["message"], "original");

    let response = server
        .post(&edit_url)
        .add_header(AUTHORIZATION, bearer(&alice))
        .json(&json!({ "message": "edited message" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        location(&response),
        format!("/api/boards/{}/topics/{}", board_id, topic_id)
    );
    let body: Value = response.json();
    assert_eq!(body["data"]["message"], "edited message");
    assert_eq!(body["data"]["updated_by"], alice_id);
    assert!(body["data"]["updated_at"].is_string());
}

#[tokio::test]
async fn test_edit_post_invalid_message() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, alice) = signup_user(&server, "alice").await;

    let created = start_topic(&server, &alice, board_id, "Hello", "original").await;
    let topic_id = created["data"]["topic"]["id"].as_i64().unwrap();
    let post_id = created["data"]["post"]["id"].as_i64().unwrap();

    let response = server
        .post(&format!(
            "/api/boards/{}/topics/{}/posts/{}/edit",
            board_id, topic_id, post_id
        ))
        .add_header(AUTHORIZATION, bearer(&alice))
        .json(&json!({ "message": "" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_edit_post_wrong_topic_not_found() {
    let (server, db) = create_test_server().await;
    let board_id = create_test_board(&db, "Django").await;
    let (_, alice) = signup_user(&server, "alice").await;

    let first = start_topic(&server, &alice, board_id, "One", "first").await;
    let second = start_topic(&server, &alice, board_id, "Two", "second").await;
    let post_id = first["data"]["post"]["id"].as_i64().unwrap();
    let other_topic = second["data"]["topic"]["id"].as_i64().unwrap();

    let response = server
        .post(&format!(
            "/api/boards/{}/topics/{}/posts/{}/edit",
            board_id, other_topic, post_id
        ))
        .add_header(AUTHORIZATION, bearer(&alice))
        .json(&json!({ "message": "moved" }))
        .await;

    response.assert_status_not_found();
}
