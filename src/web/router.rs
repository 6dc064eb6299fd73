//! Router configuration for the web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_topic, edit_post, edit_post_form, get_account, list_boards, list_topics, login, logout,
    new_topic_form, post_account, refresh, reply_form, reply_topic, signup, signup_form,
    topic_posts, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh));

    let board_routes = Router::new()
        .route("/", get(list_boards))
        .route("/:board_id/topics", get(list_topics))
        .route("/:board_id/new", get(new_topic_form).post(create_topic))
        .route("/:board_id/topics/:topic_id", get(topic_posts))
        .route(
            "/:board_id/topics/:topic_id/reply",
            get(reply_form).post(reply_topic),
        )
        .route(
            "/:board_id/topics/:topic_id/posts/:post_id/edit",
            get(edit_post_form).post(edit_post),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/boards", board_routes)
        .route("/signup", get(signup_form).post(signup))
        .route("/account", get(get_account).post(post_account));

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
