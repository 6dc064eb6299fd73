//! Board, topic and post handlers.

use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::forum::{MAX_MESSAGE_LENGTH, MAX_SUBJECT_LENGTH};
use crate::web::dto::{
    validate_body, ApiResponse, BoardInfo, BoardResponse, BoardTopicsResponse,
    CreatedTopicResponse, EditPostFormResponse, EditPostRequest, JsonBody, NewTopicFormResponse,
    NewTopicRequest, PageQuery, PaginationMeta, PostResponse, ReplyFormResponse, ReplyRequest,
    TopicListItem, TopicPostsResponse,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser, VisitorSession};

use super::AppState;

fn topics_url(board_id: i64) -> String {
    format!("/api/boards/{board_id}/topics")
}

fn topic_url(board_id: i64, topic_id: i64) -> String {
    format!("/api/boards/{board_id}/topics/{topic_id}")
}

/// GET /api/boards - List all boards.
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BoardResponse>>>, ApiError> {
    let boards = state.forum().list_boards().await?;
    let response = boards.into_iter().map(BoardResponse::from).collect();
    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/boards/:board_id/topics - List a board's topics.
pub async fn list_topics(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<BoardTopicsResponse>>, ApiError> {
    let (board, page) = state
        .forum()
        .list_topics(board_id, query.page.as_deref())
        .await?;

    let pagination = PaginationMeta::from(&page);
    let response = BoardTopicsResponse {
        board: board.into(),
        topics: page.items.into_iter().map(TopicListItem::from).collect(),
        pagination,
    };
    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/boards/:board_id/new - New topic form context.
pub async fn new_topic_form(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(board_id): Path<i64>,
) -> Result<Json<ApiResponse<NewTopicFormResponse>>, ApiError> {
    state.current_user(&claims).await?;
    let board = state.forum().get_board(board_id).await?;

    Ok(Json(ApiResponse::new(NewTopicFormResponse {
        board: board.into(),
        subject_max_length: MAX_SUBJECT_LENGTH,
        message_max_length: MAX_MESSAGE_LENGTH,
    })))
}

/// POST /api/boards/:board_id/new - Start a topic.
pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(board_id): Path<i64>,
    JsonBody(req): JsonBody<NewTopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.current_user(&claims).await?;
    let forum = state.forum();
    forum.get_board(board_id).await?;
    validate_body(&req)?;

    let (topic, post) = forum
        .start_topic(board_id, &user, &req.subject, &req.message)
        .await?;

    let response = CreatedTopicResponse {
        topic: topic.into(),
        post: PostResponse::for_viewer(post, Some(user.id)),
    };
    Ok((
        StatusCode::CREATED,
        [(LOCATION, topics_url(board_id))],
        Json(ApiResponse::new(response)),
    ))
}

/// GET /api/boards/:board_id/topics/:topic_id - A page of a topic's posts.
///
/// Counts one view per visitor session.
pub async fn topic_posts(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
    session: VisitorSession,
    Path((board_id, topic_id)): Path<(i64, i64)>,
    Query(query): Query<PageQuery>,
) -> Result<(CookieJar, Json<ApiResponse<TopicPostsResponse>>), ApiError> {
    let forum = state.forum();
    let board = forum.get_board(board_id).await?;
    let page = forum
        .view_topic(
            board_id,
            topic_id,
            &state.sessions,
            &session.id,
            query.page.as_deref(),
        )
        .await?;

    let viewer_id = claims.as_ref().map(|c| c.sub);
    let pagination = PaginationMeta::from(&page.posts);
    let response = TopicPostsResponse {
        board: BoardInfo::from(board),
        topic: page.topic.into(),
        can_reply: viewer_id.is_some(),
        posts: page
            .posts
            .items
            .into_iter()
            .map(|p| PostResponse::for_viewer(p, viewer_id))
            .collect(),
        pagination,
    };
    Ok((session.cookies(), Json(ApiResponse::new(response))))
}

/// GET /api/boards/:board_id/topics/:topic_id/reply - Reply form context.
pub async fn reply_form(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((board_id, topic_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<ReplyFormResponse>>, ApiError> {
    let user = state.current_user(&claims).await?;
    let (topic, posts) = state.forum().reply_context(board_id, topic_id).await?;

    Ok(Json(ApiResponse::new(ReplyFormResponse {
        topic: topic.into(),
        recent_posts: posts
            .into_iter()
            .map(|p| PostResponse::for_viewer(p, Some(user.id)))
            .collect(),
        message_max_length: MAX_MESSAGE_LENGTH,
    })))
}

/// POST /api/boards/:board_id/topics/:topic_id/reply - Reply to a topic.
pub async fn reply_topic(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((board_id, topic_id)): Path<(i64, i64)>,
    JsonBody(req): JsonBody<ReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.current_user(&claims).await?;
    let forum = state.forum();
    forum.get_topic(board_id, topic_id).await?;
    validate_body(&req)?;

    let outcome = forum
        .reply(board_id, topic_id, &user, &req.message)
        .await?;

    let location = format!("{}?page={}", topic_url(board_id, topic_id), outcome.page);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(ApiResponse::new(PostResponse::for_viewer(
            outcome.post,
            Some(user.id),
        ))),
    ))
}

/// GET /api/boards/:board_id/topics/:topic_id/posts/:post_id/edit - Edit form context.
pub async fn edit_post_form(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((board_id, topic_id, post_id)): Path<(i64, i64, i64)>,
) -> Result<Json<ApiResponse<EditPostFormResponse>>, ApiError> {
    let user = state.current_user(&claims).await?;
    let post = state
        .forum()
        .get_post_for_edit(board_id, topic_id, post_id, &user)
        .await?;

    Ok(Json(ApiResponse::new(EditPostFormResponse {
        post: PostResponse::for_viewer(post, Some(user.id)),
        message_max_length: MAX_MESSAGE_LENGTH,
    })))
}

/// POST /api/boards/:board_id/topics/:topic_id/posts/:post_id/edit - Edit own post.
pub async fn edit_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((board_id, topic_id, post_id)): Path<(i64, i64, i64)>,
    JsonBody(req): JsonBody<EditPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.current_user(&claims).await?;
    let forum = state.forum();
    forum
        .get_post_for_edit(board_id, topic_id, post_id, &user)
        .await?;
    validate_body(&req)?;

    let post = forum
        .edit_post(board_id, topic_id, post_id, &user, &req.message)
        .await?;

    Ok((
        StatusCode::OK,
        [(LOCATION, topic_url(board_id, topic_id))],
        Json(ApiResponse::new(PostResponse::for_viewer(post, Some(user.id)))),
    ))
}
