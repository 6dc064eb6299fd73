//! Response DTOs for the web API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::User;
use crate::forum::{Board, BoardSummary, Page, Post, Topic, TopicSummary};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: i64,
    /// Number of pages.
    pub num_pages: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

impl<T> From<&Page<T>> for PaginationMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.number,
            per_page: page.per_page,
            total: page.total,
            num_pages: page.num_pages,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        }
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// Minimal user reference embedded in other responses.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

/// Tokens issued on login and signup.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
    /// The authenticated user.
    pub user: UserSummary,
}

/// Token refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token.
    pub refresh_token: String,
    /// Expiry in seconds.
    pub expires_in: u64,
}

/// Constraints of the signup form.
#[derive(Debug, Serialize)]
pub struct SignupFormResponse {
    /// Maximum username length.
    pub username_max_length: usize,
    /// Minimum password length.
    pub password_min_length: usize,
    /// Maximum password length.
    pub password_max_length: usize,
    /// Characters allowed in usernames besides letters and digits.
    pub username_extra_chars: &'static str,
}

/// The current user's account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
    /// Last login time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

// ============================================================================
// Board DTOs
// ============================================================================

/// Board reference.
#[derive(Debug, Serialize)]
pub struct BoardInfo {
    /// Board ID.
    pub id: i64,
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
}

impl From<Board> for BoardInfo {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            name: board.name,
            description: board.description,
        }
    }
}

/// Board entry of the board list.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Board ID.
    pub id: i64,
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
    /// Number of topics.
    pub topics_count: i64,
    /// Number of posts.
    pub posts_count: i64,
    /// Time of the newest post.
    pub last_post_at: Option<DateTime<Utc>>,
}

impl From<BoardSummary> for BoardResponse {
    fn from(summary: BoardSummary) -> Self {
        Self {
            id: summary.board.id,
            name: summary.board.name,
            description: summary.board.description,
            topics_count: summary.topics_count,
            posts_count: summary.posts_count,
            last_post_at: summary.last_post_at,
        }
    }
}

// ============================================================================
// Topic DTOs
// ============================================================================

/// Topic details.
#[derive(Debug, Serialize)]
pub struct TopicResponse {
    /// Topic ID.
    pub id: i64,
    /// Board ID.
    pub board_id: i64,
    /// Subject.
    pub subject: String,
    /// Starting user.
    pub starter: UserSummary,
    /// View count.
    pub views: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the newest reply.
    pub last_updated: DateTime<Utc>,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            board_id: topic.board_id,
            subject: topic.subject,
            starter: UserSummary {
                id: topic.starter_id,
                username: topic.starter_username,
            },
            views: topic.views,
            created_at: topic.created_at,
            last_updated: topic.last_updated,
        }
    }
}

/// Topic entry of a board's topic list.
#[derive(Debug, Serialize)]
pub struct TopicListItem {
    /// Topic details.
    #[serde(flatten)]
    pub topic: TopicResponse,
    /// Posts excluding the opening post.
    pub replies: i64,
}

impl From<TopicSummary> for TopicListItem {
    fn from(summary: TopicSummary) -> Self {
        Self {
            topic: summary.topic.into(),
            replies: summary.replies,
        }
    }
}

/// A page of a board's topics.
#[derive(Debug, Serialize)]
pub struct BoardTopicsResponse {
    /// The board.
    pub board: BoardInfo,
    /// Topics on this page.
    pub topics: Vec<TopicListItem>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Context for the new topic form.
#[derive(Debug, Serialize)]
pub struct NewTopicFormResponse {
    /// Target board.
    pub board: BoardInfo,
    /// Maximum subject length.
    pub subject_max_length: usize,
    /// Maximum message length.
    pub message_max_length: usize,
}

/// A freshly started topic and its opening post.
#[derive(Debug, Serialize)]
pub struct CreatedTopicResponse {
    /// The topic.
    pub topic: TopicResponse,
    /// The opening post.
    pub post: PostResponse,
}

// ============================================================================
// Post DTOs
// ============================================================================

/// Post details.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    /// Post ID.
    pub id: i64,
    /// Topic ID.
    pub topic_id: i64,
    /// Message body.
    pub message: String,
    /// Author.
    pub created_by: UserSummary,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last editor ID.
    pub updated_by: Option<i64>,
    /// Last edit time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the requester may edit this post.
    pub can_edit: bool,
}

impl PostResponse {
    /// Build a response for a post as seen by `viewer_id`.
    pub fn for_viewer(post: Post, viewer_id: Option<i64>) -> Self {
        let can_edit = viewer_id.is_some_and(|id| crate::auth::can_edit_post(&post, id));
        Self {
            id: post.id,
            topic_id: post.topic_id,
            message: post.message,
            created_by: UserSummary {
                id: post.created_by,
                username: post.created_by_username,
            },
            created_at: post.created_at,
            updated_by: post.updated_by,
            updated_at: post.updated_at,
            can_edit,
        }
    }
}

/// A page of a topic's posts.
#[derive(Debug, Serialize)]
pub struct TopicPostsResponse {
    /// The board.
    pub board: BoardInfo,
    /// The topic.
    pub topic: TopicResponse,
    /// Whether the requester may reply.
    pub can_reply: bool,
    /// Posts on this page, oldest first.
    pub posts: Vec<PostResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Context for the reply form.
#[derive(Debug, Serialize)]
pub struct ReplyFormResponse {
    /// The topic being replied to.
    pub topic: TopicResponse,
    /// Most recent posts, newest first.
    pub recent_posts: Vec<PostResponse>,
    /// Maximum message length.
    pub message_max_length: usize,
}

/// Context for the post edit form.
#[derive(Debug, Serialize)]
pub struct EditPostFormResponse {
    /// The post being edited.
    pub post: PostResponse,
    /// Maximum message length.
    pub message_max_length: usize,
}
