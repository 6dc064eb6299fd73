//! Post model for Agora.

use chrono::{DateTime, Utc};

/// Maximum message length (in characters).
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Post entity: a single message within a topic.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Topic this post belongs to.
    pub topic_id: i64,
    /// Message body.
    pub message: String,
    /// User who wrote the post.
    pub created_by: i64,
    /// Username of the creator.
    pub created_by_username: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last editor, if the post was edited.
    pub updated_by: Option<i64>,
    /// Last edit timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Whether the post has been edited.
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// Data for creating a reply.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Target topic.
    pub topic_id: i64,
    /// Author.
    pub created_by: i64,
    /// Message body.
    pub message: String,
}

impl NewPost {
    /// Create a new reply.
    pub fn new(topic_id: i64, created_by: i64, message: impl Into<String>) -> Self {
        Self {
            topic_id,
            created_by,
            message: message.into(),
        }
    }
}
