//! Topic model for Agora.

use chrono::{DateTime, Utc};

/// Maximum subject length (in characters).
pub const MAX_SUBJECT_LENGTH: usize = 255;

/// Topic entity: a discussion thread on a board.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Topic {
    /// Unique topic ID.
    pub id: i64,
    /// Board this topic belongs to.
    pub board_id: i64,
    /// User who started the topic.
    pub starter_id: i64,
    /// Username of the starter.
    pub starter_username: String,
    /// Topic subject.
    pub subject: String,
    /// Copy of the opening message.
    pub message: String,
    /// Number of distinct visitor sessions that viewed the topic.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Time of the newest reply, or creation time without replies.
    pub last_updated: DateTime<Utc>,
}

/// Data for starting a new topic.
#[derive(Debug, Clone)]
pub struct NewTopic {
    /// Target board.
    pub board_id: i64,
    /// Starting user.
    pub starter_id: i64,
    /// Subject line.
    pub subject: String,
    /// Opening message, also stored as the first post.
    pub message: String,
}

impl NewTopic {
    /// Create a new topic.
    pub fn new(
        board_id: i64,
        starter_id: i64,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            board_id,
            starter_id,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// A topic as shown in a board listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopicSummary {
    /// The topic itself.
    #[sqlx(flatten)]
    pub topic: Topic,
    /// Number of posts excluding the opening post.
    pub replies: i64,
}
