//! Board model for Agora.

use chrono::{DateTime, Utc};

/// Maximum board name length (in characters).
pub const MAX_BOARD_NAME_LENGTH: usize = 30;

/// Maximum board description length (in characters).
pub const MAX_BOARD_DESCRIPTION_LENGTH: usize = 100;

/// Board entity: a top-level category containing topics.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// Board name (unique).
    pub name: String,
    /// Short description.
    pub description: String,
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
}

impl NewBoard {
    /// Create a new board with the given name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A board together with its activity statistics.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BoardSummary {
    /// The board itself.
    #[sqlx(flatten)]
    pub board: Board,
    /// Number of topics on the board.
    pub topics_count: i64,
    /// Number of posts across all topics on the board.
    pub posts_count: i64,
    /// Creation time of the newest post, if any.
    pub last_post_at: Option<DateTime<Utc>>,
}
