//! Board repository for Agora.

use super::types::{Board, BoardSummary, NewBoard};
use crate::db::DbPool;
use crate::{AgoraError, Result};

/// Repository for board operations.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board.
    ///
    /// A duplicate name is reported as `AgoraError::Conflict`.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let result = sqlx::query("INSERT INTO boards (name, description) VALUES ($1, $2)")
            .bind(&new_board.name)
            .bind(&new_board.description)
            .execute(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AgoraError::Conflict(format!("board '{}' already exists", new_board.name))
                }
                other => AgoraError::Database(other.to_string()),
            })?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AgoraError::NotFound("board".to_string()))
    }

    /// Get a board by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let board =
            sqlx::query_as::<_, Board>("SELECT id, name, description FROM boards WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(board)
    }

    /// Get a board by its exact name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Board>> {
        let board =
            sqlx::query_as::<_, Board>("SELECT id, name, description FROM boards WHERE name = $1")
                .bind(name)
                .fetch_optional(self.pool)
                .await?;
        Ok(board)
    }

    /// List all boards with topic/post counts and the newest post time.
    pub async fn list_with_stats(&self) -> Result<Vec<BoardSummary>> {
        let boards = sqlx::query_as::<_, BoardSummary>(
            "SELECT b.id, b.name, b.description,
                    (SELECT COUNT(*) FROM topics t WHERE t.board_id = b.id) AS topics_count,
                    (SELECT COUNT(*) FROM posts p JOIN topics t ON t.id = p.topic_id
                      WHERE t.board_id = b.id) AS posts_count,
                    (SELECT MAX(p.created_at) FROM posts p JOIN topics t ON t.id = p.topic_id
                      WHERE t.board_id = b.id) AS last_post_at
             FROM boards b
             ORDER BY b.name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(boards)
    }

    /// Count all boards.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
