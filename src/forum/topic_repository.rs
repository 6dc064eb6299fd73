//! Topic repository for Agora.

use chrono::Utc;

use super::post::Post;
use super::post_repository::PostRepository;
use super::topic::{NewTopic, Topic, TopicSummary};
use crate::db::DbPool;
use crate::{AgoraError, Result};

const TOPIC_SELECT: &str = "SELECT t.id, t.board_id, t.starter_id, u.username AS starter_username,
        t.subject, t.message, t.views, t.created_at, t.last_updated
     FROM topics t
     JOIN users u ON u.id = t.starter_id";

/// Repository for topic operations.
pub struct TopicRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> TopicRepository<'a> {
    /// Create a new TopicRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a topic together with its opening post.
    ///
    /// Both rows are written in one transaction; the post carries the
    /// topic's message and is created by the starter.
    pub async fn create_with_opening_post(&self, new_topic: &NewTopic) -> Result<(Topic, Post)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let topic_id = sqlx::query(
            "INSERT INTO topics (board_id, starter_id, subject, message, created_at, last_updated)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(new_topic.board_id)
        .bind(new_topic.starter_id)
        .bind(&new_topic.subject)
        .bind(&new_topic.message)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let post_id = sqlx::query(
            "INSERT INTO posts (topic_id, message, created_by, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(topic_id)
        .bind(&new_topic.message)
        .bind(new_topic.starter_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        let topic = self
            .get_by_id(topic_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("topic".to_string()))?;
        let post = PostRepository::new(self.pool)
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))?;

        Ok((topic, post))
    }

    /// Get a topic by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Topic>> {
        let query = format!("{TOPIC_SELECT} WHERE t.id = $1");
        let topic = sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(topic)
    }

    /// Get a topic only if it belongs to the given board.
    pub async fn get_in_board(&self, board_id: i64, topic_id: i64) -> Result<Option<Topic>> {
        let query = format!("{TOPIC_SELECT} WHERE t.id = $1 AND t.board_id = $2");
        let topic = sqlx::query_as::<_, Topic>(&query)
            .bind(topic_id)
            .bind(board_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(topic)
    }

    /// List a page of a board's topics, most recently updated first.
    pub async fn list_by_board_paginated(
        &self,
        board_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<TopicSummary>> {
        let topics = sqlx::query_as::<_, TopicSummary>(
            "SELECT t.id, t.board_id, t.starter_id, u.username AS starter_username,
                    t.subject, t.message, t.views, t.created_at, t.last_updated,
                    (SELECT COUNT(*) FROM posts p WHERE p.topic_id = t.id) - 1 AS replies
             FROM topics t
             JOIN users u ON u.id = t.starter_id
             WHERE t.board_id = $1
             ORDER BY t.last_updated DESC, t.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(board_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(topics)
    }

    /// Count the topics on a board.
    pub async fn count_by_board(&self, board_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE board_id = $1")
            .bind(board_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Add one to a topic's view counter.
    pub async fn increment_views(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE topics SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
