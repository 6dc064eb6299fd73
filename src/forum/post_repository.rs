//! Post repository for Agora.

use chrono::Utc;

use super::post::{NewPost, Post};
use crate::db::DbPool;
use crate::{AgoraError, Result};

const POST_SELECT: &str = "SELECT p.id, p.topic_id, p.message, p.created_by,
        u.username AS created_by_username, p.created_at, p.updated_by, p.updated_at
     FROM posts p
     JOIN users u ON u.id = p.created_by";

/// Repository for post operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Add a reply to a topic.
    ///
    /// The insert and the topic's `last_updated` bump share one transaction,
    /// and `last_updated` is set to the reply's own `created_at`.
    pub async fn create_reply(&self, new_post: &NewPost) -> Result<Post> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let post_id = sqlx::query(
            "INSERT INTO posts (topic_id, message, created_by, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(new_post.topic_id)
        .bind(&new_post.message)
        .bind(new_post.created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("UPDATE topics SET last_updated = $1 WHERE id = $2")
            .bind(now)
            .bind(new_post.topic_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(post_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let query = format!("{POST_SELECT} WHERE p.id = $1");
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Get a post only if it belongs to the given topic.
    pub async fn get_in_topic(&self, topic_id: i64, post_id: i64) -> Result<Option<Post>> {
        let query = format!("{POST_SELECT} WHERE p.id = $1 AND p.topic_id = $2");
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(topic_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// List a page of a topic's posts, oldest first.
    pub async fn list_by_topic_paginated(
        &self,
        topic_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let query = format!(
            "{POST_SELECT} WHERE p.topic_id = $1 ORDER BY p.created_at ASC, p.id ASC LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(topic_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(posts)
    }

    /// List the most recent posts of a topic, newest first.
    pub async fn list_latest_by_topic(&self, topic_id: i64, limit: i64) -> Result<Vec<Post>> {
        let query = format!(
            "{POST_SELECT} WHERE p.topic_id = $1 ORDER BY p.created_at DESC, p.id DESC LIMIT $2"
        );
        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(topic_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(posts)
    }

    /// Count the posts of a topic, including the opening post.
    pub async fn count_by_topic(&self, topic_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE topic_id = $1")
            .bind(topic_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Replace a post's message and record the editor.
    ///
    /// `created_by` and `created_at` are left untouched. Returns None if the
    /// post does not exist.
    pub async fn update_message(
        &self,
        id: i64,
        message: &str,
        editor_id: i64,
    ) -> Result<Option<Post>> {
        let result = sqlx::query(
            "UPDATE posts SET message = $1, updated_by = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(message)
        .bind(editor_id)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}
