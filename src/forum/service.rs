//! Forum service for Agora.
//!
//! This module provides the forum operations behind every page: board and
//! topic listings, starting topics, replying, and editing posts. Lookups are
//! always scoped by board (and by topic for posts).

use tracing::{debug, info, warn};

use super::pagination::{Page, Paginator};
use super::post::{NewPost, Post, MAX_MESSAGE_LENGTH};
use super::post_repository::PostRepository;
use super::repository::BoardRepository;
use super::topic::{NewTopic, Topic, TopicSummary, MAX_SUBJECT_LENGTH};
use super::topic_repository::TopicRepository;
use super::types::{
    Board, BoardSummary, NewBoard, MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH,
};
use crate::auth::{check_edit_post, SessionStore};
use crate::config::{BoardSeed, ForumConfig};
use crate::db::{Database, User};
use crate::{AgoraError, Result};

/// Number of recent posts shown alongside the reply form.
pub const REPLY_CONTEXT_POSTS: i64 = 10;

fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(AgoraError::Validation("subject is required".to_string()));
    }
    if subject.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(AgoraError::Validation(format!(
            "subject must be at most {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(AgoraError::Validation("message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AgoraError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A topic page: the topic and one page of its posts.
#[derive(Debug, Clone)]
pub struct TopicPage {
    /// The topic, with the view counter as of this request.
    pub topic: Topic,
    /// Posts on the requested page, oldest first.
    pub posts: Page<Post>,
}

/// Result of posting a reply.
#[derive(Debug, Clone)]
pub struct ReplyOutcome {
    /// The new post.
    pub post: Post,
    /// Page of the topic on which the new post appears.
    pub page: u32,
}

/// Service for forum operations.
pub struct ForumService<'a> {
    db: &'a Database,
    config: ForumConfig,
}

impl<'a> ForumService<'a> {
    /// Create a new ForumService with the given database and listing config.
    pub fn new(db: &'a Database, config: ForumConfig) -> Self {
        Self { db, config }
    }

    /// Create boards from the configuration that do not exist yet.
    ///
    /// Returns the number of boards created.
    pub async fn seed_boards(&self, seeds: &[BoardSeed]) -> Result<usize> {
        let repo = BoardRepository::new(self.db.pool());
        let mut created = 0;
        for seed in seeds {
            let name_len = seed.name.chars().count();
            if name_len == 0 || name_len > MAX_BOARD_NAME_LENGTH {
                return Err(AgoraError::Validation(format!(
                    "board name must be 1-{MAX_BOARD_NAME_LENGTH} characters: '{}'",
                    seed.name
                )));
            }
            if seed.description.chars().count() > MAX_BOARD_DESCRIPTION_LENGTH {
                return Err(AgoraError::Validation(format!(
                    "description of board '{}' is too long",
                    seed.name
                )));
            }
            if repo.get_by_name(&seed.name).await?.is_some() {
                continue;
            }
            repo.create(&NewBoard::new(&seed.name, &seed.description))
                .await?;
            info!(board = %seed.name, "Seeded board");
            created += 1;
        }
        Ok(created)
    }

    /// List every board with its statistics.
    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>> {
        BoardRepository::new(self.db.pool()).list_with_stats().await
    }

    /// Get a board by ID.
    pub async fn get_board(&self, board_id: i64) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("board".to_string()))
    }

    /// List a page of a board's topics, most recently updated first.
    pub async fn list_topics(
        &self,
        board_id: i64,
        page: Option<&str>,
    ) -> Result<(Board, Page<TopicSummary>)> {
        let board = self.get_board(board_id).await?;
        let repo = TopicRepository::new(self.db.pool());

        let paginator = Paginator::new(
            self.config.topics_per_page,
            repo.count_by_board(board_id).await?,
        );
        let number = paginator.resolve(page);
        let topics = repo
            .list_by_board_paginated(board_id, paginator.offset(number), paginator.limit())
            .await?;

        Ok((board, paginator.page(number, topics)))
    }

    /// Start a topic on a board with its opening post.
    pub async fn start_topic(
        &self,
        board_id: i64,
        starter: &User,
        subject: &str,
        message: &str,
    ) -> Result<(Topic, Post)> {
        self.get_board(board_id).await?;
        validate_subject(subject)?;
        validate_message(message)?;

        let (topic, post) = TopicRepository::new(self.db.pool())
            .create_with_opening_post(&NewTopic::new(board_id, starter.id, subject, message))
            .await?;

        info!(
            board_id = board_id,
            topic_id = topic.id,
            user_id = starter.id,
            "Topic started"
        );
        Ok((topic, post))
    }

    /// Get a topic that belongs to the given board.
    pub async fn get_topic(&self, board_id: i64, topic_id: i64) -> Result<Topic> {
        TopicRepository::new(self.db.pool())
            .get_in_board(board_id, topic_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("topic".to_string()))
    }

    /// Show one page of a topic's posts and count the view.
    ///
    /// The view counter is bumped only the first time the visitor session
    /// sees the topic.
    pub async fn view_topic(
        &self,
        board_id: i64,
        topic_id: i64,
        sessions: &SessionStore,
        session_id: &str,
        page: Option<&str>,
    ) -> Result<TopicPage> {
        let mut topic = self.get_topic(board_id, topic_id).await?;

        if sessions.mark_viewed(session_id, topic.id).await {
            TopicRepository::new(self.db.pool())
                .increment_views(topic.id)
                .await?;
            topic.views += 1;
            debug!(topic_id = topic.id, "Counted topic view");
        }

        let repo = PostRepository::new(self.db.pool());
        let paginator = Paginator::new(
            self.config.posts_per_page,
            repo.count_by_topic(topic.id).await?,
        );
        let number = paginator.resolve(page);
        let posts = repo
            .list_by_topic_paginated(topic.id, paginator.offset(number), paginator.limit())
            .await?;

        Ok(TopicPage {
            topic,
            posts: paginator.page(number, posts),
        })
    }

    /// The topic and its most recent posts, newest first.
    pub async fn reply_context(&self, board_id: i64, topic_id: i64) -> Result<(Topic, Vec<Post>)> {
        let topic = self.get_topic(board_id, topic_id).await?;
        let posts = PostRepository::new(self.db.pool())
            .list_latest_by_topic(topic.id, REPLY_CONTEXT_POSTS)
            .await?;
        Ok((topic, posts))
    }

    /// Reply to a topic.
    pub async fn reply(
        &self,
        board_id: i64,
        topic_id: i64,
        author: &User,
        message: &str,
    ) -> Result<ReplyOutcome> {
        let topic = self.get_topic(board_id, topic_id).await?;
        validate_message(message)?;

        let repo = PostRepository::new(self.db.pool());
        let post = repo
            .create_reply(&NewPost::new(topic.id, author.id, message))
            .await?;

        let paginator = Paginator::new(
            self.config.posts_per_page,
            repo.count_by_topic(topic.id).await?,
        );

        info!(
            topic_id = topic.id,
            post_id = post.id,
            user_id = author.id,
            "Reply posted"
        );
        Ok(ReplyOutcome {
            post,
            page: paginator.num_pages(),
        })
    }

    /// Get a post that belongs to the given board and topic.
    pub async fn get_post(&self, board_id: i64, topic_id: i64, post_id: i64) -> Result<Post> {
        let topic = self.get_topic(board_id, topic_id).await?;
        PostRepository::new(self.db.pool())
            .get_in_topic(topic.id, post_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))
    }

    /// Get a post for editing, checking that `editor` created it.
    pub async fn get_post_for_edit(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        editor: &User,
    ) -> Result<Post> {
        let post = self.get_post(board_id, topic_id, post_id).await?;
        if let Err(e) = check_edit_post(Some(editor), &post) {
            warn!(
                post_id = post.id,
                user_id = editor.id,
                "Post edit denied: {}",
                e
            );
            return Err(AgoraError::Permission(e.to_string()));
        }
        Ok(post)
    }

    /// Replace the message of a post created by `editor`.
    pub async fn edit_post(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        editor: &User,
        message: &str,
    ) -> Result<Post> {
        let post = self
            .get_post_for_edit(board_id, topic_id, post_id, editor)
            .await?;
        validate_message(message)?;

        let post = PostRepository::new(self.db.pool())
            .update_message(post.id, message, editor.id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))?;

        info!(post_id = post.id, user_id = editor.id, "Post edited");
        Ok(post)
    }
}
