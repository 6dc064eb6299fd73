//! Forum module for Agora.
//!
//! This module provides the discussion forum:
//! - Boards, the top-level categories
//! - Topics on a board, each started with an opening post
//! - Posts (replies) within a topic, editable by their creator
//! - Page-number pagination for listings

mod pagination;
mod post;
mod post_repository;
mod repository;
mod service;
mod topic;
mod topic_repository;
mod types;

pub use pagination::{Page, Paginator};
pub use post::{NewPost, Post, MAX_MESSAGE_LENGTH};
pub use post_repository::PostRepository;
pub use repository::BoardRepository;
pub use service::{ForumService, ReplyOutcome, TopicPage, REPLY_CONTEXT_POSTS};
pub use topic::{NewTopic, Topic, TopicSummary, MAX_SUBJECT_LENGTH};
pub use topic_repository::TopicRepository;
pub use types::{
    Board, BoardSummary, NewBoard, MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH,
};
