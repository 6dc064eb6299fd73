//! Agora - a discussion forum
//!
//! Boards hold topics, topics hold posts. Users sign up, start topics,
//! reply, and edit their own posts through a JSON web API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forum;
pub mod logging;
pub mod web;

pub use auth::{
    can_edit_post, hash_password, register, verify_password, PasswordError, PermissionError,
    RegistrationError, RegistrationRequest, SessionStore, ValidationError,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository, UserUpdate};
pub use error::{AgoraError, Result};
pub use forum::{Board, ForumService, Paginator, Post, Topic};
