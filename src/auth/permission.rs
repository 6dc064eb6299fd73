//! Permission checks for forum actions.

use thiserror::Error;

use crate::db::User;
use crate::forum::Post;

/// Permission-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// User is not authenticated.
    #[error("login required")]
    NotAuthenticated,

    /// User account is not active.
    #[error("account is inactive")]
    AccountInactive,

    /// User did not create the post.
    #[error("only the creator may edit this post")]
    NotPostOwner,
}

/// Whether `user_id` may edit `post`.
///
/// Only the user who created a post may edit it.
///
/// # Examples
///
/// ```
/// use agora::auth::can_edit_post;
/// use agora::forum::Post;
/// use chrono::Utc;
///
/// let post = Post {
///     id: 1,
///     topic_id: 1,
///     message: "hello".to_string(),
///     created_by: 7,
///     created_by_username: "ada".to_string(),
///     created_at: Utc::now(),
///     updated_by: None,
///     updated_at: None,
/// };
/// assert!(can_edit_post(&post, 7));
/// assert!(!can_edit_post(&post, 8));
/// ```
pub fn can_edit_post(post: &Post, user_id: i64) -> bool {
    post.created_by == user_id
}

/// Require that `user` is logged in, active, and the creator of `post`.
pub fn check_edit_post(user: Option<&User>, post: &Post) -> Result<(), PermissionError> {
    let user = user.ok_or(PermissionError::NotAuthenticated)?;

    if !user.is_active {
        return Err(PermissionError::AccountInactive);
    }
    if !can_edit_post(post, user.id) {
        return Err(PermissionError::NotPostOwner);
    }

    Ok(())
}
