//! Account self-service for the logged-in user.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_account, ValidationError};
use crate::db::{User, UserRepository, UserUpdate};

/// Account update errors.
#[derive(Error, Debug)]
pub enum AccountError {
    /// One or more fields failed validation.
    #[error("invalid account data")]
    Validation(Vec<ValidationError>),

    /// The user no longer exists.
    #[error("user not found")]
    NotFound,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Editable account fields.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address; may be empty.
    pub email: String,
}

/// Update the account of `user_id`.
///
/// The target is always the requesting user, so no ownership check is
/// needed beyond passing the authenticated id.
pub async fn update_account(
    repo: &UserRepository<'_>,
    user_id: i64,
    update: AccountUpdate,
) -> Result<User, AccountError> {
    let errors = validate_account(&update.first_name, &update.last_name, &update.email);
    if !errors.is_empty() {
        return Err(AccountError::Validation(errors));
    }

    let changes = UserUpdate::new()
        .first_name(update.first_name)
        .last_name(update.last_name)
        .email(update.email);

    let user = repo
        .update(user_id, &changes)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?
        .ok_or(AccountError::NotFound)?;

    info!(user_id = user.id, "Account updated");
    Ok(user)
}
