//! User signup for Agora.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_signup, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};
use crate::AgoraError;

/// Signup errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// One or more fields failed validation.
    #[error("invalid signup data")]
    Validation(Vec<ValidationError>),

    /// Username already exists.
    #[error("username already exists")]
    UsernameExists,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Signup form data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// Email address (required at signup).
    pub email: String,
    /// Password.
    pub password: String,
    /// Password typed a second time.
    pub password_confirmation: String,
}

impl RegistrationRequest {
    /// Create a request whose confirmation matches the password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            email: email.into(),
            password_confirmation: password.clone(),
            password,
        }
    }

    /// Set a confirmation that differs from the password.
    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.password_confirmation = confirmation.into();
        self
    }
}

/// Register a new user.
///
/// Validates every field, rejects taken usernames, hashes the password and
/// stores the account.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> Result<User, RegistrationError> {
    let errors = validate_signup(
        &request.username,
        &request.email,
        &request.password,
        &request.password_confirmation,
    );
    if !errors.is_empty() {
        return Err(RegistrationError::Validation(errors));
    }

    if repo
        .username_exists(&request.username)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(RegistrationError::UsernameExists);
    }

    let password_hash = hash_password(&request.password)?;
    let new_user = NewUser::new(&request.username, password_hash, &request.email);

    let user = repo.create(&new_user).await.map_err(|e| match e {
        AgoraError::Conflict(_) => RegistrationError::UsernameExists,
        other => RegistrationError::Database(other.to_string()),
    })?;

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}
