//! Request DTOs for the web API.
//!
//! Missing fields deserialize as empty strings so they are reported as
//! field validation errors rather than malformed JSON.

use serde::Deserialize;
use validator::Validate;

use super::validation::text_content;

/// `?page=` query parameter.
///
/// Kept as raw text; the paginator decides how to treat non-integers.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Requested page number.
    pub page: Option<String>,
}

/// New topic form.
#[derive(Debug, Deserialize, Validate)]
pub struct NewTopicRequest {
    /// Topic subject.
    #[serde(default)]
    #[validate(
        length(max = 255, message = "Ensure this value has at most 255 characters."),
        custom(function = "text_content")
    )]
    pub subject: String,
    /// Opening message.
    #[serde(default)]
    #[validate(
        length(max = 4000, message = "Ensure this value has at most 4000 characters."),
        custom(function = "text_content")
    )]
    pub message: String,
}

/// Reply form.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    /// Reply message.
    #[serde(default)]
    #[validate(
        length(max = 4000, message = "Ensure this value has at most 4000 characters."),
        custom(function = "text_content")
    )]
    pub message: String,
}

/// Post edit form.
#[derive(Debug, Deserialize, Validate)]
pub struct EditPostRequest {
    /// New message.
    #[serde(default)]
    #[validate(
        length(max = 4000, message = "Ensure this value has at most 4000 characters."),
        custom(function = "text_content")
    )]
    pub message: String,
}

/// Signup form.
///
/// Checked by the registration validators, which know the domain rules.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Password confirmation.
    #[serde(default)]
    pub password_confirmation: String,
}

/// Account update form.
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

/// Logout request.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke.
    pub refresh_token: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}
