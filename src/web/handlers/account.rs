//! Signup and account handlers.

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::auth::validation::{MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::auth::{register, update_account, AccountUpdate, RegistrationRequest};
use crate::db::UserRepository;
use crate::web::dto::{
    AccountRequest, AccountResponse, ApiResponse, SignupFormResponse, SignupRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// GET /api/signup - Signup form constraints.
pub async fn signup_form() -> Json<ApiResponse<SignupFormResponse>> {
    Json(ApiResponse::new(SignupFormResponse {
        username_max_length: MAX_USERNAME_LENGTH,
        password_min_length: MIN_PASSWORD_LENGTH,
        password_max_length: MAX_PASSWORD_LENGTH,
        username_extra_chars: "@.+-_",
    }))
}

/// POST /api/signup - Create an account and log it in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let request = RegistrationRequest {
        username: req.username,
        email: req.email,
        password: req.password,
        password_confirmation: req.password_confirmation,
    };
    let user = register(&repo, request).await?;
    repo.update_last_login(user.id).await?;

    let tokens = state.issue_tokens(&user).await?;
    Ok((
        StatusCode::CREATED,
        [(LOCATION, "/api/boards".to_string())],
        Json(ApiResponse::new(tokens)),
    ))
}

/// GET /api/account - The current user's account.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let user = state.current_user(&claims).await?;
    Ok(Json(ApiResponse::new(user.into())))
}

/// POST /api/account - Update the current user's names and email.
pub async fn post_account(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<AccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.current_user(&claims).await?;
    let repo = UserRepository::new(state.db.pool());
    let updated = update_account(
        &repo,
        user.id,
        AccountUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        [(LOCATION, "/api/account".to_string())],
        Json(ApiResponse::new(AccountResponse::from(updated))),
    ))
}
