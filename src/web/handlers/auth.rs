//! Authentication handlers and shared application state.

use axum::{extract::State, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{authenticate, SessionStore};
use crate::config::{ForumConfig, WebConfig};
use crate::db::{NewRefreshToken, RefreshTokenRepository, User, UserRepository};
use crate::forum::ForumService;
use crate::web::dto::{
    ApiResponse, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
    UserSummary, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;
use crate::Database;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry: u64,
    /// Visitor sessions.
    pub sessions: SessionStore,
    /// Name of the visitor session cookie.
    pub session_cookie: String,
    /// Listing configuration.
    pub forum: ForumConfig,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, web: &WebConfig, forum: ForumConfig) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(web.jwt_secret.as_bytes()),
            access_token_expiry: web.jwt_access_token_expiry_secs,
            refresh_token_expiry: web.jwt_refresh_token_expiry_days,
            sessions: SessionStore::new(
                web.session_idle_timeout_secs,
                web.session_unconfirmed_timeout_secs,
            ),
            session_cookie: web.session_cookie.clone(),
            forum,
        }
    }

    /// Forum service bound to this state.
    pub fn forum(&self) -> ForumService<'_> {
        ForumService::new(&self.db, self.forum)
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user.id,
            username: user.username.clone(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Generate an opaque refresh token.
    pub fn generate_refresh_token(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Issue and store a fresh token pair for a user.
    pub async fn issue_tokens(&self, user: &User) -> Result<LoginResponse, ApiError> {
        let access_token = self.generate_access_token(user)?;
        let refresh_token = self.store_refresh_token(user.id).await?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
            user: UserSummary {
                id: user.id,
                username: user.username.clone(),
            },
        })
    }

    async fn store_refresh_token(&self, user_id: i64) -> Result<String, ApiError> {
        let token = self.generate_refresh_token();
        let new_token = NewRefreshToken {
            user_id,
            token: token.clone(),
            expires_at: chrono::Utc::now()
                + chrono::Duration::days(self.refresh_token_expiry as i64),
        };

        RefreshTokenRepository::new(self.db.pool())
            .create(&new_token)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store refresh token: {}", e);
                ApiError::internal("Failed to create session")
            })?;

        Ok(token)
    }

    /// Load the user behind an access token.
    ///
    /// A deleted user is treated as unauthenticated, an inactive one as
    /// forbidden.
    pub async fn current_user(&self, claims: &JwtClaims) -> Result<User, ApiError> {
        let user = UserRepository::new(self.db.pool())
            .get_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active {
            return Err(ApiError::forbidden("Account is disabled"));
        }
        Ok(user)
    }
}

/// POST /api/auth/login - User login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = authenticate(&repo, &req.username, &req.password).await?;

    let response = state.issue_tokens(&user).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/auth/logout - Revoke a refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let revoked = RefreshTokenRepository::new(state.db.pool())
        .revoke(&req.refresh_token)
        .await?;
    if !revoked {
        tracing::debug!("Logout with unknown or already revoked refresh token");
    }

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/auth/refresh - Rotate the refresh token and issue a new access token.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let tokens = RefreshTokenRepository::new(state.db.pool());
    let token = tokens
        .get_valid_token(&req.refresh_token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user = UserRepository::new(state.db.pool())
        .get_by_id(token.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    tokens.revoke(&req.refresh_token).await?;
    let issued = state.issue_tokens(&user).await?;

    Ok(Json(ApiResponse::new(RefreshResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
        expires_in: issued.expires_in,
    })))
}
