//! Refresh token repository for JWT authentication.

use chrono::{DateTime, Utc};

use super::DbPool;
use crate::{AgoraError, Result};

/// Refresh token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    /// Token ID.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Opaque token string handed to the client.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<DateTime<Utc>>,
}

/// New refresh token for creation.
pub struct NewRefreshToken {
    /// Owning user.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Repository for refresh token operations.
pub struct RefreshTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a new refresh token.
    pub async fn create(&self, new_token: &NewRefreshToken) -> Result<RefreshToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_token.user_id)
        .bind(&new_token.token)
        .bind(new_token.expires_at)
        .fetch_one(self.pool)
        .await?;

        sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token, expires_at, revoked_at FROM refresh_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| AgoraError::NotFound("refresh token".to_string()))
    }

    /// Get a token that is neither expired nor revoked.
    pub async fn get_valid_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let result = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token, expires_at, revoked_at
             FROM refresh_tokens
             WHERE token = $1 AND revoked_at IS NULL",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(result.filter(|t| t.expires_at > Utc::now()))
    }

    /// Revoke a refresh token.
    ///
    /// Returns false if the token was unknown or already revoked.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $1 WHERE token = $2 AND revoked_at IS NULL",
        )
        .bind(Utc::now())
        .bind(token)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete expired and revoked tokens.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1 OR revoked_at IS NOT NULL")
                .bind(Utc::now())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
