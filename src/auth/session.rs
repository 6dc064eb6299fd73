//! Login and visitor sessions.
//!
//! Visitor sessions are keyed by a cookie and exist independently of login.
//! They remember which topics a visitor has already seen so that repeated
//! page loads count as a single view.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::verify_password;
use crate::db::{User, UserRepository};

/// Login errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Wrong username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is inactive.
    #[error("account is inactive")]
    AccountInactive,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Default visitor idle timeout (2 weeks).
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 14 * 24 * 60 * 60;

/// Check a username/password pair and record the login.
pub async fn authenticate(
    repo: &UserRepository<'_>,
    username: &str,
    password: &str,
) -> Result<User, SessionError> {
    let user = repo
        .get_by_username(username)
        .await
        .map_err(|e| SessionError::Database(e.to_string()))?;

    let Some(user) = user else {
        warn!(username = %username, "Login failed: user not found");
        return Err(SessionError::InvalidCredentials);
    };

    if verify_password(password, &user.password).is_err() {
        warn!(username = %username, "Login failed: wrong password");
        return Err(SessionError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(username = %username, "Login failed: account inactive");
        return Err(SessionError::AccountInactive);
    }

    repo.update_last_login(user.id)
        .await
        .map_err(|e| SessionError::Database(e.to_string()))?;

    info!(username = %user.username, user_id = user.id, "Login successful");
    Ok(user)
}

/// Default timeout for sessions whose cookie never came back (1 hour).
pub const DEFAULT_UNCONFIRMED_TIMEOUT_SECS: u64 = 60 * 60;

/// State kept for one visitor.
#[derive(Debug)]
struct VisitorSession {
    viewed_topics: HashSet<i64>,
    last_activity: Instant,
    /// Set once the client presents the session cookie back.
    confirmed: bool,
}

impl VisitorSession {
    fn new() -> Self {
        Self {
            viewed_topics: HashSet::new(),
            last_activity: Instant::now(),
            confirmed: false,
        }
    }

    fn is_expired(&self, idle_timeout: Duration, unconfirmed_timeout: Duration) -> bool {
        let timeout = if self.confirmed {
            idle_timeout
        } else {
            unconfirmed_timeout.min(idle_timeout)
        };
        self.last_activity.elapsed() >= timeout
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Shared in-memory store of visitor sessions.
///
/// Sessions are created lazily: resolving a missing or unknown cookie hands
/// out a fresh id without storing anything, and only [`mark_viewed`]
/// inserts. Sessions whose cookie is never presented again (crawlers,
/// one-off clients) expire after the shorter unconfirmed timeout.
///
/// [`mark_viewed`]: SessionStore::mark_viewed
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, VisitorSession>>>,
    idle_timeout: Duration,
    unconfirmed_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_UNCONFIRMED_TIMEOUT_SECS)
    }
}

impl SessionStore {
    /// Create a store.
    ///
    /// Sessions expire after `idle_timeout_secs` of inactivity, or after
    /// `unconfirmed_timeout_secs` if the client never sent the cookie back.
    pub fn new(idle_timeout_secs: u64, unconfirmed_timeout_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
            unconfirmed_timeout: Duration::from_secs(unconfirmed_timeout_secs),
        }
    }

    /// Resolve the session id presented by a visitor.
    ///
    /// A known, live id is touched, confirmed and returned unchanged.
    /// Otherwise a fresh id is returned; it is not stored until the visitor
    /// views a topic.
    pub async fn resolve(&self, session_id: Option<&str>) -> String {
        if let Some(id) = session_id {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(id) {
                Some(session)
                    if !session.is_expired(self.idle_timeout, self.unconfirmed_timeout) =>
                {
                    session.touch();
                    session.confirmed = true;
                    return id.to_string();
                }
                Some(_) => {
                    sessions.remove(id);
                    debug!(session_id = %id, "Visitor session expired");
                }
                None => {}
            }
        }

        Uuid::new_v4().to_string()
    }

    /// Record that the session has viewed `topic_id`, storing the session
    /// if it is new.
    ///
    /// Returns true the first time a topic is seen in the session. The check
    /// and the update happen under one write lock.
    pub async fn mark_viewed(&self, session_id: &str, topic_id: i64) -> bool {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id = %session_id, "Visitor session created");
            VisitorSession::new()
        });
        session.touch();
        session.viewed_topics.insert(topic_id)
    }

    /// Remove expired sessions, returning how many were dropped.
    pub async fn cleanup(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.idle_timeout, self.unconfirmed_timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed = removed, "Cleaned up idle visitor sessions");
        }
        removed
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::db::{NewUser, UserUpdate};
    use crate::Database;

    #[tokio::test]
    async fn test_resolve_does_not_store_sessions() {
        let store = SessionStore::default();

        let a = store.resolve(None).await;
        let b = store.resolve(Some("unknown")).await;
        assert_ne!(a, b);
        assert_ne!(b, "unknown");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_resolve_reuses_stored_session() {
        let store = SessionStore::default();
        let id = store.resolve(None).await;
        store.mark_viewed(&id, 1).await;

        assert_eq!(store.resolve(Some(&id)).await, id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_mark_viewed_once_per_session() {
        let store = SessionStore::default();
        let a = store.resolve(None).await;
        let b = store.resolve(None).await;

        assert!(store.mark_viewed(&a, 1).await);
        assert!(!store.mark_viewed(&a, 1).await);
        assert!(store.mark_viewed(&a, 2).await);
        assert!(store.mark_viewed(&b, 1).await);
        assert!(!store.mark_viewed(&b, 1).await);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new(0, 0);
        let id = store.resolve(None).await;
        store.mark_viewed(&id, 1).await;

        assert_eq!(store.cleanup().await, 1);
        assert!(store.is_empty().await);
        assert_ne!(store.resolve(Some(&id)).await, id);
    }

    #[tokio::test]
    async fn test_unconfirmed_sessions_expire_first() {
        let store = SessionStore::new(DEFAULT_IDLE_TIMEOUT_SECS, 0);

        let returning = store.resolve(None).await;
        store.mark_viewed(&returning, 1).await;
        let drive_by = store.resolve(None).await;
        store.mark_viewed(&drive_by, 1).await;

        // Only the first visitor sends its cookie back
        let mut sessions = store.sessions.write().await;
        if let Some(session) = sessions.get_mut(&returning) {
            session.confirmed = true;
        }
        drop(sessions);

        assert_eq!(store.cleanup().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(!store.mark_viewed(&returning, 1).await);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let hash = hash_password("correct-pw").unwrap();
        let user = repo
            .create(&NewUser::new("Alice", hash, "a@example.com"))
            .await
            .unwrap();

        let logged_in = authenticate(&repo, "alice", "correct-pw").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        let reloaded = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());

        assert!(matches!(
            authenticate(&repo, "alice", "wrong-pw").await,
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&repo, "bob", "correct-pw").await,
            Err(SessionError::InvalidCredentials)
        ));

        repo.update(user.id, &UserUpdate::new().is_active(false))
            .await
            .unwrap();
        assert!(matches!(
            authenticate(&repo, "alice", "correct-pw").await,
            Err(SessionError::AccountInactive)
        ));
    }
}
