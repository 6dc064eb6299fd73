//! Visitor session cookie extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use std::sync::Arc;

use crate::web::handlers::AppState;

/// The visitor session of the current request.
///
/// Reads the session cookie and resolves it against the session store. A
/// missing, unknown or expired cookie gets a fresh id, which is stored only
/// once the visitor views a topic.
/// Return [`VisitorSession::cookies`] from the handler so the cookie is set.
#[derive(Debug)]
pub struct VisitorSession {
    /// Session ID.
    pub id: String,
    jar: CookieJar,
}

impl VisitorSession {
    /// Cookie jar carrying the session cookie.
    pub fn cookies(&self) -> CookieJar {
        self.jar.clone()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for VisitorSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let presented = jar.get(&state.session_cookie).map(|c| c.value().to_string());

        let id = state.sessions.resolve(presented.as_deref()).await;

        let cookie = Cookie::build((state.session_cookie.clone(), id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        Ok(VisitorSession {
            id,
            jar: jar.add(cookie),
        })
    }
}
