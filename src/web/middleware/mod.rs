//! Middleware for the web API.

pub mod auth;
pub mod cors;
pub mod session;

pub use auth::{jwt_auth, AuthUser, JwtClaims, JwtState, OptionalAuthUser};
pub use cors::create_cors_layer;
pub use session::VisitorSession;
