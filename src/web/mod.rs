//! Web API module for Agora.
//!
//! Serves the forum as a JSON API. Form submissions that succeed answer with
//! a `Location` header naming the page to show next; invalid submissions
//! answer 422 with field-level messages.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
