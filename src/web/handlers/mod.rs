//! API handlers.

pub mod account;
pub mod auth;
pub mod board;

pub use account::*;
pub use auth::*;
pub use board::*;
