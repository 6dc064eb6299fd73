//! Authentication module for Agora.
//!
//! This module provides password hashing, signup and account validation,
//! login, visitor sessions, and edit permissions.

mod account;
mod password;
pub mod permission;
mod registration;
mod session;
pub mod validation;

pub use account::{update_account, AccountError, AccountUpdate};
pub use password::{hash_password, verify_password, PasswordError};
pub use permission::{can_edit_post, check_edit_post, PermissionError};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use session::{
    authenticate, SessionError, SessionStore, DEFAULT_IDLE_TIMEOUT_SECS,
    DEFAULT_UNCONFIRMED_TIMEOUT_SECS,
};
pub use validation::ValidationError;
