//! Input validation for signup and account fields.
//!
//! Each error knows which form field it belongs to so the web layer can
//! report field-level messages.

use thiserror::Error;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length of first and last names.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username is required")]
    UsernameEmpty,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("username may contain only letters, digits and @/./+/-/_")]
    UsernameInvalidChars,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password consists only of digits.
    #[error("password cannot be entirely numeric")]
    PasswordNumeric,

    /// Password is the same as username.
    #[error("password cannot be the same as username")]
    PasswordSameAsUsername,

    /// Password and its confirmation differ.
    #[error("the two password fields didn't match")]
    PasswordMismatch,

    /// Email is required but empty.
    #[error("email is required")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// First name is too long.
    #[error("first name must be at most {MAX_NAME_LENGTH} characters")]
    FirstNameTooLong,

    /// Last name is too long.
    #[error("last name must be at most {MAX_NAME_LENGTH} characters")]
    LastNameTooLong,
}

impl ValidationError {
    /// Name of the form field this error applies to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UsernameEmpty
            | ValidationError::UsernameTooLong
            | ValidationError::UsernameInvalidChars => "username",
            ValidationError::PasswordTooShort
            | ValidationError::PasswordTooLong
            | ValidationError::PasswordNumeric
            | ValidationError::PasswordSameAsUsername => "password",
            ValidationError::PasswordMismatch => "password_confirmation",
            ValidationError::EmailEmpty
            | ValidationError::EmailTooLong
            | ValidationError::EmailInvalidFormat => "email",
            ValidationError::FirstNameTooLong => "first_name",
            ValidationError::LastNameTooLong => "last_name",
        }
    }
}

/// Validate a username.
///
/// Requirements:
/// - Length: 1-150 characters
/// - Characters: letters, digits and `@ . + - _`
///
/// # Examples
///
/// ```
/// use agora::auth::validation::validate_username;
///
/// assert!(validate_username("john.doe+forum").is_ok());
/// assert!(validate_username("").is_err());
/// assert!(validate_username("john doe").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate a new password against the account's username.
pub fn validate_password(password: &str, username: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordNumeric);
    }
    if password.eq_ignore_ascii_case(username) {
        return Err(ValidationError::PasswordSameAsUsername);
    }
    Ok(())
}

/// Validate an email address.
///
/// An empty address is accepted unless `required` is set.
pub fn validate_email(email: &str, required: bool) -> Result<(), ValidationError> {
    if email.is_empty() {
        return if required {
            Err(ValidationError::EmailEmpty)
        } else {
            Ok(())
        };
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or(ValidationError::EmailInvalidFormat)?;
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if !domain.contains('.') || domain.split('.').any(|p| p.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

/// Validate a first or last name.
fn validate_name(name: &str, too_long: ValidationError) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(too_long);
    }
    Ok(())
}

/// Validate all signup fields, collecting every failure.
pub fn validate_signup(
    username: &str,
    email: &str,
    password: &str,
    password_confirmation: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Err(e) = validate_username(username) {
        errors.push(e);
    }
    if let Err(e) = validate_email(email, true) {
        errors.push(e);
    }
    if let Err(e) = validate_password(password, username) {
        errors.push(e);
    }
    if password != password_confirmation {
        errors.push(ValidationError::PasswordMismatch);
    }
    errors
}

/// Validate the editable account fields, collecting every failure.
pub fn validate_account(first_name: &str, last_name: &str, email: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Err(e) = validate_name(first_name, ValidationError::FirstNameTooLong) {
        errors.push(e);
    }
    if let Err(e) = validate_name(last_name, ValidationError::LastNameTooLong) {
        errors.push(e);
    }
    if let Err(e) = validate_email(email, false) {
        errors.push(e);
    }
    errors
}
