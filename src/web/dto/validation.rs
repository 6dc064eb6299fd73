//! Validation utilities for web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor whose rejection uses the API error format.
///
/// The body is only deserialized. Handlers that must resolve a resource or
/// check permissions before reporting field errors call [`validate_body`]
/// themselves.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;
        Ok(JsonBody(value))
    }
}

/// Check a request body with the `validator` crate.
///
/// Invalid fields produce a 422 error with field-level messages.
pub fn validate_body<T: Validate>(value: &T) -> Result<(), ApiError> {
    value.validate().map_err(ApiError::from_validation_errors)
}

/// A JSON extractor that validates the request body.
///
/// The body is deserialized as JSON and then checked with the `validator`
/// crate. Invalid fields produce a 422 response with field-level messages.
///
/// # Example
///
/// ```ignore
/// use agora::web::dto::{LoginRequest, ValidatedJson};
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) -> impl IntoResponse {
///     // payload.username is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        validate_body(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Validate free text: not blank, and no control characters other than
/// newlines, carriage returns and tabs.
pub fn text_content(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("This field is required.".into()));
    }
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}
