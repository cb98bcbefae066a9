//! # Error Handling Middleware
//!
//! Standardized error handling for the Courtbook API. Maps domain-specific
//! errors to HTTP status codes and JSON error responses so every failed
//! operation surfaces the same `{"error": message}` shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courtbook_core::errors::CourtError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `CourtError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub CourtError);

/// Converts application errors to HTTP responses.
///
/// Maps each error type to the appropriate HTTP status code and formats the
/// error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            CourtError::NotFound(_) => StatusCode::NOT_FOUND,
            CourtError::Validation(_) => StatusCode::BAD_REQUEST,
            CourtError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CourtError::Authorization(_) => StatusCode::FORBIDDEN,
            CourtError::Conflict(_) => StatusCode::CONFLICT,
            CourtError::Policy(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CourtError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CourtError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from CourtError to AppError.
///
/// Allows using the `?` operator with functions that return
/// `Result<T, CourtError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<CourtError> for AppError {
    fn from(err: CourtError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Wraps the eyre error in a `CourtError::Database` variant so repository
/// failures propagate through `?` in handlers.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CourtError::Database(err))
    }
}
