use axum::http::StatusCode;
use axum::response::IntoResponse;

use courtbook_api::middleware::error_handling::AppError;
use courtbook_core::errors::CourtError;

fn status_for(error: CourtError) -> StatusCode {
    AppError(error).into_response().status()
}

#[test]
fn test_error_handling_not_found() {
    let status = status_for(CourtError::NotFound("Venue not found".to_string()));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_error_handling_validation() {
    let status = status_for(CourtError::Validation("Invalid input".to_string()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_error_handling_authentication() {
    let status = status_for(CourtError::Authentication("Not authenticated".to_string()));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test]
fn test_error_handling_authorization() {
    let status = status_for(CourtError::Authorization("Not authorized".to_string()));
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[test]
fn test_error_handling_conflict() {
    let status = status_for(CourtError::Conflict("Time slot already booked".to_string()));
    assert_eq!(status, StatusCode::CONFLICT);
}

#[test]
fn test_error_handling_policy() {
    let status = status_for(CourtError::Policy("Too close to start time".to_string()));
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_error_handling_database() {
    let status = status_for(CourtError::Database(eyre::eyre!("Database error")));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_error_handling_internal() {
    let status = status_for(CourtError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    ))));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_error_conversion_from_eyre() {
    let err: AppError = eyre::eyre!("connection refused").into();
    assert!(matches!(err.0, CourtError::Database(_)));
}

#[test]
fn test_error_conversion_from_court_error() {
    let err: AppError = CourtError::NotFound("missing".to_string()).into();
    assert_eq!(
        err.into_response().status(),
        StatusCode::NOT_FOUND
    );
}
