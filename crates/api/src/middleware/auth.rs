//! # Identity Resolution
//!
//! Extractors that resolve the request's bearer token to a stable user id
//! through the external auth collaborator's session table. Token issuance,
//! password handling, and session lifetime all live outside this service;
//! the only capability consumed here is "credentials in, user id or none
//! out".

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

use courtbook_core::errors::CourtError;

use crate::{middleware::error_handling::AppError, ApiState};

/// The authenticated caller. Rejects the request with an authentication
/// error when no valid bearer token is present.
pub struct CurrentUser(pub Uuid);

/// The caller's identity if any. Endpoints that degrade gracefully for
/// anonymous callers (e.g. listing "my bookings" as empty) use this instead
/// of `CurrentUser`.
pub struct MaybeUser(pub Option<Uuid>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn resolve(state: &ApiState, parts: &Parts) -> Result<Option<Uuid>, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };

    let user_id = courtbook_db::repositories::session::resolve_session(&state.db_pool, token)
        .await
        .map_err(CourtError::Database)?;

    Ok(user_id)
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(state, parts).await? {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => Err(AppError(CourtError::Authentication(
                "Not authenticated".to_string(),
            ))),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve(state, parts).await?))
    }
}
