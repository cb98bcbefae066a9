use axum::{extract::State, Json};
use std::sync::Arc;

use courtbook_core::{
    errors::CourtError,
    models::user::{
        CreateUserProfileRequest, CreateUserProfileResponse, UpdateUserProfileRequest,
        UserProfile,
    },
};
use courtbook_db::repositories::user_profile::{self, UserProfilePatch};

use crate::{
    middleware::{
        auth::{CurrentUser, MaybeUser},
        error_handling::AppError,
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateUserProfileRequest>,
) -> Result<Json<CreateUserProfileResponse>, AppError> {
    let preferred_sports = payload.preferred_sports.unwrap_or_default();
    let language = payload.language.as_deref().or(Some("fr"));

    let profile = user_profile::create_profile(
        &state.db_pool,
        user_id,
        &payload.first_name,
        &payload.last_name,
        payload.phone.as_deref(),
        payload.user_type,
        &preferred_sports,
        language,
    )
    .await
    .map_err(CourtError::Database)?
    .ok_or_else(|| CourtError::Conflict("Profile already exists".to_string()))?;

    Ok(Json(CreateUserProfileResponse { id: profile.id }))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<ApiState>>,
    MaybeUser(user_id): MaybeUser,
) -> Result<Json<Option<UserProfile>>, AppError> {
    // Anonymous callers get null, not an error
    let Some(user_id) = user_id else {
        return Ok(Json(None));
    };

    let profile = user_profile::get_profile_by_user_id(&state.db_pool, user_id)
        .await
        .map_err(CourtError::Database)?;

    let profile = profile.map(UserProfile::try_from).transpose()?;

    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<UpdateUserProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let patch = UserProfilePatch {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        preferred_sports: payload.preferred_sports,
        language: payload.language,
        location: payload.location,
    };

    let profile = user_profile::update_profile(&state.db_pool, user_id, &patch)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound("Profile not found".to_string()))?;

    Ok(Json(UserProfile::try_from(profile)?))
}
