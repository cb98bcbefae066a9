use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use courtbook_core::{
    errors::CourtError,
    models::{
        user::UserType,
        venue::{
            CreateVenueRequest, CreateVenueResponse, UpdateVenueRequest, Venue,
            VenueDetailsResponse, VenueListQuery, VenueSearchQuery,
        },
    },
};
use courtbook_db::repositories::{
    court, user_profile,
    venue::{self, NewVenue, VenuePatch},
};

use crate::{
    media,
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_venue(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateVenueRequest>,
) -> Result<Json<CreateVenueResponse>, AppError> {
    // Only venue owners can create venues
    let profile = user_profile::get_profile_by_user_id(&state.db_pool, user_id)
        .await
        .map_err(CourtError::Database)?;

    let is_owner = profile
        .map(|p| p.user_type == UserType::VenueOwner.as_str())
        .unwrap_or(false);
    if !is_owner {
        return Err(AppError(CourtError::Authorization(
            "Only venue owners can create venues".to_string(),
        )));
    }

    let db_venue = venue::create_venue(
        &state.db_pool,
        NewVenue {
            owner_id: user_id,
            name: &payload.name,
            description: &payload.description,
            address: &payload.address,
            city: &payload.city,
            region: &payload.region,
            coordinates: payload.coordinates,
            phone: &payload.phone,
            email: payload.email.as_deref(),
            website: payload.website.as_deref(),
            amenities: &payload.amenities,
            opening_hours: &payload.opening_hours,
        },
    )
    .await
    .map_err(CourtError::Database)?;

    Ok(Json(CreateVenueResponse { id: db_venue.id }))
}

#[axum::debug_handler]
pub async fn list_venues(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<VenueListQuery>,
) -> Result<Json<Vec<Venue>>, AppError> {
    let venues = venue::list_venues(
        &state.db_pool,
        query.city.as_deref(),
        query.region.as_deref(),
        query.limit,
    )
    .await
    .map_err(CourtError::Database)?;

    Ok(Json(venues.into_iter().map(Venue::from).collect()))
}

#[axum::debug_handler]
pub async fn get_venue(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<VenueDetailsResponse>>, AppError> {
    let db_venue = venue::get_venue_by_id(&state.db_pool, id)
        .await
        .map_err(CourtError::Database)?;

    // Inactive venues read as absent
    let response = db_venue
        .filter(|v| v.is_active)
        .map(Venue::from)
        .map(|venue| {
            let image_urls = media::object_urls(&state.media_base_url, &venue.images);
            VenueDetailsResponse { venue, image_urls }
        });

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn search_venues(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<VenueSearchQuery>,
) -> Result<Json<Vec<Venue>>, AppError> {
    let venues = venue::search_venues(
        &state.db_pool,
        query.search_term.as_deref(),
        query.city.as_deref(),
        query.region.as_deref(),
    )
    .await
    .map_err(CourtError::Database)?;

    let mut venues: Vec<Venue> = venues.into_iter().map(Venue::from).collect();

    // Keep only venues that offer the requested sport on an active court
    if let Some(sport) = &query.sport {
        let with_sport: HashSet<Uuid> = court::venue_ids_with_sport(&state.db_pool, sport)
            .await
            .map_err(CourtError::Database)?
            .into_iter()
            .collect();
        venues.retain(|v| with_sport.contains(&v.id));
    }

    Ok(Json(venues))
}

#[axum::debug_handler]
pub async fn get_my_venues(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Venue>>, AppError> {
    let venues = venue::get_venues_by_owner(&state.db_pool, user_id)
        .await
        .map_err(CourtError::Database)?;

    Ok(Json(venues.into_iter().map(Venue::from).collect()))
}

#[axum::debug_handler]
pub async fn update_venue(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVenueRequest>,
) -> Result<Json<Venue>, AppError> {
    let db_venue = venue::get_venue_by_id(&state.db_pool, id)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound(format!("Venue with ID {} not found", id)))?;

    if db_venue.owner_id != user_id {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to manage this venue".to_string(),
        )));
    }

    let patch = VenuePatch {
        name: payload.name,
        description: payload.description,
        address: payload.address,
        phone: payload.phone,
        email: payload.email,
        website: payload.website,
        amenities: payload.amenities,
        opening_hours: payload.opening_hours,
        is_active: payload.is_active,
    };

    let updated = venue::update_venue(&state.db_pool, id, &patch)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound(format!("Venue with ID {} not found", id)))?;

    Ok(Json(Venue::from(updated)))
}
