use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use courtbook_core::{
    errors::CourtError,
    models::{
        court::{
            Court, CourtDetailsResponse, CourtWithVenue, CourtsBySportQuery, CreateCourtRequest,
            CreateCourtResponse, UpdateCourtRequest,
        },
        venue::Venue,
    },
};
use courtbook_db::repositories::{
    court::{self, CourtPatch, NewCourt},
    venue,
};

use crate::{
    media,
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_court(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateCourtRequest>,
) -> Result<Json<CreateCourtResponse>, AppError> {
    // Verify the caller owns the venue
    let db_venue = venue::get_venue_by_id(&state.db_pool, payload.venue_id)
        .await
        .map_err(CourtError::Database)?;

    let authorized = db_venue.map(|v| v.owner_id == user_id).unwrap_or(false);
    if !authorized {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to add courts to this venue".to_string(),
        )));
    }

    let db_court = court::create_court(
        &state.db_pool,
        NewCourt {
            venue_id: payload.venue_id,
            name: &payload.name,
            sport: &payload.sport,
            surface: &payload.surface,
            size: payload.size.as_deref(),
            capacity: payload.capacity,
            price_per_hour: payload.price_per_hour,
            amenities: &payload.amenities,
            description: payload.description.as_deref(),
        },
    )
    .await
    .map_err(CourtError::Database)?;

    Ok(Json(CreateCourtResponse { id: db_court.id }))
}

#[axum::debug_handler]
pub async fn get_courts_by_venue(
    State(state): State<Arc<ApiState>>,
    Path(venue_id): Path<Uuid>,
) -> Result<Json<Vec<Court>>, AppError> {
    let courts = court::get_courts_by_venue(&state.db_pool, venue_id)
        .await
        .map_err(CourtError::Database)?;

    Ok(Json(courts.into_iter().map(Court::from).collect()))
}

#[axum::debug_handler]
pub async fn get_courts_by_sport(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CourtsBySportQuery>,
) -> Result<Json<Vec<CourtWithVenue>>, AppError> {
    let courts = court::get_courts_by_sport(&state.db_pool, &query.sport, query.limit)
        .await
        .map_err(CourtError::Database)?;

    // Attach venue details to each court
    let mut with_venues = Vec::with_capacity(courts.len());
    for db_court in courts {
        let db_venue = venue::get_venue_by_id(&state.db_pool, db_court.venue_id)
            .await
            .map_err(CourtError::Database)?;
        with_venues.push(CourtWithVenue {
            court: Court::from(db_court),
            venue: db_venue.map(Venue::from),
        });
    }

    // Optional city post-filter on the attached venue
    if let Some(city) = &query.city {
        with_venues.retain(|c| {
            c.venue
                .as_ref()
                .map(|v| &v.city == city)
                .unwrap_or(false)
        });
    }

    Ok(Json(with_venues))
}

#[axum::debug_handler]
pub async fn get_court(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<CourtDetailsResponse>>, AppError> {
    let db_court = court::get_court_by_id(&state.db_pool, id)
        .await
        .map_err(CourtError::Database)?;

    // Inactive courts read as absent
    let Some(db_court) = db_court.filter(|c| c.is_active) else {
        return Ok(Json(None));
    };

    let db_venue = venue::get_venue_by_id(&state.db_pool, db_court.venue_id)
        .await
        .map_err(CourtError::Database)?;

    let court = Court::from(db_court);
    let image_urls = media::object_urls(&state.media_base_url, &court.images);

    Ok(Json(Some(CourtDetailsResponse {
        court,
        venue: db_venue.map(Venue::from),
        image_urls,
    })))
}

#[axum::debug_handler]
pub async fn update_court(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourtRequest>,
) -> Result<Json<Court>, AppError> {
    let db_court = court::get_court_by_id(&state.db_pool, id)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound(format!("Court with ID {} not found", id)))?;

    let db_venue = venue::get_venue_by_id(&state.db_pool, db_court.venue_id)
        .await
        .map_err(CourtError::Database)?;

    let authorized = db_venue.map(|v| v.owner_id == user_id).unwrap_or(false);
    if !authorized {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to manage this court".to_string(),
        )));
    }

    let patch = CourtPatch {
        name: payload.name,
        sport: payload.sport,
        surface: payload.surface,
        size: payload.size,
        capacity: payload.capacity,
        price_per_hour: payload.price_per_hour,
        amenities: payload.amenities,
        is_active: payload.is_active,
        description: payload.description,
    };

    let updated = court::update_court(&state.db_pool, id, &patch)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound(format!("Court with ID {} not found", id)))?;

    Ok(Json(Court::from(updated)))
}
