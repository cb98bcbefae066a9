//! # Availability Handlers
//!
//! Handlers for generating, querying, and updating court availability slots.
//!
//! ## Slot generation
//!
//! Bulk generation materializes the cross product of an inclusive date range
//! and a list of time-slot labels into slot rows, one per
//! (court, date, time_slot) triple. Generation is idempotent: a triple that
//! already has a slot is skipped silently, so owners can re-run generation
//! over overlapping ranges without duplicating or overwriting anything. The
//! skip is enforced by the unique triple constraint, not by a separate read,
//! so concurrent generation runs cannot double-insert.
//!
//! ## The availability query join
//!
//! A slot's stored `is_available` flag is only half the truth: bookings
//! never write back to the slot. The query handler overlays the slots with
//! the set of non-cancelled bookings for the same court and date and reports
//! `is_available = stored AND NOT booked`. A slot can therefore be stored as
//! available yet correctly read as unavailable while a live booking holds
//! its time slot, and it frees up again the moment that booking is
//! cancelled.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use courtbook_core::{
    errors::CourtError,
    models::availability::{
        AvailabilityQuery, AvailabilitySlot, GenerateAvailabilityRequest,
        GenerateAvailabilityResponse, UpdateAvailabilityRequest, UpdateAvailabilityResponse,
    },
    scheduling,
};
use courtbook_db::repositories::{
    availability::{self, AvailabilityPatch},
    booking, court, venue,
};

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Verifies that `user_id` owns the venue the court belongs to, returning
/// the court row on success. Shared by the owner-only availability
/// endpoints.
async fn authorize_court_owner(
    state: &ApiState,
    court_id: Uuid,
    user_id: Uuid,
) -> Result<courtbook_db::models::DbCourt, AppError> {
    let db_court = court::get_court_by_id(&state.db_pool, court_id)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound("Court not found".to_string()))?;

    let db_venue = venue::get_venue_by_id(&state.db_pool, db_court.venue_id)
        .await
        .map_err(CourtError::Database)?;

    let authorized = db_venue.map(|v| v.owner_id == user_id).unwrap_or(false);
    if !authorized {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to manage this court".to_string(),
        )));
    }

    Ok(db_court)
}

/// Bulk-creates availability slots for a court over a date range.
///
/// # Endpoint
///
/// ```text
/// POST /api/courts/:id/availability
/// ```
///
/// Returns the ids of newly created slots; triples that already existed are
/// skipped and do not appear in the response.
#[axum::debug_handler]
pub async fn generate_availability(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(court_id): Path<Uuid>,
    Json(payload): Json<GenerateAvailabilityRequest>,
) -> Result<Json<GenerateAvailabilityResponse>, AppError> {
    let db_court = authorize_court_owner(&state, court_id, user_id).await?;

    // Created slots take the court's base price scaled by duration
    let price = scheduling::total_price(db_court.price_per_hour, payload.duration);

    let mut created = Vec::new();
    for date in scheduling::date_range(payload.start_date, payload.end_date) {
        for time_slot in &payload.time_slots {
            let inserted = availability::insert_slot_if_absent(
                &state.db_pool,
                court_id,
                date,
                time_slot,
                payload.duration,
                price,
            )
            .await
            .map_err(CourtError::Database)?;

            if let Some(slot) = inserted {
                created.push(slot.id);
            }
        }
    }

    Ok(Json(GenerateAvailabilityResponse { created }))
}

/// Returns a court's slots for one date with `is_available` recomputed
/// against live bookings.
///
/// # Endpoint
///
/// ```text
/// GET /api/courts/:id/availability?date=YYYY-MM-DD
/// ```
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(court_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    let slots = availability::get_slots_by_court_and_date(&state.db_pool, court_id, query.date)
        .await
        .map_err(CourtError::Database)?;

    let booked: HashSet<String> = booking::booked_time_slots(&state.db_pool, court_id, query.date)
        .await
        .map_err(CourtError::Database)?
        .into_iter()
        .collect();

    let slots = slots.into_iter().map(AvailabilitySlot::from).collect();

    Ok(Json(scheduling::overlay_bookings(slots, &booked)))
}

/// Patches a slot's flag, price, or special offer. Only provided fields are
/// merged.
///
/// # Endpoint
///
/// ```text
/// PUT /api/availability/:id
/// ```
#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(slot_id): Path<Uuid>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<UpdateAvailabilityResponse>, AppError> {
    let slot = availability::get_slot_by_id(&state.db_pool, slot_id)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound("Availability slot not found".to_string()))?;

    authorize_court_owner(&state, slot.court_id, user_id).await?;

    let patch = AvailabilityPatch {
        is_available: payload.is_available,
        price: payload.price,
        special_offer: payload.special_offer,
    };

    let updated = availability::update_slot(&state.db_pool, slot_id, &patch)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound("Availability slot not found".to_string()))?;

    Ok(Json(UpdateAvailabilityResponse { id: updated.id }))
}
