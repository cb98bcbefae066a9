//! # Booking Handlers
//!
//! Booking creation is the core consistency operation of the service. The
//! conflict rule is a point check on the exact (court, date, time_slot)
//! triple: a booking whose duration spills past its own slot does not block
//! the triples it spills into. The check-then-insert sequence is backed by a
//! partial unique index in the storage layer, so two racing requests for the
//! same triple resolve first-committer-wins and the loser receives a
//! conflict error.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use courtbook_core::{
    errors::CourtError,
    models::{
        booking::{
            Booking, BookingStatus, BookingWithDetails, CancelBookingRequest,
            CancelBookingResponse, CreateBookingRequest, CreateBookingResponse,
            UserBookingsQuery, VenueBookingsQuery,
        },
        court::Court,
        venue::Venue,
    },
    scheduling,
};
use courtbook_db::repositories::{
    booking::{self, NewBooking},
    court, venue,
};

use crate::{
    middleware::{
        auth::{CurrentUser, MaybeUser},
        error_handling::AppError,
    },
    ApiState,
};

/// Creates a booking for a slot triple.
///
/// # Endpoint
///
/// ```text
/// POST /api/bookings
/// ```
///
/// The booking is auto-confirmed with payment pending. Total price comes
/// from the court's base hourly price; per-slot price overrides are not
/// consulted.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    if payload.players.is_empty() {
        return Err(AppError(CourtError::Validation(
            "At least one player is required".to_string(),
        )));
    }

    // Court and venue must exist and be active
    let db_court = court::get_court_by_id(&state.db_pool, payload.court_id)
        .await
        .map_err(CourtError::Database)?
        .filter(|c| c.is_active)
        .ok_or_else(|| CourtError::NotFound("Court not found or inactive".to_string()))?;

    venue::get_venue_by_id(&state.db_pool, db_court.venue_id)
        .await
        .map_err(CourtError::Database)?
        .filter(|v| v.is_active)
        .ok_or_else(|| CourtError::NotFound("Venue not found or inactive".to_string()))?;

    // Advisory conflict check for a friendly error; the partial unique
    // index arbitrates actual races at insert time
    let existing = booking::find_active_booking(
        &state.db_pool,
        payload.court_id,
        payload.date,
        &payload.time_slot,
    )
    .await
    .map_err(CourtError::Database)?;

    if existing.is_some() {
        return Err(AppError(CourtError::Conflict(
            "Time slot already booked".to_string(),
        )));
    }

    let end_time = scheduling::end_time(&payload.time_slot, payload.duration)?;
    let total_price = scheduling::total_price(db_court.price_per_hour, payload.duration);

    let now = Utc::now();
    let qr_code = scheduling::booking_code(db_court.id, now);

    let inserted = booking::insert_booking(
        &state.db_pool,
        NewBooking {
            user_id,
            court_id: db_court.id,
            venue_id: db_court.venue_id,
            date: payload.date,
            time_slot: &payload.time_slot,
            duration: payload.duration,
            end_time: &end_time,
            total_price,
            players: &payload.players,
            notes: payload.notes.as_deref(),
            qr_code: &qr_code,
        },
    )
    .await
    .map_err(CourtError::Database)?
    // A concurrent writer committed the triple between check and insert
    .ok_or_else(|| CourtError::Conflict("Time slot already booked".to_string()))?;

    Ok(Json(CreateBookingResponse {
        id: inserted.id,
        qr_code: inserted.qr_code,
    }))
}

/// Lists the caller's bookings, newest first, with court and venue details.
/// Anonymous callers get an empty list.
#[axum::debug_handler]
pub async fn get_user_bookings(
    State(state): State<Arc<ApiState>>,
    MaybeUser(user_id): MaybeUser,
    Query(query): Query<UserBookingsQuery>,
) -> Result<Json<Vec<BookingWithDetails>>, AppError> {
    let Some(user_id) = user_id else {
        return Ok(Json(Vec::new()));
    };

    let bookings = booking::get_user_bookings(&state.db_pool, user_id, query.status, query.limit)
        .await
        .map_err(CourtError::Database)?;

    let mut detailed = Vec::with_capacity(bookings.len());
    for row in bookings {
        detailed.push(attach_details(&state, row).await?);
    }

    Ok(Json(detailed))
}

/// Fetches one booking with details. Readable only by the booking's owner
/// or the owner of its venue.
#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<BookingWithDetails>>, AppError> {
    let Some(row) = booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(CourtError::Database)?
    else {
        return Ok(Json(None));
    };

    let db_venue = venue::get_venue_by_id(&state.db_pool, row.venue_id)
        .await
        .map_err(CourtError::Database)?;

    let venue_owner = db_venue.as_ref().map(|v| v.owner_id);
    if row.user_id != user_id && venue_owner != Some(user_id) {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to view this booking".to_string(),
        )));
    }

    let db_court = court::get_court_by_id(&state.db_pool, row.court_id)
        .await
        .map_err(CourtError::Database)?;

    Ok(Json(Some(BookingWithDetails {
        booking: Booking::try_from(row)?,
        court: db_court.map(Court::from),
        venue: db_venue.map(Venue::from),
    })))
}

/// Cancels a booking.
///
/// # Endpoint
///
/// ```text
/// POST /api/bookings/:id/cancel
/// ```
///
/// Only the booking's owner may cancel, only while the booking is not
/// already cancelled, and only up to two hours before the start time (the
/// boundary is inclusive: exactly two hours ahead still passes). The stored
/// availability flag is untouched; the slot frees through the availability
/// query's overlay.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let row = booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound("Booking not found".to_string()))?;

    if row.user_id != user_id {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to cancel this booking".to_string(),
        )));
    }

    if row.status == BookingStatus::Cancelled.as_str() {
        return Err(AppError(CourtError::Conflict(
            "Booking already cancelled".to_string(),
        )));
    }

    let start = scheduling::booking_start(row.date, &row.time_slot)?;
    let now = Utc::now();
    if !scheduling::cancellation_allowed(now, start) {
        return Err(AppError(CourtError::Policy(
            "Cannot cancel booking less than 2 hours before start time".to_string(),
        )));
    }

    let cancelled = booking::cancel_booking(&state.db_pool, id, payload.reason.as_deref(), now)
        .await
        .map_err(CourtError::Database)?
        .ok_or_else(|| CourtError::NotFound("Booking not found".to_string()))?;

    Ok(Json(CancelBookingResponse { id: cancelled.id }))
}

/// Owner dashboard: bookings for one of the caller's venues, newest first.
/// When no venue id is given, the caller's first venue is used.
#[axum::debug_handler]
pub async fn get_venue_bookings(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<VenueBookingsQuery>,
) -> Result<Json<Vec<BookingWithDetails>>, AppError> {
    let venue_id = match query.venue_id {
        Some(venue_id) => {
            let db_venue = venue::get_venue_by_id(&state.db_pool, venue_id)
                .await
                .map_err(CourtError::Database)?;

            let authorized = db_venue.map(|v| v.owner_id == user_id).unwrap_or(false);
            if !authorized {
                return Err(AppError(CourtError::Authorization(
                    "Not authorized to view bookings for this venue".to_string(),
                )));
            }
            venue_id
        }
        None => {
            let venues = venue::get_venues_by_owner(&state.db_pool, user_id)
                .await
                .map_err(CourtError::Database)?;
            match venues.first() {
                Some(first) => first.id,
                None => return Ok(Json(Vec::new())),
            }
        }
    };

    let bookings =
        booking::get_venue_bookings(&state.db_pool, venue_id, query.date, query.status)
            .await
            .map_err(CourtError::Database)?;

    let mut detailed = Vec::with_capacity(bookings.len());
    for row in bookings {
        let db_court = court::get_court_by_id(&state.db_pool, row.court_id)
            .await
            .map_err(CourtError::Database)?;
        detailed.push(BookingWithDetails {
            booking: Booking::try_from(row)?,
            court: db_court.map(Court::from),
            venue: None,
        });
    }

    Ok(Json(detailed))
}

async fn attach_details(
    state: &ApiState,
    row: courtbook_db::models::DbBooking,
) -> Result<BookingWithDetails, AppError> {
    let db_court = court::get_court_by_id(&state.db_pool, row.court_id)
        .await
        .map_err(CourtError::Database)?;
    let db_venue = venue::get_venue_by_id(&state.db_pool, row.venue_id)
        .await
        .map_err(CourtError::Database)?;

    Ok(BookingWithDetails {
        booking: Booking::try_from(row)?,
        court: db_court.map(Court::from),
        venue: db_venue.map(Venue::from),
    })
}
