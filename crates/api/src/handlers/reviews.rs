//! # Review Handlers
//!
//! Review submission recomputes the venue's derived rating fields on every
//! insert: the mean of all ratings rounded to one decimal (half away from
//! zero) and the review count. The recomputation is a full scan of the
//! venue's reviews inside the insert transaction, so the derived fields can
//! never drift from the review set.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use courtbook_core::{
    errors::CourtError,
    models::{
        booking::BookingStatus,
        review::{
            CreateReviewRequest, CreateReviewResponse, Review, ReviewAuthor, ReviewWithAuthor,
            VenueReviewsQuery,
        },
    },
    scheduling,
};
use courtbook_db::repositories::{
    booking,
    review::{self, NewReview},
    user_profile,
};

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Submits a review for a venue.
///
/// # Endpoint
///
/// ```text
/// POST /api/venues/:id/reviews
/// ```
///
/// One review per (user, venue); the review is marked verified only when it
/// is linked to a completed booking owned by the caller.
#[axum::debug_handler]
pub async fn create_review(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user_id): CurrentUser,
    Path(venue_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<CreateReviewResponse>, AppError> {
    scheduling::validate_rating(payload.rating)?;

    // Advisory duplicate check for a friendly error; the unique pair
    // constraint arbitrates races at insert time
    let existing = review::find_by_user_and_venue(&state.db_pool, user_id, venue_id)
        .await
        .map_err(CourtError::Database)?;
    if existing.is_some() {
        return Err(AppError(CourtError::Conflict(
            "You have already reviewed this venue".to_string(),
        )));
    }

    // Verified only when the linked booking is the caller's and completed
    let mut is_verified = false;
    if let Some(booking_id) = payload.booking_id {
        let linked = booking::get_booking_by_id(&state.db_pool, booking_id)
            .await
            .map_err(CourtError::Database)?;
        is_verified = linked
            .map(|b| b.user_id == user_id && b.status == BookingStatus::Completed.as_str())
            .unwrap_or(false);
    }

    let created = review::create_review(
        &state.db_pool,
        NewReview {
            user_id,
            venue_id,
            booking_id: payload.booking_id,
            rating: payload.rating,
            comment: payload.comment.as_deref(),
            aspects: payload.aspects,
            is_verified,
        },
    )
    .await
    .map_err(CourtError::Database)?
    .ok_or_else(|| CourtError::Conflict("You have already reviewed this venue".to_string()))?;

    Ok(Json(CreateReviewResponse { id: created.id }))
}

/// Lists a venue's reviews, newest first, with the reviewer's name attached
/// when a profile exists.
#[axum::debug_handler]
pub async fn get_venue_reviews(
    State(state): State<Arc<ApiState>>,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<VenueReviewsQuery>,
) -> Result<Json<Vec<ReviewWithAuthor>>, AppError> {
    let reviews = review::get_venue_reviews(&state.db_pool, venue_id, query.limit)
        .await
        .map_err(CourtError::Database)?;

    let mut with_authors = Vec::with_capacity(reviews.len());
    for row in reviews {
        let profile = user_profile::get_profile_by_user_id(&state.db_pool, row.user_id)
            .await
            .map_err(CourtError::Database)?;

        with_authors.push(ReviewWithAuthor {
            review: Review::from(row),
            author: profile.map(|p| ReviewAuthor {
                first_name: p.first_name,
                last_name: p.last_name,
            }),
        });
    }

    Ok(Json(with_authors))
}
