use chrono::Utc;
use uuid::Uuid;

use courtbook_api::middleware::error_handling::AppError;
use courtbook_core::{
    errors::CourtError,
    models::{
        booking::BookingStatus,
        review::{CreateReviewRequest, CreateReviewResponse, ReviewAspects},
    },
    scheduling,
};
use courtbook_db::models::DbReview;

use crate::test_utils::{sample_db_booking, TestContext};

fn review_request(rating: f64, booking_id: Option<Uuid>) -> CreateReviewRequest {
    CreateReviewRequest {
        booking_id,
        rating,
        comment: Some("Great courts".to_string()),
        aspects: ReviewAspects {
            cleanliness: 5.0,
            facilities: 4.0,
            staff: 4.5,
            value: 4.0,
        },
    }
}

fn db_review(user_id: Uuid, venue_id: Uuid, rating: f64, is_verified: bool) -> DbReview {
    DbReview {
        id: Uuid::new_v4(),
        user_id,
        venue_id,
        booking_id: None,
        rating,
        comment: None,
        cleanliness: 5.0,
        facilities: 4.0,
        staff: 4.5,
        value: 4.0,
        is_verified,
        created_at: Utc::now(),
    }
}

// Mirrors the review submission flow: rating validation, the duplicate
// check, verified-flag derivation from the linked booking, the
// conflict-arbitrated insert, then the rating recomputation from a full
// scan of the venue's reviews.
async fn test_create_review_wrapper(
    ctx: &TestContext,
    user_id: Uuid,
    venue_id: Uuid,
    request: CreateReviewRequest,
) -> Result<CreateReviewResponse, AppError> {
    scheduling::validate_rating(request.rating)?;

    let existing = ctx
        .review_repo
        .find_by_user_and_venue(user_id, venue_id)
        .await?;
    if existing.is_some() {
        return Err(AppError(CourtError::Conflict(
            "You have already reviewed this venue".to_string(),
        )));
    }

    let mut is_verified = false;
    if let Some(booking_id) = request.booking_id {
        let linked = ctx.booking_repo.get_booking_by_id(booking_id).await?;
        is_verified = linked
            .map(|b| b.user_id == user_id && b.status == BookingStatus::Completed.as_str())
            .unwrap_or(false);
    }

    let created = ctx
        .review_repo
        .create_review_row(
            user_id,
            venue_id,
            request.booking_id,
            request.rating,
            request.aspects,
            is_verified,
        )
        .await?
        .ok_or_else(|| CourtError::Conflict("You have already reviewed this venue".to_string()))?;

    let reviews = ctx.review_repo.get_venue_reviews(venue_id, None).await?;
    let ratings: Vec<f64> = reviews.iter().map(|r| r.rating).collect();
    if let Some((rating, review_count)) = scheduling::aggregate_rating(&ratings) {
        ctx.venue_repo
            .set_rating(venue_id, rating, review_count)
            .await?;
    }

    Ok(CreateReviewResponse { id: created.id })
}

#[tokio::test]
async fn test_create_review_success() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.review_repo
        .expect_find_by_user_and_venue()
        .returning(|_, _| Ok(None));

    ctx.review_repo
        .expect_create_review_row()
        .withf(|_, _, _, rating, _, is_verified| *rating == 4.5 && !is_verified)
        .returning(|user_id, venue_id, _, rating, _, is_verified| {
            Ok(Some(db_review(user_id, venue_id, rating, is_verified)))
        });

    ctx.review_repo
        .expect_get_venue_reviews()
        .returning(|venue_id, _| Ok(vec![db_review(Uuid::new_v4(), venue_id, 4.5, false)]));
    ctx.venue_repo
        .expect_set_rating()
        .withf(|_, rating, count| *rating == 4.5 && *count == 1)
        .returning(|_, _, _| Ok(()));

    let result =
        test_create_review_wrapper(&ctx, user_id, venue_id, review_request(4.5, None)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_review_rejects_out_of_range_rating() {
    let ctx = TestContext::new();

    let result = test_create_review_wrapper(
        &ctx,
        Uuid::new_v4(),
        Uuid::new_v4(),
        review_request(5.5, None),
    )
    .await;

    match result.unwrap_err().0 {
        CourtError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_review_rejects_duplicate() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.review_repo
        .expect_find_by_user_and_venue()
        .returning(|user_id, venue_id| Ok(Some(db_review(user_id, venue_id, 4.0, false))));

    let result =
        test_create_review_wrapper(&ctx, user_id, venue_id, review_request(4.0, None)).await;

    match result.unwrap_err().0 {
        CourtError::Conflict(_) => {}
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_review_verified_when_linked_to_own_completed_booking() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    ctx.review_repo
        .expect_find_by_user_and_venue()
        .returning(|_, _| Ok(None));

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| {
            Ok(Some(sample_db_booking(
                user_id,
                Uuid::new_v4(),
                venue_id,
                chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                "18:00",
                1,
                BookingStatus::Completed,
            )))
        });

    ctx.review_repo
        .expect_create_review_row()
        .withf(|_, _, _, _, _, is_verified| *is_verified)
        .returning(|user_id, venue_id, _, rating, _, is_verified| {
            Ok(Some(db_review(user_id, venue_id, rating, is_verified)))
        });

    ctx.review_repo
        .expect_get_venue_reviews()
        .returning(|venue_id, _| Ok(vec![db_review(Uuid::new_v4(), venue_id, 5.0, true)]));
    ctx.venue_repo
        .expect_set_rating()
        .returning(|_, _, _| Ok(()));

    let result =
        test_create_review_wrapper(&ctx, user_id, venue_id, review_request(5.0, Some(booking_id)))
            .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_review_not_verified_for_other_users_booking() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    ctx.review_repo
        .expect_find_by_user_and_venue()
        .returning(|_, _| Ok(None));

    // Completed booking, but owned by someone else
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| {
            Ok(Some(sample_db_booking(
                Uuid::new_v4(),
                Uuid::new_v4(),
                venue_id,
                chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                "18:00",
                1,
                BookingStatus::Completed,
            )))
        });

    ctx.review_repo
        .expect_create_review_row()
        .withf(|_, _, _, _, _, is_verified| !is_verified)
        .returning(|user_id, venue_id, _, rating, _, is_verified| {
            Ok(Some(db_review(user_id, venue_id, rating, is_verified)))
        });

    ctx.review_repo
        .expect_get_venue_reviews()
        .returning(|venue_id, _| Ok(vec![db_review(Uuid::new_v4(), venue_id, 3.0, false)]));
    ctx.venue_repo
        .expect_set_rating()
        .returning(|_, _, _| Ok(()));

    let result =
        test_create_review_wrapper(&ctx, user_id, venue_id, review_request(3.0, Some(booking_id)))
            .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_review_insert_recomputes_venue_rating() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.review_repo
        .expect_find_by_user_and_venue()
        .returning(|_, _| Ok(None));
    ctx.review_repo
        .expect_create_review_row()
        .returning(|user_id, venue_id, _, rating, _, is_verified| {
            Ok(Some(db_review(user_id, venue_id, rating, is_verified)))
        });

    // Post-insert scan of the venue's reviews, new rating included
    ctx.review_repo
        .expect_get_venue_reviews()
        .returning(|venue_id, _| {
            Ok([5.0, 4.0, 5.0, 3.0]
                .into_iter()
                .map(|rating| db_review(Uuid::new_v4(), venue_id, rating, false))
                .collect())
        });

    // The rounded mean and the count land on the venue row
    ctx.venue_repo
        .expect_set_rating()
        .withf(|_, rating, count| *rating == 4.3 && *count == 4)
        .returning(|_, _, _| Ok(()));

    let result =
        test_create_review_wrapper(&ctx, user_id, venue_id, review_request(3.0, None)).await;

    assert!(result.is_ok());
}
