use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use courtbook_api::middleware::error_handling::AppError;
use courtbook_core::{
    errors::CourtError,
    models::booking::{
        BookingStatus, CancelBookingResponse, CreateBookingRequest, CreateBookingResponse, Player,
    },
    scheduling,
};

use crate::test_utils::{sample_db_booking, sample_db_court, sample_db_venue, TestContext};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn player(name: &str) -> Player {
    Player {
        name: name.to_string(),
        phone: None,
        is_registered: false,
        user_id: None,
    }
}

fn booking_request(court_id: Uuid, time_slot: &str, duration: i32) -> CreateBookingRequest {
    CreateBookingRequest {
        court_id,
        date: date(2025, 6, 15),
        time_slot: time_slot.to_string(),
        duration,
        players: vec![player("Youssef")],
        notes: None,
    }
}

// Mirrors the create-booking flow against the mock repositories: existence
// and active checks, the advisory conflict read, then the conflict-arbitrated
// insert.
async fn test_create_booking_wrapper(
    ctx: &TestContext,
    user_id: Uuid,
    request: CreateBookingRequest,
) -> Result<CreateBookingResponse, AppError> {
    if request.players.is_empty() {
        return Err(AppError(CourtError::Validation(
            "At least one player is required".to_string(),
        )));
    }

    let court = ctx
        .court_repo
        .get_court_by_id(request.court_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| CourtError::NotFound("Court not found or inactive".to_string()))?;

    ctx.venue_repo
        .get_venue_by_id(court.venue_id)
        .await?
        .filter(|v| v.is_active)
        .ok_or_else(|| CourtError::NotFound("Venue not found or inactive".to_string()))?;

    // Mock signatures take static strs
    let time_slot: &'static str = Box::leak(request.time_slot.clone().into_boxed_str());

    let existing = ctx
        .booking_repo
        .find_active_booking(request.court_id, request.date, time_slot)
        .await?;
    if existing.is_some() {
        return Err(AppError(CourtError::Conflict(
            "Time slot already booked".to_string(),
        )));
    }

    let inserted = ctx
        .booking_repo
        .insert_booking_row(
            user_id,
            request.court_id,
            request.date,
            time_slot,
            request.duration,
            request.players.clone(),
        )
        .await?
        .ok_or_else(|| CourtError::Conflict("Time slot already booked".to_string()))?;

    Ok(CreateBookingResponse {
        id: inserted.id,
        qr_code: inserted.qr_code,
    })
}

// Mirrors the cancellation flow: ownership, status, then the lead-time
// policy with an injected clock.
async fn test_cancel_booking_wrapper(
    ctx: &TestContext,
    user_id: Uuid,
    booking_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CancelBookingResponse, AppError> {
    let row = ctx
        .booking_repo
        .get_booking_by_id(booking_id)
        .await?
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
    if !scheduling::cancellation_allowed(now, start) {
        return Err(AppError(CourtError::Policy(
            "Cannot cancel booking less than 2 hours before start time".to_string(),
        )));
    }

    let cancelled = ctx
        .booking_repo
        .cancel_booking(booking_id, None, now)
        .await?
        .ok_or_else(|| CourtError::NotFound("Booking not found".to_string()))?;

    Ok(CancelBookingResponse { id: cancelled.id })
}

fn setup_active_court(ctx: &mut TestContext, venue_id: Uuid) {
    let owner_id = Uuid::new_v4();
    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |id| Ok(Some(sample_db_court(id, venue_id, 200.0))));
    ctx.venue_repo
        .expect_get_venue_by_id()
        .returning(move |id| Ok(Some(sample_db_venue(id, owner_id))));
}

#[tokio::test]
async fn test_create_booking_success() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    setup_active_court(&mut ctx, venue_id);

    ctx.booking_repo
        .expect_find_active_booking()
        .returning(|_, _, _| Ok(None));

    ctx.booking_repo
        .expect_insert_booking_row()
        .returning(move |user_id, court_id, date, time_slot, duration, _| {
            Ok(Some(sample_db_booking(
                user_id,
                court_id,
                venue_id,
                date,
                time_slot,
                duration,
                BookingStatus::Confirmed,
            )))
        });

    let result =
        test_create_booking_wrapper(&ctx, user_id, booking_request(court_id, "18:00", 2)).await;

    let response = result.unwrap();
    assert!(response.qr_code.starts_with("CBK-"));
    assert!(response.qr_code.ends_with(&court_id.to_string()));
}

#[tokio::test]
async fn test_create_booking_requires_players() {
    let ctx = TestContext::new();
    let court_id = Uuid::new_v4();

    let mut request = booking_request(court_id, "18:00", 1);
    request.players.clear();

    let result = test_create_booking_wrapper(&ctx, Uuid::new_v4(), request).await;

    match result.unwrap_err().0 {
        CourtError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_inactive_court_not_found() {
    let mut ctx = TestContext::new();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.court_repo.expect_get_court_by_id().returning(move |id| {
        let mut court = sample_db_court(id, venue_id, 200.0);
        court.is_active = false;
        Ok(Some(court))
    });

    let result =
        test_create_booking_wrapper(&ctx, Uuid::new_v4(), booking_request(court_id, "18:00", 1))
            .await;

    match result.unwrap_err().0 {
        CourtError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_conflict_when_slot_taken() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    setup_active_court(&mut ctx, venue_id);

    ctx.booking_repo
        .expect_find_active_booking()
        .returning(move |court_id, date, time_slot| {
            Ok(Some(sample_db_booking(
                Uuid::new_v4(),
                court_id,
                venue_id,
                date,
                time_slot,
                1,
                BookingStatus::Confirmed,
            )))
        });

    let result =
        test_create_booking_wrapper(&ctx, user_id, booking_request(court_id, "18:00", 1)).await;

    match result.unwrap_err().0 {
        CourtError::Conflict(_) => {}
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_conflict_when_race_lost() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    setup_active_court(&mut ctx, venue_id);

    // Advisory check sees a free slot, but a concurrent writer commits the
    // triple first and the guarded insert returns nothing
    ctx.booking_repo
        .expect_find_active_booking()
        .returning(|_, _, _| Ok(None));
    ctx.booking_repo
        .expect_insert_booking_row()
        .returning(|_, _, _, _, _, _| Ok(None));

    let result =
        test_create_booking_wrapper(&ctx, user_id, booking_request(court_id, "18:00", 1)).await;

    match result.unwrap_err().0 {
        CourtError::Conflict(_) => {}
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn two_hour_booking_does_not_block_adjacent_slot() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    setup_active_court(&mut ctx, venue_id);

    // A two-hour booking holds only its own (court, date, "09:00") triple;
    // the conflict rule is a point check, so "10:00" inside its span is
    // still free to book
    ctx.booking_repo
        .expect_find_active_booking()
        .returning(move |court_id, date, time_slot| {
            if time_slot == "09:00" {
                Ok(Some(sample_db_booking(
                    Uuid::new_v4(),
                    court_id,
                    venue_id,
                    date,
                    time_slot,
                    2,
                    BookingStatus::Confirmed,
                )))
            } else {
                Ok(None)
            }
        });

    ctx.booking_repo
        .expect_insert_booking_row()
        .returning(move |user_id, court_id, date, time_slot, duration, _| {
            Ok(Some(sample_db_booking(
                user_id,
                court_id,
                venue_id,
                date,
                time_slot,
                duration,
                BookingStatus::Confirmed,
            )))
        });

    let result =
        test_create_booking_wrapper(&ctx, user_id, booking_request(court_id, "10:00", 1)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cancel_booking_success() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    let booking = sample_db_booking(
        user_id,
        court_id,
        venue_id,
        date(2025, 6, 15),
        "18:00",
        1,
        BookingStatus::Confirmed,
    );
    let booking_id = booking.id;

    let lookup = booking.clone();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(lookup.clone())));

    ctx.booking_repo
        .expect_cancel_booking()
        .returning(move |_, _, cancelled_at| {
            let mut cancelled = booking.clone();
            cancelled.status = BookingStatus::Cancelled.as_str().to_string();
            cancelled.cancelled_at = Some(cancelled_at);
            Ok(Some(cancelled))
        });

    // Well before the window closes
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
    let result = test_cancel_booking_wrapper(&ctx, user_id, booking_id, now).await;

    assert_eq!(result.unwrap().id, booking_id);
}

#[tokio::test]
async fn test_cancel_booking_exactly_two_hours_ahead_allowed() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    let booking = sample_db_booking(
        user_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        date(2025, 6, 15),
        "18:00",
        1,
        BookingStatus::Confirmed,
    );
    let booking_id = booking.id;

    let lookup = booking.clone();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(lookup.clone())));
    ctx.booking_repo
        .expect_cancel_booking()
        .returning(move |_, _, _| Ok(Some(booking.clone())));

    // The boundary is inclusive: exactly 120 minutes ahead still passes
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 16, 0, 0).unwrap();
    let result = test_cancel_booking_wrapper(&ctx, user_id, booking_id, now).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cancel_booking_rejected_inside_window() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    let booking = sample_db_booking(
        user_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        date(2025, 6, 15),
        "18:00",
        1,
        BookingStatus::Confirmed,
    );
    let booking_id = booking.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(booking.clone())));

    // 90 minutes before start
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 16, 30, 0).unwrap();
    let result = test_cancel_booking_wrapper(&ctx, user_id, booking_id, now).await;

    match result.unwrap_err().0 {
        CourtError::Policy(_) => {}
        e => panic!("Expected Policy error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_cancel_booking_wrong_user() {
    let mut ctx = TestContext::new();

    let booking = sample_db_booking(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        date(2025, 6, 15),
        "18:00",
        1,
        BookingStatus::Confirmed,
    );
    let booking_id = booking.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(booking.clone())));

    let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
    let result = test_cancel_booking_wrapper(&ctx, Uuid::new_v4(), booking_id, now).await;

    match result.unwrap_err().0 {
        CourtError::Authorization(_) => {}
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_cancel_booking_already_cancelled() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    let booking = sample_db_booking(
        user_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        date(2025, 6, 15),
        "18:00",
        1,
        BookingStatus::Cancelled,
    );
    let booking_id = booking.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(booking.clone())));

    let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
    let result = test_cancel_booking_wrapper(&ctx, user_id, booking_id, now).await;

    match result.unwrap_err().0 {
        CourtError::Conflict(_) => {}
        e => panic!("Expected Conflict error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_cancel_booking_not_found() {
    let mut ctx = TestContext::new();

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(|_| Ok(None));

    let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
    let result = test_cancel_booking_wrapper(&ctx, Uuid::new_v4(), Uuid::new_v4(), now).await;

    match result.unwrap_err().0 {
        CourtError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}
