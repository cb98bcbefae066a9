use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

use courtbook_api::middleware::error_handling::AppError;
use courtbook_core::{
    errors::CourtError,
    models::availability::{
        AvailabilitySlot, GenerateAvailabilityRequest, GenerateAvailabilityResponse,
    },
    scheduling,
};

use crate::test_utils::{sample_db_court, sample_db_slot, sample_db_venue, TestContext};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Mirrors the slot-generation flow against the mock repositories: owner
// authorization, then the date-range × time-slot cross product with
// idempotent inserts.
async fn test_generate_availability_wrapper(
    ctx: &TestContext,
    court_id: Uuid,
    user_id: Uuid,
    request: GenerateAvailabilityRequest,
) -> Result<GenerateAvailabilityResponse, AppError> {
    let court = ctx
        .court_repo
        .get_court_by_id(court_id)
        .await?
        .ok_or_else(|| CourtError::NotFound("Court not found".to_string()))?;

    let venue = ctx.venue_repo.get_venue_by_id(court.venue_id).await?;
    let authorized = venue.map(|v| v.owner_id == user_id).unwrap_or(false);
    if !authorized {
        return Err(AppError(CourtError::Authorization(
            "Not authorized to manage this court".to_string(),
        )));
    }

    let price = scheduling::total_price(court.price_per_hour, request.duration);

    let mut created = Vec::new();
    for date in scheduling::date_range(request.start_date, request.end_date) {
        for time_slot in &request.time_slots {
            // Mock signatures take static strs
            let time_slot: &'static str = Box::leak(time_slot.clone().into_boxed_str());
            let inserted = ctx
                .availability_repo
                .insert_slot_if_absent(court_id, date, time_slot, request.duration, price)
                .await?;
            if let Some(slot) = inserted {
                created.push(slot.id);
            }
        }
    }

    Ok(GenerateAvailabilityResponse { created })
}

// Mirrors the availability query: stored slots overlaid with the live
// booking set.
async fn test_get_availability_wrapper(
    ctx: &TestContext,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<AvailabilitySlot>, AppError> {
    let slots = ctx
        .availability_repo
        .get_slots_by_court_and_date(court_id, date)
        .await?;

    let booked: HashSet<String> = ctx
        .booking_repo
        .booked_time_slots(court_id, date)
        .await?
        .into_iter()
        .collect();

    let slots = slots.into_iter().map(AvailabilitySlot::from).collect();
    Ok(scheduling::overlay_bookings(slots, &booked))
}

fn generate_request() -> GenerateAvailabilityRequest {
    GenerateAvailabilityRequest {
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 2),
        time_slots: vec!["09:00".to_string(), "10:00".to_string()],
        duration: 1,
    }
}

#[tokio::test]
async fn test_generate_availability_creates_cross_product() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |id| Ok(Some(sample_db_court(id, venue_id, 200.0))));
    ctx.venue_repo
        .expect_get_venue_by_id()
        .returning(move |id| Ok(Some(sample_db_venue(id, owner_id))));

    // 2 dates × 2 slots
    ctx.availability_repo
        .expect_insert_slot_if_absent()
        .times(4)
        .returning(|court_id, date, time_slot, _, _| {
            Ok(Some(sample_db_slot(court_id, date, time_slot)))
        });

    let result =
        test_generate_availability_wrapper(&ctx, court_id, owner_id, generate_request()).await;

    assert_eq!(result.unwrap().created.len(), 4);
}

#[tokio::test]
async fn test_generate_availability_skips_existing_triples() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |id| Ok(Some(sample_db_court(id, venue_id, 200.0))));
    ctx.venue_repo
        .expect_get_venue_by_id()
        .returning(move |id| Ok(Some(sample_db_venue(id, owner_id))));

    // Re-running generation over an already-covered range creates nothing
    ctx.availability_repo
        .expect_insert_slot_if_absent()
        .times(4)
        .returning(|_, _, _, _, _| Ok(None));

    let result =
        test_generate_availability_wrapper(&ctx, court_id, owner_id, generate_request()).await;

    assert!(result.unwrap().created.is_empty());
}

#[tokio::test]
async fn test_generate_availability_rejects_non_owner() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let court_id = Uuid::new_v4();
    let venue_id = Uuid::new_v4();

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(move |id| Ok(Some(sample_db_court(id, venue_id, 200.0))));
    ctx.venue_repo
        .expect_get_venue_by_id()
        .returning(move |id| Ok(Some(sample_db_venue(id, owner_id))));

    let result =
        test_generate_availability_wrapper(&ctx, court_id, Uuid::new_v4(), generate_request())
            .await;

    match result.unwrap_err().0 {
        CourtError::Authorization(_) => {}
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_generate_availability_court_not_found() {
    let mut ctx = TestContext::new();

    ctx.court_repo
        .expect_get_court_by_id()
        .returning(|_| Ok(None));

    let result =
        test_generate_availability_wrapper(&ctx, Uuid::new_v4(), Uuid::new_v4(), generate_request())
            .await;

    match result.unwrap_err().0 {
        CourtError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_availability_query_overlays_live_bookings() {
    let mut ctx = TestContext::new();
    let court_id = Uuid::new_v4();
    let day = date(2025, 6, 15);

    ctx.availability_repo
        .expect_get_slots_by_court_and_date()
        .returning(|court_id, date| {
            let mut disabled = sample_db_slot(court_id, date, "11:00");
            disabled.is_available = false;
            Ok(vec![
                sample_db_slot(court_id, date, "09:00"),
                sample_db_slot(court_id, date, "10:00"),
                disabled,
            ])
        });

    ctx.booking_repo
        .expect_booked_time_slots()
        .returning(|_, _| Ok(vec!["10:00".to_string()]));

    let slots = test_get_availability_wrapper(&ctx, court_id, day)
        .await
        .unwrap();

    assert_eq!(slots.len(), 3);
    // Free slot stays available
    assert!(slots[0].is_available);
    // Booked slot reads unavailable even though its stored flag is set
    assert!(!slots[1].is_available);
    // Owner-disabled slot stays unavailable with no booking
    assert!(!slots[2].is_available);
}

#[tokio::test]
async fn test_availability_query_frees_slot_after_cancellation() {
    let mut ctx = TestContext::new();
    let court_id = Uuid::new_v4();
    let day = date(2025, 6, 15);

    ctx.availability_repo
        .expect_get_slots_by_court_and_date()
        .returning(|court_id, date| Ok(vec![sample_db_slot(court_id, date, "10:00")]));

    // Cancelled bookings drop out of the booked set, so the slot reads
    // available again without any write to the slot row
    ctx.booking_repo
        .expect_booked_time_slots()
        .returning(|_, _| Ok(vec![]));

    let slots = test_get_availability_wrapper(&ctx, court_id, day)
        .await
        .unwrap();

    assert!(slots[0].is_available);
}
