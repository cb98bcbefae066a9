//! # Booking Rules
//!
//! Pure scheduling and pricing rules shared by the API handlers:
//!
//! - expansion of a date range × time-slot list into slot triples
//! - end-time and total-price computation for a booking
//! - the cancellation lead-time policy
//! - venue rating aggregation
//! - the read-time overlay of live bookings onto stored availability
//!
//! Everything here is deterministic and side-effect free; persistence and
//! conflict detection live in the `courtbook-db` repositories.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::errors::{CourtError, CourtResult};
use crate::models::availability::AvailabilitySlot;

/// Minimum lead time for a cancellation, in hours. The boundary is
/// inclusive: a cancellation exactly this far ahead of the start still
/// passes.
pub const CANCELLATION_WINDOW_HOURS: i64 = 2;

/// Parses the hour out of a "HH:00" slot label.
pub fn start_hour(time_slot: &str) -> CourtResult<u32> {
    let hour_part = time_slot
        .split(':')
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| CourtError::Validation(format!("Invalid time slot: {time_slot}")))?;

    hour_part
        .parse::<u32>()
        .map_err(|_| CourtError::Validation(format!("Invalid time slot: {time_slot}")))
}

/// Computes the end-time label for a booking: start hour + duration,
/// zero-padded "HH:00".
pub fn end_time(time_slot: &str, duration_hours: i32) -> CourtResult<String> {
    let start = start_hour(time_slot)?;
    let end = start as i64 + duration_hours as i64;
    Ok(format!("{end:02}:00"))
}

/// Total price for a booking. Deliberately uses the court's base hourly
/// price; per-slot price overrides are not consulted here.
pub fn total_price(price_per_hour: f64, duration_hours: i32) -> f64 {
    price_per_hour * duration_hours as f64
}

/// Every date in the inclusive range [start, end]. Empty when end < start.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}

/// The instant a booking starts. Slot labels carry no timezone; they are
/// interpreted as UTC wall-clock times.
pub fn booking_start(date: NaiveDate, time_slot: &str) -> CourtResult<DateTime<Utc>> {
    let hour = start_hour(time_slot)?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| CourtError::Validation(format!("Invalid time slot: {time_slot}")))?;
    Ok(date.and_time(time).and_utc())
}

/// Whether a booking starting at `start` may still be cancelled at `now`.
pub fn cancellation_allowed(now: DateTime<Utc>, start: DateTime<Utc>) -> bool {
    start - now >= Duration::hours(CANCELLATION_WINDOW_HOURS)
}

/// Rejects ratings outside [1, 5]. Fractional values inside the range are
/// accepted.
pub fn validate_rating(rating: f64) -> CourtResult<()> {
    if !(1.0..=5.0).contains(&rating) {
        return Err(CourtError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

/// Mean rating rounded to one decimal, half away from zero.
pub fn round_rating(mean: f64) -> f64 {
    (mean * 10.0).round() / 10.0
}

/// Aggregates a venue's review ratings into (rounded mean, count).
/// Returns `None` for an empty set: a venue with no reviews keeps its
/// previous derived values.
pub fn aggregate_rating(ratings: &[f64]) -> Option<(f64, i64)> {
    if ratings.is_empty() {
        return None;
    }
    let sum: f64 = ratings.iter().sum();
    let mean = sum / ratings.len() as f64;
    Some((round_rating(mean), ratings.len() as i64))
}

/// Display/lookup code stamped onto a booking. Embeds the creation instant
/// and the court id; not cryptographically secure and never used as a
/// capability.
pub fn booking_code(court_id: Uuid, created_at: DateTime<Utc>) -> String {
    format!("CBK-{}-{}", created_at.timestamp_millis(), court_id)
}

/// Overlays live bookings onto stored availability: a slot is effectively
/// available only when its stored flag is set and no non-cancelled booking
/// occupies the same time slot. The stored flag itself is left untouched.
pub fn overlay_bookings(
    slots: Vec<AvailabilitySlot>,
    booked_time_slots: &HashSet<String>,
) -> Vec<AvailabilitySlot> {
    slots
        .into_iter()
        .map(|slot| {
            let is_available = slot.is_available && !booked_time_slots.contains(&slot.time_slot);
            AvailabilitySlot {
                is_available,
                ..slot
            }
        })
        .collect()
}
