use crate::models::DbBooking;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use courtbook_core::models::booking::{BookingStatus, PaymentStatus, Player};

const DEFAULT_USER_LIMIT: i64 = 20;
const VENUE_DASHBOARD_LIMIT: i64 = 50;

pub struct NewBooking<'a> {
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: &'a str,
    pub duration: i32,
    pub end_time: &'a str,
    pub total_price: f64,
    pub players: &'a [Player],
    pub notes: Option<&'a str>,
    pub qr_code: &'a str,
}

/// Inserts a booking in status `confirmed` / payment `pending`. Returns
/// `None` when a non-cancelled booking already holds the slot triple: the
/// partial unique index arbitrates racing writers, so the caller's earlier
/// conflict check stays advisory.
pub async fn insert_booking(
    pool: &Pool<Postgres>,
    new: NewBooking<'_>,
) -> Result<Option<DbBooking>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating booking: id={}, court_id={}, date={}, time_slot={}",
        id,
        new.court_id,
        new.date,
        new.time_slot
    );

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings
            (id, user_id, court_id, venue_id, date, time_slot, duration,
             end_time, total_price, status, payment_status, players, notes,
             qr_code, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15)
        ON CONFLICT (court_id, date, time_slot) WHERE status <> 'cancelled'
            DO NOTHING
        RETURNING id, user_id, court_id, venue_id, date, time_slot, duration,
                  end_time, total_price, status, payment_status,
                  payment_method, payment_id, players, notes, qr_code,
                  cancelled_at, cancellation_reason, refund_amount, created_at
        "#,
    )
    .bind(id)
    .bind(new.user_id)
    .bind(new.court_id)
    .bind(new.venue_id)
    .bind(new.date)
    .bind(new.time_slot)
    .bind(new.duration)
    .bind(new.end_time)
    .bind(new.total_price)
    .bind(BookingStatus::Confirmed.as_str())
    .bind(PaymentStatus::Pending.as_str())
    .bind(Json(new.players))
    .bind(new.notes)
    .bind(new.qr_code)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, user_id, court_id, venue_id, date, time_slot, duration,
               end_time, total_price, status, payment_status, payment_method,
               payment_id, players, notes, qr_code, cancelled_at,
               cancellation_reason, refund_amount, created_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// The non-cancelled booking holding the exact slot triple, if any. A point
/// read: a multi-hour booking starting earlier does not show up for the
/// triples it spills into.
pub async fn find_active_booking(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    date: NaiveDate,
    time_slot: &str,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, user_id, court_id, venue_id, date, time_slot, duration,
               end_time, total_price, status, payment_status, payment_method,
               payment_id, players, notes, qr_code, cancelled_at,
               cancellation_reason, refund_amount, created_at
        FROM bookings
        WHERE court_id = $1 AND date = $2 AND time_slot = $3
          AND status <> 'cancelled'
        "#,
    )
    .bind(court_id)
    .bind(date)
    .bind(time_slot)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Time slots on a court/date that are held by a non-cancelled booking.
/// Feeds the read-time overlay in the availability query.
pub async fn booked_time_slots(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<String>> {
    let slots = sqlx::query_scalar::<_, String>(
        r#"
        SELECT time_slot
        FROM bookings
        WHERE court_id = $1 AND date = $2 AND status <> 'cancelled'
        "#,
    )
    .bind(court_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_user_bookings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    status: Option<BookingStatus>,
    limit: Option<i64>,
) -> Result<Vec<DbBooking>> {
    let limit = limit.unwrap_or(DEFAULT_USER_LIMIT);

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, user_id, court_id, venue_id, date, time_slot, duration,
               end_time, total_price, status, payment_status, payment_method,
               payment_id, players, notes, qr_code, cancelled_at,
               cancellation_reason, refund_amount, created_at
        FROM bookings
        WHERE user_id = $1
          AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_venue_bookings(
    pool: &Pool<Postgres>,
    venue_id: Uuid,
    date: Option<NaiveDate>,
    status: Option<BookingStatus>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, user_id, court_id, venue_id, date, time_slot, duration,
               end_time, total_price, status, payment_status, payment_method,
               payment_id, players, notes, qr_code, cancelled_at,
               cancellation_reason, refund_amount, created_at
        FROM bookings
        WHERE venue_id = $1
          AND ($2::date IS NULL OR date = $2)
          AND ($3::text IS NULL OR status = $3)
        ORDER BY created_at DESC
        LIMIT $4
        "#,
    )
    .bind(venue_id)
    .bind(date)
    .bind(status.map(|s| s.as_str()))
    .bind(VENUE_DASHBOARD_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Marks a booking cancelled with the cancellation metadata. The stored
/// availability flag is not touched; the slot frees up through the
/// read-time overlay.
pub async fn cancel_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    reason: Option<&str>,
    cancelled_at: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    tracing::debug!("Cancelling booking: id={}", id);

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = $2, cancelled_at = $3, cancellation_reason = $4
        WHERE id = $1
        RETURNING id, user_id, court_id, venue_id, date, time_slot, duration,
                  end_time, total_price, status, payment_status,
                  payment_method, payment_id, players, notes, qr_code,
                  cancelled_at, cancellation_reason, refund_amount, created_at
        "#,
    )
    .bind(id)
    .bind(BookingStatus::Cancelled.as_str())
    .bind(cancelled_at)
    .bind(reason)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}
