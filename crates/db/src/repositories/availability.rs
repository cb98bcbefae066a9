use crate::models::DbAvailabilitySlot;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use courtbook_core::models::availability::SpecialOffer;

/// Explicit optional-field patch for a slot update. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityPatch {
    pub is_available: Option<bool>,
    pub price: Option<f64>,
    pub special_offer: Option<SpecialOffer>,
}

/// Inserts a slot for the (court, date, time_slot) triple unless one already
/// exists. Returns `None` for the existing-triple case, which bulk
/// generation treats as a silent skip. The unique constraint makes this
/// idempotent under concurrent generation runs.
pub async fn insert_slot_if_absent(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    date: NaiveDate,
    time_slot: &str,
    duration: i32,
    price: f64,
) -> Result<Option<DbAvailabilitySlot>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        INSERT INTO availability
            (id, court_id, date, time_slot, duration, is_available, price,
             created_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7)
        ON CONFLICT (court_id, date, time_slot) DO NOTHING
        RETURNING id, court_id, date, time_slot, duration, is_available,
                  price, special_offer, created_at
        "#,
    )
    .bind(id)
    .bind(court_id)
    .bind(date)
    .bind(time_slot)
    .bind(duration)
    .bind(price)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAvailabilitySlot>> {
    let slot = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, court_id, date, time_slot, duration, is_available, price,
               special_offer, created_at
        FROM availability
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_court_and_date(
    pool: &Pool<Postgres>,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbAvailabilitySlot>> {
    let slots = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, court_id, date, time_slot, duration, is_available, price,
               special_offer, created_at
        FROM availability
        WHERE court_id = $1 AND date = $2
        ORDER BY time_slot ASC
        "#,
    )
    .bind(court_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn update_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &AvailabilityPatch,
) -> Result<Option<DbAvailabilitySlot>> {
    tracing::debug!("Updating availability slot: id={}", id);

    let slot = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        UPDATE availability
        SET is_available = COALESCE($2, is_available),
            price = COALESCE($3, price),
            special_offer = COALESCE($4, special_offer)
        WHERE id = $1
        RETURNING id, court_id, date, time_slot, duration, is_available,
                  price, special_offer, created_at
        "#,
    )
    .bind(id)
    .bind(patch.is_available)
    .bind(patch.price)
    .bind(patch.special_offer.as_ref().map(Json))
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}
