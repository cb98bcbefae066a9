use crate::models::DbCourt;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 20;

pub struct NewCourt<'a> {
    pub venue_id: Uuid,
    pub name: &'a str,
    pub sport: &'a str,
    pub surface: &'a str,
    pub size: Option<&'a str>,
    pub capacity: i32,
    pub price_per_hour: f64,
    pub amenities: &'a [String],
    pub description: Option<&'a str>,
}

/// Explicit optional-field patch for a court update. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct CourtPatch {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub surface: Option<String>,
    pub size: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_hour: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}

pub async fn create_court(pool: &Pool<Postgres>, new: NewCourt<'_>) -> Result<DbCourt> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating court: id={}, venue_id={}", id, new.venue_id);

    let court = sqlx::query_as::<_, DbCourt>(
        r#"
        INSERT INTO courts
            (id, venue_id, name, sport, surface, size, capacity,
             price_per_hour, images, amenities, is_active, description,
             created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '{}', $9, TRUE, $10, $11)
        RETURNING id, venue_id, name, sport, surface, size, capacity,
                  price_per_hour, images, amenities, is_active, description,
                  created_at
        "#,
    )
    .bind(id)
    .bind(new.venue_id)
    .bind(new.name)
    .bind(new.sport)
    .bind(new.surface)
    .bind(new.size)
    .bind(new.capacity)
    .bind(new.price_per_hour)
    .bind(new.amenities)
    .bind(new.description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(court)
}

pub async fn get_court_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbCourt>> {
    let court = sqlx::query_as::<_, DbCourt>(
        r#"
        SELECT id, venue_id, name, sport, surface, size, capacity,
               price_per_hour, images, amenities, is_active, description,
               created_at
        FROM courts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(court)
}

pub async fn get_courts_by_venue(pool: &Pool<Postgres>, venue_id: Uuid) -> Result<Vec<DbCourt>> {
    let courts = sqlx::query_as::<_, DbCourt>(
        r#"
        SELECT id, venue_id, name, sport, surface, size, capacity,
               price_per_hour, images, amenities, is_active, description,
               created_at
        FROM courts
        WHERE venue_id = $1 AND is_active = TRUE
        ORDER BY created_at ASC
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    Ok(courts)
}

pub async fn get_courts_by_sport(
    pool: &Pool<Postgres>,
    sport: &str,
    limit: Option<i64>,
) -> Result<Vec<DbCourt>> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let courts = sqlx::query_as::<_, DbCourt>(
        r#"
        SELECT id, venue_id, name, sport, surface, size, capacity,
               price_per_hour, images, amenities, is_active, description,
               created_at
        FROM courts
        WHERE sport = $1 AND is_active = TRUE
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(sport)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(courts)
}

/// Venue ids that have at least one active court for the given sport. Used
/// by venue search to apply its sport filter.
pub async fn venue_ids_with_sport(pool: &Pool<Postgres>, sport: &str) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT venue_id
        FROM courts
        WHERE sport = $1 AND is_active = TRUE
        "#,
    )
    .bind(sport)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn update_court(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &CourtPatch,
) -> Result<Option<DbCourt>> {
    tracing::debug!("Updating court: id={}", id);

    let court = sqlx::query_as::<_, DbCourt>(
        r#"
        UPDATE courts
        SET name = COALESCE($2, name),
            sport = COALESCE($3, sport),
            surface = COALESCE($4, surface),
            size = COALESCE($5, size),
            capacity = COALESCE($6, capacity),
            price_per_hour = COALESCE($7, price_per_hour),
            amenities = COALESCE($8, amenities),
            is_active = COALESCE($9, is_active),
            description = COALESCE($10, description)
        WHERE id = $1
        RETURNING id, venue_id, name, sport, surface, size, capacity,
                  price_per_hour, images, amenities, is_active, description,
                  created_at
        "#,
    )
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.sport.as_deref())
    .bind(patch.surface.as_deref())
    .bind(patch.size.as_deref())
    .bind(patch.capacity)
    .bind(patch.price_per_hour)
    .bind(patch.amenities.as_deref())
    .bind(patch.is_active)
    .bind(patch.description.as_deref())
    .fetch_optional(pool)
    .await?;

    Ok(court)
}
