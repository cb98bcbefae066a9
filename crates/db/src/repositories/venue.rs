use crate::models::DbVenue;
use chrono::Utc;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use courtbook_core::models::venue::{Coordinates, OpeningHours};

const DEFAULT_LIST_LIMIT: i64 = 20;

pub struct NewVenue<'a> {
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub region: &'a str,
    pub coordinates: Coordinates,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub amenities: &'a [String],
    pub opening_hours: &'a OpeningHours,
}

/// Explicit optional-field patch for a venue update. `None` fields are left
/// untouched. Rating and review_count are deliberately absent: those derived
/// fields are only written by `set_rating`.
#[derive(Debug, Clone, Default)]
pub struct VenuePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub opening_hours: Option<OpeningHours>,
    pub is_active: Option<bool>,
}

pub async fn create_venue(pool: &Pool<Postgres>, new: NewVenue<'_>) -> Result<DbVenue> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating venue: id={}, owner_id={}", id, new.owner_id);

    let venue = sqlx::query_as::<_, DbVenue>(
        r#"
        INSERT INTO venues
            (id, owner_id, name, description, address, city, region, lat, lng,
             phone, email, website, images, amenities, opening_hours,
             is_active, is_verified, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, '{}', $13,
                $14, TRUE, FALSE, $15)
        RETURNING id, owner_id, name, description, address, city, region, lat,
                  lng, phone, email, website, images, amenities, opening_hours,
                  rating, review_count, is_active, is_verified, created_at
        "#,
    )
    .bind(id)
    .bind(new.owner_id)
    .bind(new.name)
    .bind(new.description)
    .bind(new.address)
    .bind(new.city)
    .bind(new.region)
    .bind(new.coordinates.lat)
    .bind(new.coordinates.lng)
    .bind(new.phone)
    .bind(new.email)
    .bind(new.website)
    .bind(new.amenities)
    .bind(Json(new.opening_hours))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(venue)
}

pub async fn get_venue_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbVenue>> {
    let venue = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, name, description, address, city, region, lat,
               lng, phone, email, website, images, amenities, opening_hours,
               rating, review_count, is_active, is_verified, created_at
        FROM venues
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(venue)
}

/// Active venues, optionally narrowed to a city or region (exact match).
pub async fn list_venues(
    pool: &Pool<Postgres>,
    city: Option<&str>,
    region: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<DbVenue>> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let venues = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, name, description, address, city, region, lat,
               lng, phone, email, website, images, amenities, opening_hours,
               rating, review_count, is_active, is_verified, created_at
        FROM venues
        WHERE is_active = TRUE
          AND ($1::text IS NULL OR city = $1)
          AND ($2::text IS NULL OR region = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(city)
    .bind(region)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(venues)
}

// LIKE metacharacters in user input must match literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Name search with equality co-filters. Case-insensitive substring match
/// stands in for the managed search index of the original backend.
pub async fn search_venues(
    pool: &Pool<Postgres>,
    search_term: Option<&str>,
    city: Option<&str>,
    region: Option<&str>,
) -> Result<Vec<DbVenue>> {
    let pattern = search_term.map(like_pattern);

    let venues = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, name, description, address, city, region, lat,
               lng, phone, email, website, images, amenities, opening_hours,
               rating, review_count, is_active, is_verified, created_at
        FROM venues
        WHERE is_active = TRUE
          AND ($1::text IS NULL OR name ILIKE $1)
          AND ($2::text IS NULL OR city = $2)
          AND ($3::text IS NULL OR region = $3)
        ORDER BY created_at DESC
        LIMIT $4
        "#,
    )
    .bind(pattern)
    .bind(city)
    .bind(region)
    .bind(DEFAULT_LIST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(venues)
}

pub async fn get_venues_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<DbVenue>> {
    let venues = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, name, description, address, city, region, lat,
               lng, phone, email, website, images, amenities, opening_hours,
               rating, review_count, is_active, is_verified, created_at
        FROM venues
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(venues)
}

pub async fn update_venue(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &VenuePatch,
) -> Result<Option<DbVenue>> {
    tracing::debug!("Updating venue: id={}", id);

    let venue = sqlx::query_as::<_, DbVenue>(
        r#"
        UPDATE venues
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            address = COALESCE($4, address),
            phone = COALESCE($5, phone),
            email = COALESCE($6, email),
            website = COALESCE($7, website),
            amenities = COALESCE($8, amenities),
            opening_hours = COALESCE($9, opening_hours),
            is_active = COALESCE($10, is_active)
        WHERE id = $1
        RETURNING id, owner_id, name, description, address, city, region, lat,
                  lng, phone, email, website, images, amenities, opening_hours,
                  rating, review_count, is_active, is_verified, created_at
        "#,
    )
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.address.as_deref())
    .bind(patch.phone.as_deref())
    .bind(patch.email.as_deref())
    .bind(patch.website.as_deref())
    .bind(patch.amenities.as_deref())
    .bind(patch.opening_hours.as_ref().map(Json))
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(venue)
}

/// Writes the derived rating fields. Only the review aggregation path calls
/// this, from inside the review insert transaction.
pub async fn set_rating<'e, E>(executor: E, id: Uuid, rating: f64, review_count: i64) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE venues
        SET rating = $2, review_count = $3
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(rating)
    .bind(review_count as i32)
    .execute(executor)
    .await?;

    Ok(())
}
