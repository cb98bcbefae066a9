use crate::models::DbUserProfile;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use courtbook_core::models::user::{Location, UserType};

/// Explicit optional-field patch for a profile update. `None` fields are
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub preferred_sports: Option<Vec<String>>,
    pub language: Option<String>,
    pub location: Option<Location>,
}

/// Inserts a profile for a user. Returns `None` when the user already has
/// one (the unique constraint on user_id wins the race).
pub async fn create_profile(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    first_name: &str,
    last_name: &str,
    phone: Option<&str>,
    user_type: UserType,
    preferred_sports: &[String],
    language: Option<&str>,
) -> Result<Option<DbUserProfile>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating profile: id={}, user_id={}, user_type={}",
        id,
        user_id,
        user_type
    );

    let profile = sqlx::query_as::<_, DbUserProfile>(
        r#"
        INSERT INTO user_profiles
            (id, user_id, first_name, last_name, phone, user_type,
             preferred_sports, language, is_verified, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING id, user_id, first_name, last_name, phone, user_type,
                  preferred_sports, language, city, region, lat, lng,
                  is_verified, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .bind(user_type.as_str())
    .bind(preferred_sports)
    .bind(language)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbUserProfile>> {
    let profile = sqlx::query_as::<_, DbUserProfile>(
        r#"
        SELECT id, user_id, first_name, last_name, phone, user_type,
               preferred_sports, language, city, region, lat, lng,
               is_verified, created_at
        FROM user_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

fn location_columns(
    location: Option<&Location>,
) -> (Option<String>, Option<String>, Option<f64>, Option<f64>) {
    match location {
        Some(location) => (
            Some(location.city.clone()),
            Some(location.region.clone()),
            location.coordinates.map(|c| c.lat),
            location.coordinates.map(|c| c.lng),
        ),
        None => (None, None, None, None),
    }
}

pub async fn update_profile(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    patch: &UserProfilePatch,
) -> Result<Option<DbUserProfile>> {
    tracing::debug!("Updating profile for user_id={}", user_id);

    let (city, region, lat, lng) = location_columns(patch.location.as_ref());

    // A supplied location replaces all four columns, so coordinates absent
    // from the new location clear any stored ones rather than surviving a
    // city change
    let profile = sqlx::query_as::<_, DbUserProfile>(
        r#"
        UPDATE user_profiles
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            phone = COALESCE($4, phone),
            preferred_sports = COALESCE($5, preferred_sports),
            language = COALESCE($6, language),
            city = CASE WHEN $11 THEN $7 ELSE city END,
            region = CASE WHEN $11 THEN $8 ELSE region END,
            lat = CASE WHEN $11 THEN $9 ELSE lat END,
            lng = CASE WHEN $11 THEN $10 ELSE lng END
        WHERE user_id = $1
        RETURNING id, user_id, first_name, last_name, phone, user_type,
                  preferred_sports, language, city, region, lat, lng,
                  is_verified, created_at
        "#,
    )
    .bind(user_id)
    .bind(patch.first_name.as_deref())
    .bind(patch.last_name.as_deref())
    .bind(patch.phone.as_deref())
    .bind(patch.preferred_sports.as_deref())
    .bind(patch.language.as_deref())
    .bind(city)
    .bind(region)
    .bind(lat)
    .bind(lng)
    .bind(patch.location.is_some())
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}
