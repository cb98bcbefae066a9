use crate::models::DbReview;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use courtbook_core::models::review::ReviewAspects;
use courtbook_core::scheduling;

const DEFAULT_LIST_LIMIT: i64 = 20;

pub struct NewReview<'a> {
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub rating: f64,
    pub comment: Option<&'a str>,
    pub aspects: ReviewAspects,
    pub is_verified: bool,
}

/// Inserts a review and recomputes the venue's derived rating fields from a
/// full scan of its reviews, all in one transaction. Returns `None` when the
/// user already reviewed the venue (unique pair constraint).
pub async fn create_review(pool: &Pool<Postgres>, new: NewReview<'_>) -> Result<Option<DbReview>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating review: id={}, venue_id={}, user_id={}",
        id,
        new.venue_id,
        new.user_id
    );

    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, DbReview>(
        r#"
        INSERT INTO reviews
            (id, user_id, venue_id, booking_id, rating, comment, cleanliness,
             facilities, staff, value, is_verified, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (user_id, venue_id) DO NOTHING
        RETURNING id, user_id, venue_id, booking_id, rating, comment,
                  cleanliness, facilities, staff, value, is_verified,
                  created_at
        "#,
    )
    .bind(id)
    .bind(new.user_id)
    .bind(new.venue_id)
    .bind(new.booking_id)
    .bind(new.rating)
    .bind(new.comment)
    .bind(new.aspects.cleanliness)
    .bind(new.aspects.facilities)
    .bind(new.aspects.staff)
    .bind(new.aspects.value)
    .bind(new.is_verified)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(review) = review else {
        tx.rollback().await?;
        return Ok(None);
    };

    let ratings = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT rating
        FROM reviews
        WHERE venue_id = $1
        "#,
    )
    .bind(new.venue_id)
    .fetch_all(&mut *tx)
    .await?;

    if let Some((rating, review_count)) = scheduling::aggregate_rating(&ratings) {
        super::venue::set_rating(&mut *tx, new.venue_id, rating, review_count).await?;
    }

    tx.commit().await?;

    Ok(Some(review))
}

pub async fn find_by_user_and_venue(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    venue_id: Uuid,
) -> Result<Option<DbReview>> {
    let review = sqlx::query_as::<_, DbReview>(
        r#"
        SELECT id, user_id, venue_id, booking_id, rating, comment,
               cleanliness, facilities, staff, value, is_verified, created_at
        FROM reviews
        WHERE user_id = $1 AND venue_id = $2
        "#,
    )
    .bind(user_id)
    .bind(venue_id)
    .fetch_optional(pool)
    .await?;

    Ok(review)
}

pub async fn get_venue_reviews(
    pool: &Pool<Postgres>,
    venue_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<DbReview>> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let reviews = sqlx::query_as::<_, DbReview>(
        r#"
        SELECT id, user_id, venue_id, booking_id, rating, comment,
               cleanliness, facilities, staff, value, is_verified, created_at
        FROM reviews
        WHERE venue_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(venue_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}
