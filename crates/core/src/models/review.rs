use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed sub-scores attached to every review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewAspects {
    pub cleanliness: f64,
    pub facilities: f64,
    pub staff: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub booking_id: Option<Uuid>,
    /// 1..=5, range-checked on submission. Fractional values are accepted.
    pub rating: f64,
    pub comment: Option<String>,
    pub aspects: ReviewAspects,
    /// True only when the review is linked to a completed booking owned by
    /// the reviewer.
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub booking_id: Option<Uuid>,
    pub rating: f64,
    pub comment: Option<String>,
    pub aspects: ReviewAspects,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub author: Option<ReviewAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueReviewsQuery {
    pub limit: Option<i64>,
}
