use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialOffer {
    /// "discount", "happy_hour", ...
    #[serde(rename = "type")]
    pub offer_type: String,
    /// Percentage or fixed amount depending on the offer type.
    pub value: f64,
    pub description: String,
}

/// One bookable unit of court time. The (court_id, date, time_slot) triple
/// is the natural key: at most one slot exists per triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    /// Start of the slot as "HH:00".
    pub time_slot: String,
    /// Duration in hours.
    pub duration: i32,
    /// Stored flag only. The availability query recomputes the effective
    /// value against live bookings; booking creation never flips this.
    pub is_available: bool,
    /// May override the court's base price.
    pub price: f64,
    pub special_offer: Option<SpecialOffer>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAvailabilityRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_slots: Vec<String>,
    pub duration: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAvailabilityResponse {
    /// Ids of newly created slots; triples that already existed are skipped
    /// silently.
    pub created: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_available: Option<bool>,
    pub price: Option<f64>,
    pub special_offer: Option<SpecialOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}
