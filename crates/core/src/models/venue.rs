use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    pub closed: bool,
}

/// Opening hours per weekday. `closed: true` days keep whatever open/close
/// strings the owner last entered; consumers must check the flag first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub coordinates: Coordinates,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub images: Vec<Uuid>,
    pub amenities: Vec<String>,
    pub opening_hours: OpeningHours,
    /// Derived from reviews; never edited directly.
    pub rating: Option<f64>,
    /// Derived from reviews; never edited directly.
    pub review_count: Option<i32>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub coordinates: Coordinates,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub opening_hours: OpeningHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVenueResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVenueRequest {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueDetailsResponse {
    #[serde(flatten)]
    pub venue: Venue,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueListQuery {
    pub city: Option<String>,
    pub region: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueSearchQuery {
    pub search_term: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub sport: Option<String>,
}
