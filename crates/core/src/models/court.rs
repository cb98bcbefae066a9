use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::venue::Venue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub sport: String,
    pub surface: String,
    pub size: Option<String>,
    /// Maximum number of players.
    pub capacity: i32,
    pub price_per_hour: f64,
    pub images: Vec<Uuid>,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourtRequest {
    pub venue_id: Uuid,
    pub name: String,
    pub sport: String,
    pub surface: String,
    pub size: Option<String>,
    pub capacity: i32,
    pub price_per_hour: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourtResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourtRequest {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtWithVenue {
    #[serde(flatten)]
    pub court: Court,
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtDetailsResponse {
    #[serde(flatten)]
    pub court: Court,
    pub venue: Option<Venue>,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourtsBySportQuery {
    pub sport: String,
    pub city: Option<String>,
    pub limit: Option<i64>,
}
