use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use courtbook_core::errors::CourtError;
use courtbook_core::models::{
    availability::{AvailabilitySlot, SpecialOffer},
    booking::{Booking, Player},
    court::Court,
    review::{Review, ReviewAspects},
    user::{Location, UserProfile},
    venue::{Coordinates, OpeningHours, Venue},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub user_type: String,
    pub preferred_sports: Vec<String>,
    pub language: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUserProfile> for UserProfile {
    type Error = CourtError;

    fn try_from(row: DbUserProfile) -> Result<Self, Self::Error> {
        let user_type = row
            .user_type
            .parse()
            .map_err(|e: String| CourtError::Internal(e.into()))?;

        // Location is flattened into nullable columns; a row has a location
        // only when both city and region are present.
        let location = match (row.city, row.region) {
            (Some(city), Some(region)) => Some(Location {
                city,
                region,
                coordinates: match (row.lat, row.lng) {
                    (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
                    _ => None,
                },
            }),
            _ => None,
        };

        Ok(UserProfile {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            user_type,
            preferred_sports: row.preferred_sports,
            language: row.language,
            location,
            is_verified: row.is_verified,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVenue {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub images: Vec<Uuid>,
    pub amenities: Vec<String>,
    pub opening_hours: Json<OpeningHours>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbVenue> for Venue {
    fn from(row: DbVenue) -> Self {
        Venue {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            address: row.address,
            city: row.city,
            region: row.region,
            coordinates: Coordinates {
                lat: row.lat,
                lng: row.lng,
            },
            phone: row.phone,
            email: row.email,
            website: row.website,
            images: row.images,
            amenities: row.amenities,
            opening_hours: row.opening_hours.0,
            rating: row.rating,
            review_count: row.review_count,
            is_active: row.is_active,
            is_verified: row.is_verified,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCourt {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub sport: String,
    pub surface: String,
    pub size: Option<String>,
    pub capacity: i32,
    pub price_per_hour: f64,
    pub images: Vec<Uuid>,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbCourt> for Court {
    fn from(row: DbCourt) -> Self {
        Court {
            id: row.id,
            venue_id: row.venue_id,
            name: row.name,
            sport: row.sport,
            surface: row.surface,
            size: row.size,
            capacity: row.capacity,
            price_per_hour: row.price_per_hour,
            images: row.images,
            amenities: row.amenities,
            is_active: row.is_active,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilitySlot {
    pub id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: String,
    pub duration: i32,
    pub is_available: bool,
    pub price: f64,
    pub special_offer: Option<Json<SpecialOffer>>,
    pub created_at: DateTime<Utc>,
}

impl From<DbAvailabilitySlot> for AvailabilitySlot {
    fn from(row: DbAvailabilitySlot) -> Self {
        AvailabilitySlot {
            id: row.id,
            court_id: row.court_id,
            date: row.date,
            time_slot: row.time_slot,
            duration: row.duration,
            is_available: row.is_available,
            price: row.price,
            special_offer: row.special_offer.map(|offer| offer.0),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: String,
    pub duration: i32,
    pub end_time: String,
    pub total_price: f64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub payment_id: Option<String>,
    pub players: Json<Vec<Player>>,
    pub notes: Option<String>,
    pub qr_code: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub refund_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = CourtError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e: String| CourtError::Internal(e.into()))?;
        let payment_status = row
            .payment_status
            .parse()
            .map_err(|e: String| CourtError::Internal(e.into()))?;

        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            court_id: row.court_id,
            venue_id: row.venue_id,
            date: row.date,
            time_slot: row.time_slot,
            duration: row.duration,
            end_time: row.end_time,
            total_price: row.total_price,
            status,
            payment_status,
            payment_method: row.payment_method,
            payment_id: row.payment_id,
            players: row.players.0,
            notes: row.notes,
            qr_code: row.qr_code,
            cancelled_at: row.cancelled_at,
            cancellation_reason: row.cancellation_reason,
            refund_amount: row.refund_amount,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub rating: f64,
    pub comment: Option<String>,
    pub cleanliness: f64,
    pub facilities: f64,
    pub staff: f64,
    pub value: f64,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbReview> for Review {
    fn from(row: DbReview) -> Self {
        Review {
            id: row.id,
            user_id: row.user_id,
            venue_id: row.venue_id,
            booking_id: row.booking_id,
            rating: row.rating,
            comment: row.comment,
            aspects: ReviewAspects {
                cleanliness: row.cleanliness,
                facilities: row.facilities,
                staff: row.staff,
                value: row.value,
            },
            is_verified: row.is_verified,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAuthSession {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
