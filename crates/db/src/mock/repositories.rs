use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

use courtbook_core::models::booking::{BookingStatus, Player};
use courtbook_core::models::review::ReviewAspects;
use courtbook_core::models::user::UserType;

use crate::models::{
    DbAvailabilitySlot, DbBooking, DbCourt, DbReview, DbUserProfile, DbVenue,
};

// Mock repositories for testing

mock! {
    pub SessionRepo {
        pub async fn resolve_session(&self, token: &'static str) -> eyre::Result<Option<Uuid>>;
    }
}

mock! {
    pub UserProfileRepo {
        pub async fn create_profile(
            &self,
            user_id: Uuid,
            first_name: &'static str,
            last_name: &'static str,
            phone: Option<&'static str>,
            user_type: UserType,
        ) -> eyre::Result<Option<DbUserProfile>>;

        pub async fn get_profile_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbUserProfile>>;
    }
}

mock! {
    pub VenueRepo {
        pub async fn get_venue_by_id(&self, id: Uuid) -> eyre::Result<Option<DbVenue>>;

        pub async fn get_venues_by_owner(&self, owner_id: Uuid) -> eyre::Result<Vec<DbVenue>>;

        pub async fn set_rating(
            &self,
            id: Uuid,
            rating: f64,
            review_count: i64,
        ) -> eyre::Result<()>;
    }
}

mock! {
    pub CourtRepo {
        pub async fn get_court_by_id(&self, id: Uuid) -> eyre::Result<Option<DbCourt>>;

        pub async fn get_courts_by_venue(&self, venue_id: Uuid) -> eyre::Result<Vec<DbCourt>>;
    }
}

mock! {
    pub AvailabilityRepo {
        pub async fn insert_slot_if_absent(
            &self,
            court_id: Uuid,
            date: NaiveDate,
            time_slot: &'static str,
            duration: i32,
            price: f64,
        ) -> eyre::Result<Option<DbAvailabilitySlot>>;

        pub async fn get_slots_by_court_and_date(
            &self,
            court_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbAvailabilitySlot>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn find_active_booking(
            &self,
            court_id: Uuid,
            date: NaiveDate,
            time_slot: &'static str,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn booked_time_slots(
            &self,
            court_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<String>>;

        pub async fn insert_booking_row(
            &self,
            user_id: Uuid,
            court_id: Uuid,
            date: NaiveDate,
            time_slot: &'static str,
            duration: i32,
            players: Vec<Player>,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn get_booking_by_id(&self, id: Uuid) -> eyre::Result<Option<DbBooking>>;

        pub async fn get_user_bookings(
            &self,
            user_id: Uuid,
            status: Option<BookingStatus>,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn cancel_booking(
            &self,
            id: Uuid,
            reason: Option<&'static str>,
            cancelled_at: DateTime<Utc>,
        ) -> eyre::Result<Option<DbBooking>>;
    }
}

mock! {
    pub ReviewRepo {
        pub async fn create_review_row(
            &self,
            user_id: Uuid,
            venue_id: Uuid,
            booking_id: Option<Uuid>,
            rating: f64,
            aspects: ReviewAspects,
            is_verified: bool,
        ) -> eyre::Result<Option<DbReview>>;

        pub async fn find_by_user_and_venue(
            &self,
            user_id: Uuid,
            venue_id: Uuid,
        ) -> eyre::Result<Option<DbReview>>;

        pub async fn get_venue_reviews(
            &self,
            venue_id: Uuid,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbReview>>;
    }
}
