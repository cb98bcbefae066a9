pub mod availability;
pub mod bookings;
pub mod courts;
pub mod reviews;
pub mod users;
pub mod venues;
