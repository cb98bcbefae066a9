pub mod availability;
pub mod booking;
pub mod court;
pub mod review;
pub mod session;
pub mod user_profile;
pub mod venue;
