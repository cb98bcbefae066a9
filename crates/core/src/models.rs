pub mod availability;
pub mod booking;
pub mod court;
pub mod review;
pub mod user;
pub mod venue;
