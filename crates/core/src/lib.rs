//! # Courtbook Core
//!
//! Shared domain types for the Courtbook venue booking service: entity and
//! request/response models, the error taxonomy, and the pure booking rules
//! (slot generation, pricing, cancellation policy, rating aggregation) that
//! the API handlers apply on top of the storage layer.

pub mod errors;
pub mod models;
pub mod scheduling;
