use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/courts/:id/availability",
            post(handlers::availability::generate_availability),
        )
        .route(
            "/api/courts/:id/availability",
            get(handlers::availability::get_availability),
        )
        .route(
            "/api/availability/:id",
            put(handlers::availability::update_availability),
        )
}
