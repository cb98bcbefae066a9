use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/venues/:id/reviews",
            post(handlers::reviews::create_review),
        )
        .route(
            "/api/venues/:id/reviews",
            get(handlers::reviews::get_venue_reviews),
        )
}
