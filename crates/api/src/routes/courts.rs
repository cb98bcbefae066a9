use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/courts", post(handlers::courts::create_court))
        .route("/api/courts", get(handlers::courts::get_courts_by_sport))
        .route("/api/courts/:id", get(handlers::courts::get_court))
        .route("/api/courts/:id", put(handlers::courts::update_court))
        .route(
            "/api/venues/:id/courts",
            get(handlers::courts::get_courts_by_venue),
        )
}
