use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/venues", post(handlers::venues::create_venue))
        .route("/api/venues", get(handlers::venues::list_venues))
        .route("/api/venues/search", get(handlers::venues::search_venues))
        .route("/api/venues/mine", get(handlers::venues::get_my_venues))
        .route("/api/venues/:id", get(handlers::venues::get_venue))
        .route("/api/venues/:id", put(handlers::venues::update_venue))
}
