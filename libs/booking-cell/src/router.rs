use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/bookings", post(handlers::create_booking).get(handlers::list_bookings))
        .route("/bookings/{booking_id}", get(handlers::get_booking))
        .with_state(state)
}
