use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use doctor_cell::router::doctor_routes;
use payment_cell::router::payment_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    // Routes live at the root, mirroring the portal's existing clients
    Router::new()
        .route("/", get(|| async { "Doctors portal API is running!" }))
        .merge(appointment_routes(state.clone()))
        .merge(booking_routes(state.clone()))
        .merge(payment_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .merge(doctor_routes(state))
}
