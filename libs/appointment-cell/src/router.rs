use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointmentOptions", get(handlers::get_appointment_options))
        .route("/v2/appointmentOptions", get(handlers::get_appointment_options_v2))
        .route("/appointmentSpecialty", get(handlers::get_appointment_specialties))
        .with_state(state)
}
