use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    // Roster maintenance is admin-only throughout
    Router::new()
        .route("/doctors", post(handlers::add_doctor))
        .route("/doctors", get(handlers::list_doctors))
        .route("/doctors/{doctor_id}", delete(handlers::remove_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
