use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/jwt", get(handlers::issue_token))
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route(
            "/users/admin/{email}",
            get(handlers::check_admin).put(handlers::promote_user),
        )
        .with_state(state)
}
