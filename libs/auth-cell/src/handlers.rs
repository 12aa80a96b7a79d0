use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::bearer_identity;

use crate::models::{AdminCheckResponse, AuthError, CreateUserRequest, UserRecord};
use crate::services::gate::AuthorizationGate;

#[derive(Debug, Deserialize)]
pub struct JwtQueryParams {
    pub email: String,
}

/// Mint a bearer token for a known user. An unknown email is reported as
/// Forbidden with no token, not as partial success.
pub async fn issue_token(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<JwtQueryParams>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Token requested for {}", params.email);

    let gate = AuthorizationGate::new(&state);
    let token = gate.issue_token(&params.email).await.map_err(|e| match &e {
        AuthError::UnknownUser(_) => AppError::Forbidden(e.to_string()),
        _ => map_auth_error(e),
    })?;

    Ok(Json(TokenResponse { access_token: token }))
}

pub async fn create_user(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserRecord>, AppError> {
    let gate = AuthorizationGate::new(&state);
    let user = gate.register_user(request).await.map_err(map_auth_error)?;

    Ok(Json(user))
}

pub async fn list_users(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let gate = AuthorizationGate::new(&state);
    let users = gate.list_users().await.map_err(map_auth_error)?;

    Ok(Json(users))
}

pub async fn check_admin(
    State(state): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<AdminCheckResponse>, AppError> {
    let gate = AuthorizationGate::new(&state);
    let is_admin = gate.is_admin(&email).await.map_err(map_auth_error)?;

    Ok(Json(AdminCheckResponse { is_admin }))
}

/// Role elevation: bearer token required, and the caller must already be an
/// admin.
pub async fn promote_user(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRecord>, AppError> {
    let identity = bearer_identity(&headers, &state)?;

    let gate = AuthorizationGate::new(&state);
    gate.authorize_admin(&identity.email)
        .await
        .map_err(map_auth_error)?;

    let user = gate.promote_to_admin(user_id).await.map_err(|e| match &e {
        AuthError::UnknownUser(_) => AppError::NotFound(e.to_string()),
        _ => map_auth_error(e),
    })?;

    Ok(Json(user))
}

fn map_auth_error(err: AuthError) -> AppError {
    match &err {
        AuthError::UnknownUser(_) | AuthError::NotAdmin(_) => AppError::Forbidden(err.to_string()),
        AuthError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
        AuthError::Signing(_) => AppError::Internal(err.to_string()),
        AuthError::Database(_) => AppError::Upstream(err.to_string()),
    }
}
