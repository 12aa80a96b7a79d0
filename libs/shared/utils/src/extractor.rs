use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Bearer-token middleware. A missing credential is 401; a credential that
/// is present but malformed, forged or expired is 403. The resolved
/// `Identity` lands in request extensions for handlers downstream.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Forbidden("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let identity = validate_token(token, &config.jwt_secret).map_err(AppError::Forbidden)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Handler-level variant of the middleware, for routes whose path is shared
/// with unauthenticated methods. Same status mapping: 401 for a missing
/// credential, 403 for a bad one.
pub fn bearer_identity(headers: &HeaderMap, config: &AppConfig) -> Result<Identity, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Forbidden("Invalid authorization header format".to_string()));
    }

    validate_token(&auth_value[7..], &config.jwt_secret).map_err(AppError::Forbidden)
}
