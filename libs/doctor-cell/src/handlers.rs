use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use auth_cell::models::AuthError;
use auth_cell::services::gate::AuthorizationGate;
use shared_config::AppConfig;
use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, Doctor};
use crate::services::doctor::DoctorService;

async fn require_admin(state: &AppConfig, identity: &Identity) -> Result<(), AppError> {
    let gate = AuthorizationGate::new(state);
    gate.authorize_admin(&identity.email)
        .await
        .map_err(|e| match &e {
            AuthError::Database(_) => AppError::Upstream(e.to_string()),
            _ => AppError::Forbidden(e.to_string()),
        })?;
    Ok(())
}

pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    require_admin(&state, &identity).await?;

    let service = DoctorService::new(&state);
    let doctor = service
        .add_doctor(request)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(doctor))
}

pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    require_admin(&state, &identity).await?;

    let service = DoctorService::new(&state);
    let doctors = service
        .list_doctors()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(doctors))
}

pub async fn remove_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(identity): Extension<Identity>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, &identity).await?;

    let service = DoctorService::new(&state);
    service
        .remove_doctor(doctor_id)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(json!({ "deleted": true })))
}
