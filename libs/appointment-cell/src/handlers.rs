use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AvailabilityEntry, SpecialtyEntry};
use crate::services::availability::SlotAvailabilityResolver;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQueryParams {
    pub date: Option<String>,
}

pub async fn get_appointment_options(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AvailabilityQueryParams>,
) -> Result<Json<Vec<AvailabilityEntry>>, AppError> {
    debug!("Resolving availability for {:?}", params.date);

    let resolver = SlotAvailabilityResolver::new(&state);
    let entries = resolver
        .resolve(params.date.as_deref())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(entries))
}

pub async fn get_appointment_options_v2(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AvailabilityQueryParams>,
) -> Result<Json<Vec<AvailabilityEntry>>, AppError> {
    debug!("Resolving availability (pushdown) for {:?}", params.date);

    let resolver = SlotAvailabilityResolver::new(&state);
    let entries = resolver
        .resolve_pushdown(params.date.as_deref())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(entries))
}

pub async fn get_appointment_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<SpecialtyEntry>>, AppError> {
    let resolver = SlotAvailabilityResolver::new(&state);
    let specialties = resolver
        .specialties()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(specialties))
}
