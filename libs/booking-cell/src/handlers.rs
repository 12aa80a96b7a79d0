use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::bearer_identity;

use crate::models::{Booking, BookingError, BookingRequest};
use crate::services::arbiter::BookingArbiter;

#[derive(Debug, Deserialize)]
pub struct BookingsQueryParams {
    pub email: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let arbiter = BookingArbiter::new(&state);
    let booking = arbiter.reserve(request).await.map_err(map_booking_error)?;

    Ok(Json(booking))
}

/// Bookings can only be listed for the email the bearer token proves.
pub async fn list_bookings(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Query(params): Query<BookingsQueryParams>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let identity = bearer_identity(&headers, &state)?;

    if params.email != identity.email {
        return Err(AppError::Forbidden(
            "Bookings can only be listed for the authenticated email".to_string(),
        ));
    }

    let arbiter = BookingArbiter::new(&state);
    let bookings = arbiter
        .bookings_for(&params.email)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking_id = Uuid::parse_str(&booking_id)
        .map_err(|_| AppError::NotFound("booking not found".to_string()))?;

    let arbiter = BookingArbiter::new(&state);
    let booking = arbiter.get(booking_id).await.map_err(map_booking_error)?;

    Ok(Json(booking))
}

fn map_booking_error(err: BookingError) -> AppError {
    match &err {
        BookingError::UnknownTreatment(_)
        | BookingError::SlotNotOffered { .. }
        | BookingError::InvalidDate(_) => AppError::InvalidArgument(err.to_string()),
        BookingError::AlreadyBookedThatDate { .. } | BookingError::SlotTaken { .. } => {
            AppError::Conflict(err.to_string())
        }
        BookingError::NotFound => AppError::NotFound(err.to_string()),
        BookingError::Database(_) => AppError::Upstream(err.to_string()),
    }
}
