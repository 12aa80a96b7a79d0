use std::sync::Arc;

use axum::{extract::State, Json};

use booking_cell::models::Booking;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ConfirmPaymentRequest, CreateIntentRequest, CreateIntentResponse, PaymentError};
use crate::services::reconciler::PaymentReconciler;

pub async fn create_payment_intent(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, AppError> {
    let reconciler = PaymentReconciler::new(&state);
    let response = reconciler
        .create_intent(request)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(response))
}

pub async fn confirm_payment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<Booking>, AppError> {
    let reconciler = PaymentReconciler::new(&state);
    let booking = reconciler.confirm(request).await.map_err(map_payment_error)?;

    Ok(Json(booking))
}

fn map_payment_error(err: PaymentError) -> AppError {
    match &err {
        PaymentError::BookingNotFound(_) => AppError::NotFound(err.to_string()),
        PaymentError::AlreadyPaid(_) => AppError::AlreadyPaid(err.to_string()),
        PaymentError::InvalidAmount => AppError::InvalidArgument(err.to_string()),
        PaymentError::Gateway(_) | PaymentError::Database(_) => AppError::Upstream(err.to_string()),
    }
}
