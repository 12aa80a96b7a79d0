use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use booking_cell::models::Booking;
use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{ConfirmPaymentRequest, CreateIntentRequest, CreateIntentResponse, PaymentError};
use crate::services::stripe::StripeClient;

/// Bridges the payment gateway and the booking ledger. Confirmation is the
/// reconciliation step: the payment row and the booking's paid flag change
/// together or not at all.
pub struct PaymentReconciler {
    supabase: Arc<SupabaseClient>,
    stripe: StripeClient,
}

impl PaymentReconciler {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            stripe: StripeClient::new(config),
        }
    }

    pub fn with_clients(supabase: Arc<SupabaseClient>, stripe: StripeClient) -> Self {
        Self { supabase, stripe }
    }

    pub async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<CreateIntentResponse, PaymentError> {
        if request.price <= 0 {
            return Err(PaymentError::InvalidAmount);
        }

        // The gateway works in the smallest currency unit
        let amount_cents = request.price * 100;

        let intent = self.stripe.create_payment_intent(amount_cents).await?;

        info!("Payment intent created for booking {}", request.booking_id);

        Ok(CreateIntentResponse {
            client_secret: intent.client_secret,
        })
    }

    pub async fn confirm(&self, request: ConfirmPaymentRequest) -> Result<Booking, PaymentError> {
        let bookings: Vec<Booking> = self
            .supabase
            .select(&format!("bookings?id=eq.{}", request.booking_id))
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let booking = bookings
            .into_iter()
            .next()
            .ok_or(PaymentError::BookingNotFound(request.booking_id))?;

        if booking.paid {
            return Err(PaymentError::AlreadyPaid(request.booking_id));
        }

        // The payment row and the paid-flag update commit or roll back
        // together inside record_payment. A unique index on
        // payments.booking_id turns a raced retry into AlreadyPaid instead
        // of a second record.
        let updated: Booking = self
            .supabase
            .rpc(
                "record_payment",
                json!({
                    "p_booking_id": request.booking_id,
                    "p_transaction_id": request.transaction_id,
                    "p_amount": request.amount
                }),
            )
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation(_) => {
                    warn!("Raced payment confirmation for booking {}", request.booking_id);
                    PaymentError::AlreadyPaid(request.booking_id)
                }
                other => PaymentError::Database(other.to_string()),
            })?;

        info!(
            "Booking {} reconciled with transaction {}",
            updated.id, request.transaction_id
        );

        Ok(updated)
    }
}
