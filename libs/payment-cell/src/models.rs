use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Ledger row linking a confirmed gateway transaction to its booking.
/// Only ever written in the same storage transaction that flips the
/// booking's paid flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub transaction_id: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIntentRequest {
    pub booking_id: Uuid,
    pub price: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub booking_id: Uuid,
    pub transaction_id: String,
    pub amount: i64,
}

/// Subset of the gateway's payment-intent wire object we care about.
#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub client_secret: String,
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("booking {0} is already paid")]
    AlreadyPaid(Uuid),

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("payment gateway error: {0}")]
    Gateway(String),

    #[error("storage error: {0}")]
    Database(String),
}
