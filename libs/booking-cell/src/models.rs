use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A caller's reservation of one slot for one treatment on one date.
/// Created unpaid; only the payment reconciliation step flips `paid` and
/// fills `transaction_id`, and it does both in one storage transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub email: String,
    pub treatment: String,
    pub appointment_date: NaiveDate,
    pub slot: String,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub email: String,
    pub treatment: String,
    pub appointment_date: String,
    pub slot: String,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("treatment '{0}' is not in the catalog")]
    UnknownTreatment(String),

    #[error("slot '{slot}' is not offered for '{treatment}'")]
    SlotNotOffered { treatment: String, slot: String },

    #[error("invalid appointment date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("you already have a booking for '{treatment}' on {date}")]
    AlreadyBookedThatDate { treatment: String, date: NaiveDate },

    #[error("slot '{slot}' for '{treatment}' on {date} is already taken")]
    SlotTaken {
        treatment: String,
        date: NaiveDate,
        slot: String,
    },

    #[error("booking not found")]
    NotFound,

    #[error("storage error: {0}")]
    Database(String),
}
