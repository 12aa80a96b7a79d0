use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info, warn};
use urlencoding::encode;
use uuid::Uuid;

use appointment_cell::models::AppointmentOption;
use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{Booking, BookingError, BookingRequest};

/// Reserves slots. Two separate conflict concerns are enforced here: a
/// caller may hold at most one booking per treatment per date, and a slot
/// may be sold at most once (the scarce resource). The second check rides
/// on a unique index, never on a read-then-insert sequence.
pub struct BookingArbiter {
    supabase: Arc<SupabaseClient>,
}

impl BookingArbiter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn reserve(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let date = NaiveDate::parse_from_str(&request.appointment_date, "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDate(request.appointment_date.clone()))?;

        // The slot must belong to the treatment's catalog entry
        let options: Vec<AppointmentOption> = self
            .supabase
            .select(&format!("appointment_options?name=eq.{}", encode(&request.treatment)))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let option = options
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::UnknownTreatment(request.treatment.clone()))?;

        if !option.slots.contains(&request.slot) {
            return Err(BookingError::SlotNotOffered {
                treatment: request.treatment.clone(),
                slot: request.slot.clone(),
            });
        }

        // One booking per caller per treatment per date, whatever the slot
        let existing: Vec<Booking> = self
            .supabase
            .select(&format!(
                "bookings?email=eq.{}&treatment=eq.{}&appointment_date=eq.{}",
                encode(&request.email),
                encode(&request.treatment),
                date
            ))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        if !existing.is_empty() {
            debug!(
                "Duplicate booking attempt by {} for {} on {}",
                request.email, request.treatment, date
            );
            return Err(BookingError::AlreadyBookedThatDate {
                treatment: request.treatment,
                date,
            });
        }

        // Uniqueness check and write are a single conditional insert against
        // the (treatment, appointment_date, slot) index. Losing the race is
        // a Conflict, not a transport fault.
        let row = json!({
            "email": request.email,
            "treatment": request.treatment,
            "appointment_date": date,
            "slot": request.slot,
            "paid": false
        });

        match self.supabase.insert_unique::<Booking>("bookings", row).await {
            Ok(booking) => {
                info!(
                    "Booking {} created: {} {} {} for {}",
                    booking.id, booking.treatment, booking.appointment_date, booking.slot, booking.email
                );
                Ok(booking)
            }
            Err(DbError::UniqueViolation(_)) => {
                warn!(
                    "Slot race lost: {} {} {} requested by {}",
                    request.treatment, date, request.slot, request.email
                );
                Err(BookingError::SlotTaken {
                    treatment: request.treatment,
                    date,
                    slot: request.slot,
                })
            }
            Err(e) => Err(BookingError::Database(e.to_string())),
        }
    }

    pub async fn bookings_for(&self, email: &str) -> Result<Vec<Booking>, BookingError> {
        self.supabase
            .select(&format!("bookings?email=eq.{}&order=appointment_date.asc", encode(email)))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))
    }

    pub async fn get(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let bookings: Vec<Booking> = self
            .supabase
            .select(&format!("bookings?id=eq.{}", booking_id))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        bookings.into_iter().next().ok_or(BookingError::NotFound)
    }
}
