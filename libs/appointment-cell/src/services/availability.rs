use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{AppointmentOption, AvailabilityEntry, BookedSlot, SpecialtyEntry};

/// Computes which slots remain open for every treatment on a given date.
///
/// Read-only: the result is a point-in-time snapshot and may go stale the
/// moment it is returned. The authoritative uniqueness check happens at
/// reservation time, not here.
pub struct SlotAvailabilityResolver {
    supabase: Arc<SupabaseClient>,
}

impl SlotAvailabilityResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Scan-and-diff strategy: fetch the full catalog and the day's
    /// bookings, then subtract booked slots per option. Catalog order and
    /// per-option slot order are preserved.
    pub async fn resolve(&self, date: Option<&str>) -> Result<Vec<AvailabilityEntry>, DbError> {
        let options: Vec<AppointmentOption> =
            self.supabase.select("appointment_options?order=id.asc").await?;

        let booked: Vec<BookedSlot> = match parse_date(date) {
            Some(day) => {
                self.supabase
                    .select(&format!(
                        "bookings?appointment_date=eq.{}&select=treatment,slot",
                        day
                    ))
                    .await?
            }
            // Absent or unparseable date: the booked set is treated as
            // empty and the full catalog comes back. Same fallback for both
            // strategies.
            None => Vec::new(),
        };

        let entries = options
            .into_iter()
            .map(|option| {
                let booked_slots: Vec<String> = booked
                    .iter()
                    .filter(|book| book.treatment == option.name)
                    .map(|book| book.slot.clone())
                    .collect();

                let remaining: Vec<String> = option
                    .slots
                    .into_iter()
                    .filter(|slot| !booked_slots.contains(slot))
                    .collect();

                debug!("{} has {} open slots", option.name, remaining.len());

                AvailabilityEntry {
                    name: option.name,
                    price: option.price,
                    slots: remaining,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Pushdown strategy: the database performs the join, grouping and
    /// set-difference in a single call. Behaviorally equivalent to
    /// [`resolve`](Self::resolve), including the absent-date fallback.
    pub async fn resolve_pushdown(&self, date: Option<&str>) -> Result<Vec<AvailabilityEntry>, DbError> {
        let args = match parse_date(date) {
            Some(day) => json!({ "on_date": day.to_string() }),
            None => json!({ "on_date": null }),
        };

        self.supabase.rpc("available_slots", args).await
    }

    /// Treatment names only, in catalog order.
    pub async fn specialties(&self) -> Result<Vec<SpecialtyEntry>, DbError> {
        self.supabase
            .select("appointment_options?select=name&order=id.asc")
            .await
    }
}

fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    let raw = date?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(day) => Some(day),
        Err(_) => {
            warn!("Malformed availability date {:?}, treating as absent", raw);
            None
        }
    }
}
