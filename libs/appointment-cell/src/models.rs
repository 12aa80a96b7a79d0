use serde::{Deserialize, Serialize};

/// One catalog entry: a named treatment with a price and its full slot set.
/// Catalog data is immutable from this service's point of view; rows are
/// maintained by administrative tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentOption {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub slots: Vec<String>,
}

/// Catalog entry with the booked slots for the queried date already
/// subtracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub name: String,
    pub price: i64,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpecialtyEntry {
    pub name: String,
}

/// Read-path projection of a booking; only the two fields the
/// set-difference needs come back from storage.
#[derive(Debug, Deserialize)]
pub struct BookedSlot {
    pub treatment: String,
    pub slot: String,
}
