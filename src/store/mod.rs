pub mod sqlite;
pub mod supabase;

use async_trait::async_trait;

use crate::models::{Booking, NewBooking, Service, Slot, SlotAvailability};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("slot {date} {time} is already booked")]
    Conflict { date: String, time: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error ({status}): {message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("store connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Storage capability shared by the embedded and hosted backends.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn check_availability(&self, slot: &Slot) -> Result<SlotAvailability, StoreError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, StoreError>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError>;

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        Ok(Vec::new())
    }

    /// Whether concurrent inserts for one slot are rejected atomically by
    /// the store itself. When false, callers must check capacity first.
    fn enforces_slot_uniqueness(&self) -> bool;
}
