use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;

use super::{BookingStore, StoreError};
use crate::db::queries;
use crate::models::{Booking, BookingId, NewBooking, Slot, SlotAvailability};

/// Embedded store. The schema allows exactly one booking per slot.
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn check_availability(&self, slot: &Slot) -> Result<SlotAvailability, StoreError> {
        let existing = {
            let db = self.conn()?;
            queries::find_booking_at(&db, &slot.date, &slot.time)?
        };
        Ok(SlotAvailability::from_count(existing.map_or(0, |_| 1), 1))
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, StoreError> {
        let db = self.conn()?;
        let id = queries::insert_booking(&db, booking).map_err(|e| {
            if queries::is_unique_violation(&e) {
                StoreError::Conflict {
                    date: booking.date.clone(),
                    time: booking.time.clone(),
                }
            } else {
                StoreError::Database(e)
            }
        })?;

        let created = queries::get_booking_by_id(&db, id)?;
        Ok(created.unwrap_or_else(|| Booking {
            id: BookingId::Int(id),
            name: booking.name.clone(),
            phone: booking.phone.clone(),
            service: booking.service.clone(),
            date: booking.date.clone(),
            time: booking.time.clone(),
            status: None,
            created_at: None,
        }))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let db = self.conn()?;
        Ok(queries::get_all_bookings(&db)?)
    }

    fn enforces_slot_uniqueness(&self) -> bool {
        true
    }
}
