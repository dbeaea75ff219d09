use crate::models::{Booking, BookingForm, Service, Slot, SlotAvailability};
use crate::services::validation;
use crate::store::{BookingStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("invalid booking: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("slot {} {} is already booked", .0.date, .0.time)]
    Conflict(Slot),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for BookingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { date, time } => BookingError::Conflict(Slot { date, time }),
            other => BookingError::Store(other),
        }
    }
}

/// Validation and slot rules in front of whichever store is configured.
pub struct BookingService {
    store: Box<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Box<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn check_availability(&self, slot: &Slot) -> Result<SlotAvailability, StoreError> {
        self.store.check_availability(slot).await
    }

    pub async fn create_booking(&self, form: BookingForm) -> Result<Booking, BookingError> {
        let errors = validation::validate_booking_form(&form);
        if !errors.is_empty() {
            return Err(BookingError::Invalid(errors));
        }

        let booking = form.into_new_booking();
        let slot = booking.slot();

        // Stores without an atomic uniqueness guarantee get a best-effort
        // capacity check; the embedded store must see a bare insert.
        if !self.store.enforces_slot_uniqueness() {
            let availability = self.store.check_availability(&slot).await?;
            if !availability.available {
                tracing::info!(
                    date = %slot.date,
                    time = %slot.time,
                    conflicting = availability.conflicting,
                    "slot at capacity"
                );
                return Err(BookingError::Conflict(slot));
            }
        }

        let created = self.store.create_booking(&booking).await?;
        tracing::info!(id = %created.id, date = %slot.date, time = %slot.time, "booking created");
        Ok(created)
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        self.store.list_bookings().await
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        self.store.list_services().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Datelike, Duration, Local, Weekday};

    use super::*;
    use crate::models::{BookingId, NewBooking};

    /// In-memory store that counts calls and never enforces uniqueness.
    struct LooseStore {
        capacity: usize,
        rows: Mutex<Vec<NewBooking>>,
        inserts: AtomicUsize,
        checks: AtomicUsize,
        atomic: bool,
    }

    impl LooseStore {
        fn new(capacity: usize, atomic: bool) -> Self {
            Self {
                capacity,
                rows: Mutex::new(vec![]),
                inserts: AtomicUsize::new(0),
                checks: AtomicUsize::new(0),
                atomic,
            }
        }
    }

    #[async_trait]
    impl BookingStore for LooseStore {
        async fn check_availability(&self, slot: &Slot) -> Result<SlotAvailability, StoreError> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            let count = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.slot() == *slot)
                .count();
            Ok(SlotAvailability::from_count(count, self.capacity))
        }

        async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, StoreError> {
            let n = self.inserts.fetch_add(1, Ordering::SeqCst);
            self.rows.lock().unwrap().push(booking.clone());
            Ok(Booking {
                id: BookingId::Int(n as i64 + 1),
                name: booking.name.clone(),
                phone: booking.phone.clone(),
                service: booking.service.clone(),
                date: booking.date.clone(),
                time: booking.time.clone(),
                status: None,
                created_at: None,
            })
        }

        async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
            Ok(vec![])
        }

        fn enforces_slot_uniqueness(&self) -> bool {
            self.atomic
        }
    }

    fn next_open_day() -> String {
        let mut day = Local::now().date_naive() + Duration::days(1);
        while day.weekday() == Weekday::Sun {
            day += Duration::days(1);
        }
        day.format("%Y-%m-%d").to_string()
    }

    fn form(time: &str) -> BookingForm {
        BookingForm {
            name: Some("Zawadi".to_string()),
            phone: Some("0722000111".to_string()),
            service: Some("nail-art".to_string()),
            date: Some(next_open_day()),
            time: Some(time.to_string()),
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_store() {
        let store = Arc::new(LooseStore::new(2, false));
        let service = BookingService::new(Box::new(SharedStore(Arc::clone(&store))));

        let result = service
            .create_booking(BookingForm {
                phone: None,
                ..form("10:00")
            })
            .await;

        assert!(matches!(result, Err(BookingError::Invalid(_))));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
        assert_eq!(store.checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_soft_capacity_enforced_before_insert() {
        let store = Arc::new(LooseStore::new(2, false));
        let service = BookingService::new(Box::new(SharedStore(Arc::clone(&store))));

        assert!(service.create_booking(form("10:00")).await.is_ok());
        assert!(service.create_booking(form("10:00")).await.is_ok());
        let third = service.create_booking(form("10:00")).await;

        assert!(matches!(third, Err(BookingError::Conflict(_))));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_atomic_store_gets_bare_insert() {
        let store = Arc::new(LooseStore::new(1, true));
        let service = BookingService::new(Box::new(SharedStore(Arc::clone(&store))));

        service.create_booking(form("11:00")).await.unwrap();
        assert_eq!(store.checks.load(Ordering::SeqCst), 0);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_store_conflict_maps_to_booking_conflict() {
        let err: BookingError = StoreError::Conflict {
            date: "2026-11-02".into(),
            time: "10:00".into(),
        }
        .into();
        assert!(matches!(err, BookingError::Conflict(slot) if slot.time == "10:00"));

        let err: BookingError = StoreError::Poisoned.into();
        assert!(matches!(err, BookingError::Store(_)));
    }

    struct SharedStore(Arc<LooseStore>);

    #[async_trait]
    impl BookingStore for SharedStore {
        async fn check_availability(&self, slot: &Slot) -> Result<SlotAvailability, StoreError> {
            self.0.check_availability(slot).await
        }

        async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, StoreError> {
            self.0.create_booking(booking).await
        }

        async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
            self.0.list_bookings().await
        }

        fn enforces_slot_uniqueness(&self) -> bool {
            self.0.enforces_slot_uniqueness()
        }
    }
}
