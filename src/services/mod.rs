pub mod booking;
pub mod validation;

pub use booking::{BookingError, BookingService};
