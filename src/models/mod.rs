pub mod booking;
pub mod service;

pub use booking::{
    text_from_value, AppointmentStatus, Booking, BookingForm, BookingId, NewBooking, Slot,
    SlotAvailability,
};
pub use service::Service;
