use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use regex::Regex;

use crate::models::BookingForm;

pub const NAME_REQUIRED: &str = "Name is required";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_INVALID: &str =
    "Please enter a valid Kenyan phone number (e.g., 0712345678 or 254712345678)";
pub const SERVICE_REQUIRED: &str = "Please select a service";
pub const DATE_REQUIRED: &str = "Please select a date";
pub const TIME_REQUIRED: &str = "Please select a time";
pub const DATE_INVALID: &str = "Please select a valid date";
pub const DATE_IN_PAST: &str = "Please select a future date";
pub const CLOSED_ON_SUNDAY: &str = "We are closed on Sundays. Please select another day.";

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^(?:\+?254|0)[17][0-9]{8}$").expect("Invalid phone regex")
    })
}

/// Kenyan mobile number: `07…`/`01…`, optionally with a `254`/`+254` prefix
/// in place of the leading zero. Whitespace is ignored.
pub fn validate_phone_number(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    phone_regex().is_match(&compact)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn is_missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

pub fn validate_booking_form(form: &BookingForm) -> Vec<String> {
    validate_booking_form_on(form, Local::now().date_naive())
}

/// Every failing rule contributes a message, in a fixed order.
pub fn validate_booking_form_on(form: &BookingForm, today: NaiveDate) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&form.name) {
        errors.push(NAME_REQUIRED.to_string());
    }
    if is_blank(&form.phone) {
        errors.push(PHONE_REQUIRED.to_string());
    }
    if !validate_phone_number(form.phone.as_deref().unwrap_or("")) {
        errors.push(PHONE_INVALID.to_string());
    }
    if is_missing(&form.service) {
        errors.push(SERVICE_REQUIRED.to_string());
    }
    if is_missing(&form.date) {
        errors.push(DATE_REQUIRED.to_string());
    }
    if is_missing(&form.time) {
        errors.push(TIME_REQUIRED.to_string());
    }

    if let Some(raw) = form.date.as_deref().filter(|d| !d.is_empty()) {
        match parse_date(raw) {
            Some(date) => {
                if date < today {
                    errors.push(DATE_IN_PAST.to_string());
                }
                if date.weekday() == Weekday::Sun {
                    errors.push(CLOSED_ON_SUNDAY.to_string());
                }
            }
            None => errors.push(DATE_INVALID.to_string()),
        }
    }

    errors
}

/// Accepts a plain ISO date or the date part of an ISO timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
