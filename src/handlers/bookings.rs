use std::sync::Arc;

use axum::extract::{FromRequest, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Booking, BookingForm, BookingId, Service, Slot};
use crate::state::AppState;

// GET /api/check-availability
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    available: bool,
    message: &'static str,
    conflicting_bookings: usize,
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let (date, time) = match (query.date, query.time) {
        (Some(date), Some(time)) if !date.is_empty() && !time.is_empty() => (date, time),
        _ => return Err(AppError::MissingParams("Date and time are required")),
    };

    let availability = state
        .bookings
        .check_availability(&Slot { date, time })
        .await
        .map_err(AppError::Availability)?;

    Ok(Json(AvailabilityResponse {
        available: availability.available,
        message: if availability.available {
            "Available"
        } else {
            "Already booked"
        },
        conflicting_bookings: availability.conflicting,
    }))
}

// POST /api/bookings
/// JSON body whose rejections surface as 400s in the API's error shape.
#[derive(FromRequest, Deserialize)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct BookingPayload(BookingForm);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    success: bool,
    message: &'static str,
    booking_id: BookingId,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    BookingPayload(form): BookingPayload,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let booking = state.bookings.create_booking(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: "Booking confirmed successfully",
            booking_id: booking.id,
        }),
    ))
}

// GET /api/bookings
#[derive(Serialize)]
pub struct BookingsResponse {
    bookings: Vec<Booking>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookingsResponse>, AppError> {
    let bookings = state.bookings.list_bookings().await?;
    Ok(Json(BookingsResponse { bookings }))
}

// GET /api/services
#[derive(Serialize)]
pub struct ServicesResponse {
    services: Vec<Service>,
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServicesResponse>, AppError> {
    let services = state.bookings.list_services().await?;
    Ok(Json(ServicesResponse { services }))
}
