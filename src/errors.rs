use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::services::BookingError;
use crate::store::StoreError;

pub const SLOT_TAKEN_MESSAGE: &str =
    "This time slot is already booked. Please choose a different time.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("missing parameters: {0}")]
    MissingParams(&'static str),

    #[error("slot already booked")]
    Conflict,

    #[error("availability check failed: {0}")]
    Availability(StoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Invalid(errors) => AppError::Validation(errors),
            BookingError::Conflict(_) => AppError::Conflict,
            BookingError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": "Validation failed",
                    "message": errors.join(" "),
                    "errors": errors,
                }),
            ),
            AppError::BadRequest(detail) => {
                tracing::warn!(detail = %detail, "rejected booking payload");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "success": false,
                        "error": "Invalid request",
                        "message": "Request body must be a JSON object with name, phone, service, date and time.",
                    }),
                )
            }
            AppError::MissingParams(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::Conflict => (
                StatusCode::CONFLICT,
                json!({
                    "success": false,
                    "error": "Already booked",
                    "message": SLOT_TAKEN_MESSAGE,
                }),
            ),
            AppError::Availability(e) => {
                tracing::error!(error = %e, "failed to check availability");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "available": false,
                        "error": "Internal server error",
                        "message": "Could not verify availability. Please try again.",
                    }),
                )
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "Internal server error",
                        "message": "Failed to process request. Please try again.",
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
