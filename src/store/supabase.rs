use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{BookingStore, StoreError};
use crate::models::{
    text_from_value, AppointmentStatus, Booking, BookingId, NewBooking, Service, Slot,
    SlotAvailability,
};

/// Postgres error code for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Hosted table backend speaking the PostgREST dialect. Availability and
/// insert are separate requests, so slot capacity is a soft limit here.
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    appointments_table: String,
    services_table: String,
    slot_capacity: usize,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct NewAppointmentRow<'a> {
    customer_name: &'a str,
    customer_phone: &'a str,
    service_id: &'a str,
    appointment_date: &'a str,
    appointment_time: &'a str,
    status: AppointmentStatus,
}

/// Row as the backend returns it. Column types vary between deployments
/// (`service_id` may reference an integer key), so decoding is lenient.
#[derive(Debug, Deserialize)]
struct AppointmentRow {
    id: Option<BookingId>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    service_id: Option<serde_json::Value>,
    appointment_date: String,
    appointment_time: String,
    status: Option<String>,
    created_at: Option<String>,
}

impl TryFrom<AppointmentRow> for Booking {
    type Error = StoreError;

    fn try_from(row: AppointmentRow) -> Result<Self, StoreError> {
        let id = row.id.ok_or_else(|| StoreError::Backend {
            status: 200,
            code: None,
            message: "appointment row has no id".to_string(),
        })?;

        Ok(Booking {
            id,
            name: row.customer_name.unwrap_or_default(),
            phone: row.customer_phone.unwrap_or_default(),
            service: row
                .service_id
                .as_ref()
                .and_then(text_from_value)
                .unwrap_or_default(),
            date: row.appointment_date,
            time: row.appointment_time,
            status: row.status.as_deref().and_then(AppointmentStatus::parse),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl SupabaseStore {
    pub fn new(
        base_url: String,
        api_key: String,
        appointments_table: String,
        services_table: String,
        slot_capacity: usize,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            appointments_table,
            services_table,
            slot_capacity,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let resp = self.authorized(req).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await?;
        let parsed: Option<BackendErrorBody> = serde_json::from_str(&body).ok();
        let (code, message) = match parsed {
            Some(b) => (b.code, b.message.unwrap_or_else(|| body.clone())),
            None => (None, body),
        };
        Err(StoreError::Backend {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl BookingStore for SupabaseStore {
    async fn check_availability(&self, slot: &Slot) -> Result<SlotAvailability, StoreError> {
        let statuses = AppointmentStatus::NON_TERMINAL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let req = self
            .client
            .get(self.table_url(&self.appointments_table))
            .query(&[
                ("select", "id".to_string()),
                ("appointment_date", format!("eq.{}", slot.date)),
                ("appointment_time", format!("eq.{}", slot.time)),
                ("status", format!("in.({statuses})")),
            ]);

        let rows: Vec<serde_json::Value> = self.send(req).await?.json().await?;
        Ok(SlotAvailability::from_count(rows.len(), self.slot_capacity))
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, StoreError> {
        let row = NewAppointmentRow {
            customer_name: &booking.name,
            customer_phone: &booking.phone,
            service_id: &booking.service,
            appointment_date: &booking.date,
            appointment_time: &booking.time,
            status: AppointmentStatus::Pending,
        };

        let req = self
            .client
            .post(self.table_url(&self.appointments_table))
            .header("Prefer", "return=representation")
            .json(&[row]);

        let created: Vec<AppointmentRow> = match self.send(req).await {
            Ok(resp) => resp.json().await?,
            Err(StoreError::Backend { code: Some(code), .. }) if code == UNIQUE_VIOLATION => {
                return Err(StoreError::Conflict {
                    date: booking.date.clone(),
                    time: booking.time.clone(),
                });
            }
            Err(e) => return Err(e),
        };

        created
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend {
                status: 200,
                code: None,
                message: "insert returned no rows".to_string(),
            })
            .and_then(Booking::try_from)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let req = self
            .client
            .get(self.table_url(&self.appointments_table))
            .query(&[
                ("select", "*"),
                ("order", "appointment_date.asc,appointment_time.asc"),
            ]);

        let rows: Vec<AppointmentRow> = self.send(req).await?.json().await?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let req = self
            .client
            .get(self.table_url(&self.services_table))
            .query(&[
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "category.asc,price.asc"),
            ]);

        Ok(self.send(req).await?.json().await?)
    }

    fn enforces_slot_uniqueness(&self) -> bool {
        false
    }
}
