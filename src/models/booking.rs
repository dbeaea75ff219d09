use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier assigned by the store. SQLite hands out integers, the hosted
/// backend may use either integers or UUID strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BookingId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingId::Int(id) => write!(f, "{id}"),
            BookingId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Statuses that occupy a slot.
    pub const NON_TERMINAL: [AppointmentStatus; 2] =
        [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Unknown statuses yield `None` rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            "completed" => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !Self::NON_TERMINAL.contains(self)
    }
}

/// Raw booking submission, exactly as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Catalogue ids arrive as either strings or numbers.
    #[serde(deserialize_with = "deserialize_text")]
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl BookingForm {
    /// Only meaningful once the form has passed validation; absent fields
    /// become empty strings.
    pub fn into_new_booking(self) -> NewBooking {
        NewBooking {
            name: self.name.unwrap_or_default().trim().to_string(),
            phone: self.phone.unwrap_or_default().trim().to_string(),
            service: self.service.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            time: self.time.unwrap_or_default(),
        }
    }
}

/// Text form of a scalar JSON value; `None` for null, arrays and objects.
pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => text_from_value(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a string or number")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

impl NewBooking {
    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

/// A bookable (date, time) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    pub available: bool,
    pub conflicting: usize,
}

impl SlotAvailability {
    pub fn from_count(conflicting: usize, capacity: usize) -> Self {
        Self {
            available: conflicting < capacity,
            conflicting,
        }
    }
}
