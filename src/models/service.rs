use serde::{Deserialize, Serialize};

/// An entry in the salon's service catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
