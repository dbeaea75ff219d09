use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub store_backend: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub appointments_table: String,
    pub services_table: String,
    pub slot_capacity: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Local,
    Remote,
}

impl AppConfig {
    pub fn backend(&self) -> anyhow::Result<StoreBackend> {
        match self.store_backend.as_str() {
            "local" => Ok(StoreBackend::Local),
            "remote" => Ok(StoreBackend::Remote),
            other => anyhow::bail!(
                "unknown STORE_BACKEND {other:?}, expected \"local\" or \"remote\""
            ),
        }
    }

    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "bookings.db".to_string()),
            store_backend: env::var("STORE_BACKEND").unwrap_or_else(|_| "local".to_string()),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            appointments_table: env::var("APPOINTMENTS_TABLE")
                .unwrap_or_else(|_| "appointments".to_string()),
            services_table: env::var("SERVICES_TABLE").unwrap_or_else(|_| "services".to_string()),
            slot_capacity: env::var("SLOT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(2),
        }
    }
}
