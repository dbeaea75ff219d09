use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use nailbook::config::{AppConfig, StoreBackend};
use nailbook::db;
use nailbook::handlers;
use nailbook::services::BookingService;
use nailbook::state::AppState;
use nailbook::store::sqlite::SqliteStore;
use nailbook::store::supabase::SupabaseStore;
use nailbook::store::BookingStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store: Box<dyn BookingStore> = match config.backend()? {
        StoreBackend::Remote => {
            anyhow::ensure!(
                !config.supabase_url.is_empty() && !config.supabase_anon_key.is_empty(),
                "SUPABASE_URL and SUPABASE_ANON_KEY must be set when STORE_BACKEND=remote"
            );
            tracing::info!(
                "using hosted store at {} (slot capacity: {})",
                config.supabase_url,
                config.slot_capacity
            );
            Box::new(SupabaseStore::new(
                config.supabase_url.clone(),
                config.supabase_anon_key.clone(),
                config.appointments_table.clone(),
                config.services_table.clone(),
                config.slot_capacity,
            ))
        }
        StoreBackend::Local => {
            tracing::info!("using local store at {}", config.database_url);
            Box::new(SqliteStore::new(db::init_db(&config.database_url)?))
        }
    };

    let state = Arc::new(AppState {
        bookings: BookingService::new(store),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router, and with it the store connection, is dropped by now.
    tracing::info!("server stopped, store closed");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
