use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use quakemap::database::Database;
use quakemap::encoder::StandardEncoding;
use quakemap::feed::FeedClient;
use quakemap::processing::{load_earthquakes, log_task_outcome, spawn_fault_lines};
use quakemap::server::{start_server, AppState};
use quakemap::settings::Settings;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quakemap=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    if !Settings::config_path().exists() {
        if let Err(e) = Settings::default().save() {
            tracing::warn!("Could not write default config: {}", e);
        }
    }

    let settings = Settings::load().context("Failed to load settings")?;
    tracing::info!(
        "QuakeMap v{} starting ({} map, config {})",
        env!("CARGO_PKG_VERSION"),
        settings.variant.as_str(),
        Settings::config_path().display()
    );
    if settings.api_key.is_empty() {
        tracing::warn!("No tile API key configured; base maps will not load");
    }

    let db = Database::new();
    let client = FeedClient::new(Duration::from_secs(settings.request_timeout_secs))
        .context("Failed to build HTTP client")?;

    // Plate boundaries land in their own group whenever they arrive
    if settings.variant.has_fault_lines() {
        // Detached: the server never waits on it
        let fault_lines =
            spawn_fault_lines(db.clone(), client.clone(), settings.fault_lines_url.clone());
        log_task_outcome("Fault line", fault_lines);
    }

    load_earthquakes(&db, &client, &settings.earthquake_url, &StandardEncoding).await;

    let state = AppState {
        db,
        settings: Arc::new(settings),
    };
    start_server(state).await
}
