use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use quakemap::server::{start_server, AppState};
use quakemap::{FeedClient, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quakemap=info")),
        )
        .init();

    tracing::info!("🌋 QuakeMap v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load settings")?;
    tracing::info!(
        feed = settings.feed_url(),
        radius_scale = settings.radius_scale(),
        popup = settings.popup_style.name(),
        timeout_secs = settings.fetch_timeout.as_secs(),
        "📡 Earthquake feed configured"
    );

    if settings.plates_enabled() {
        let plates = settings.plates_source()?;
        tracing::info!(source = %plates.describe(), "🧩 Tectonic plates overlay enabled");
    }
    if settings.mapbox_token.is_none() {
        tracing::warn!("⚠️  No Mapbox token found, using OpenStreetMap and CARTO tiles");
        tracing::warn!("   Set MAPBOX_ACCESS_TOKEN or mapbox_token in quakemap.ini for Mapbox styles");
    }

    let client = FeedClient::new(settings.fetch_timeout).context("Failed to create feed client")?;
    let state = AppState::new(settings, client);

    start_server(state).await?;

    Ok(())
}
