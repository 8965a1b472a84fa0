// =============================================================================
// Crypto Tracker — Main Entry Point
// =============================================================================
//
// Follows one asset's daily price history, recomputes SMA/EMA/RSI/MACD on
// every refresh and serves the localized analysis over REST.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod coingecko;
mod i18n;
mod indicators;
mod market_data;
mod runtime_config;
mod tracker;
mod types;

use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::coingecko::CoinGeckoClient;
use crate::i18n::Locale;
use crate::runtime_config::TrackerConfig;

const CONFIG_PATH: &str = "tracker_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Crypto Tracker starting up");

    let mut config = TrackerConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        TrackerConfig::default()
    });

    if let Ok(asset) = std::env::var("TRACKER_ASSET") {
        let asset = asset.trim().to_lowercase();
        if !asset.is_empty() {
            config.asset = asset;
        }
    }
    if let Ok(addr) = std::env::var("TRACKER_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(tag) = std::env::var("TRACKER_LOCALE") {
        config.default_locale = Locale::from_tag(&tag);
    }
    let api_key = std::env::var("COINGECKO_API_KEY").ok();

    info!(
        asset = %config.asset,
        days = config.history_days,
        refresh_secs = config.refresh_interval_secs,
        locale = %config.default_locale,
        "Tracker configured"
    );

    // ── 2. Build shared state & provider client ──────────────────────────
    let base_url = config.coingecko_base_url.clone();
    let timeout = config.request_timeout();
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    let client = Arc::new(CoinGeckoClient::new(
        base_url,
        api_key,
        timeout,
        state.provider_cooldown.clone(),
    )?);

    // ── 3. Tracker loop ──────────────────────────────────────────────────
    let handle = tracker::spawn_tracker(client, state.clone());

    // ── 4. Start the API server ──────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received, stopping gracefully");

    handle.shutdown().await;

    let mut config = state.config.read().clone();
    config.asset = state.selected_asset();
    if let Err(e) = config.save(CONFIG_PATH) {
        error!(error = %e, "Failed to save tracker config on shutdown");
    }

    info!("Crypto Tracker shut down complete.");
    Ok(())
}
