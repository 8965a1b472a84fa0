// =============================================================================
// Tracker Configuration — JSON settings with atomic save
// =============================================================================
//
// Every tunable of the tracker lives here: which asset to follow, the history
// window requested from the provider, the refresh cadence, the default display
// language and where the API listens.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coingecko::DEFAULT_BASE_URL;
use crate::i18n::Locale;
use crate::types::HistoryQuery;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_asset() -> String {
    "polkadot".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_history_days() -> u32 {
    90
}

fn default_interval() -> String {
    "daily".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    20
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// TrackerConfig
// =============================================================================

/// Top-level configuration for the tracker.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    // --- Asset & history window ---------------------------------------------

    /// Provider id of the asset tracked at startup.
    #[serde(default = "default_asset")]
    pub asset: String,

    /// Quote currency for prices.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// Days of history requested per refresh.
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// Sampling interval requested from the provider.
    #[serde(default = "default_interval")]
    pub interval: String,

    // --- Scheduling ---------------------------------------------------------

    /// Seconds between automatic refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-request HTTP timeout towards the provider.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // --- Provider & presentation --------------------------------------------

    #[serde(default = "default_base_url")]
    pub coingecko_base_url: String,

    /// Language used when a request does not name one.
    #[serde(default)]
    pub default_locale: Locale,

    /// Address the REST API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            asset: default_asset(),
            vs_currency: default_vs_currency(),
            history_days: default_history_days(),
            interval: default_interval(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            coingecko_base_url: default_base_url(),
            default_locale: Locale::default(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tracker config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse tracker config from {}", path.display()))?;

        info!(
            path = %path.display(),
            asset = %config.asset,
            refresh_secs = config.refresh_interval_secs,
            "tracker config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise tracker config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "tracker config saved (atomic)");
        Ok(())
    }

    pub fn history_query(&self) -> HistoryQuery {
        HistoryQuery {
            vs_currency: self.vs_currency.clone(),
            days: self.history_days,
            interval: self.interval.clone(),
        }
    }

    /// Refresh period, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
