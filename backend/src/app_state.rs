// =============================================================================
// Central Application State — Crypto Tracker
// =============================================================================
//
// The single source of truth shared by the tracker task and the REST API.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared values.
//   - tokio::sync::Notify to wake the tracker when the asset is switched.
//
// Snapshots are published whole (`Arc<AnalysisSnapshot>`); readers never see
// a half-updated result.
//
// Lock order: `selected_asset` first, then `latest` / `data_status`.  Every
// write to the snapshot or status holds the `selected_asset` guard so the
// stored snapshot always belongs to the selected asset.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::analysis::AnalysisSnapshot;
use crate::coingecko::rate_limit::CooldownTracker;
use crate::runtime_config::TrackerConfig;
use crate::types::{DataStatus, TrendingAsset};

// =============================================================================
// Error Record
// =============================================================================

/// A recorded error event for the API error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// Asset whose refresh failed, if any.
    pub asset: Option<String>,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

// =============================================================================
// AppState
// =============================================================================

/// Central application state shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    /// Incremented on every published snapshot, status change or asset switch.
    pub state_version: AtomicU64,

    pub config: Arc<RwLock<TrackerConfig>>,

    // ── Selection ───────────────────────────────────────────────────────
    pub selected_asset: RwLock<String>,
    pub trending: RwLock<Vec<TrendingAsset>>,

    // ── Derived data ────────────────────────────────────────────────────
    pub latest: RwLock<Option<Arc<AnalysisSnapshot>>>,
    pub data_status: RwLock<DataStatus>,

    // ── Error Log ───────────────────────────────────────────────────────
    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    /// Throttling state of the price provider, shared with the client.
    pub provider_cooldown: Arc<CooldownTracker>,

    /// Woken when the tracked asset changes so the tracker refreshes at once.
    pub asset_changed: Notify,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: TrackerConfig) -> Self {
        let asset = config.asset.clone();
        Self {
            state_version: AtomicU64::new(1),
            config: Arc::new(RwLock::new(config)),
            selected_asset: RwLock::new(asset),
            trending: RwLock::new(Vec::new()),
            latest: RwLock::new(None),
            data_status: RwLock::new(DataStatus::Loading),
            recent_errors: RwLock::new(Vec::new()),
            provider_cooldown: Arc::new(CooldownTracker::new()),
            asset_changed: Notify::new(),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version tracking ────────────────────────────────────────────────

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn selected_asset(&self) -> String {
        self.selected_asset.read().clone()
    }

    /// Switch the tracked asset.  Drops the snapshot of the previous asset
    /// and wakes the tracker.  Returns `false` if `asset` was already selected.
    pub fn select_asset(&self, asset: &str) -> bool {
        {
            let mut selected = self.selected_asset.write();
            if *selected == asset {
                return false;
            }
            *selected = asset.to_string();
            *self.latest.write() = None;
            *self.data_status.write() = DataStatus::Loading;
        }
        self.increment_version();
        self.asset_changed.notify_one();
        info!(asset, "tracked asset switched");
        true
    }

    pub fn set_trending(&self, assets: Vec<TrendingAsset>) {
        *self.trending.write() = assets;
        self.increment_version();
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Publish a fresh snapshot, replacing the previous one.
    ///
    /// A snapshot for an asset that is no longer selected is discarded and
    /// `false` is returned.
    pub fn publish_snapshot(&self, snapshot: AnalysisSnapshot) -> bool {
        {
            let selected = self.selected_asset.read();
            if snapshot.asset_id != *selected {
                debug!(asset = %snapshot.asset_id, "discarding snapshot for deselected asset");
                return false;
            }
            let updated_at = snapshot.computed_at;
            *self.latest.write() = Some(Arc::new(snapshot));
            *self.data_status.write() = DataStatus::Ready { updated_at };
        }
        self.increment_version();
        true
    }

    /// Mark the data as unavailable after a failed refresh of `asset`.
    ///
    /// The last good snapshot of the same asset stays readable.
    pub fn mark_unavailable(&self, asset: &str, reason: impl Into<String>) {
        let reason = reason.into();
        {
            let selected = self.selected_asset.read();
            if asset == *selected {
                *self.data_status.write() = DataStatus::Unavailable {
                    reason: reason.clone(),
                    since: Utc::now(),
                };
            }
        }
        self.push_error(reason, Some(asset.to_string()));
        self.increment_version();
    }

    pub fn latest_snapshot(&self) -> Option<Arc<AnalysisSnapshot>> {
        self.latest.read().clone()
    }

    /// The snapshot to serve to readers: `None` while the last refresh of
    /// the selected asset has failed or none has completed yet.
    pub fn servable_snapshot(&self) -> Option<Arc<AnalysisSnapshot>> {
        let _selected = self.selected_asset.read();
        match *self.data_status.read() {
            DataStatus::Ready { .. } => self.latest.read().clone(),
            DataStatus::Loading | DataStatus::Unavailable { .. } => None,
        }
    }

    pub fn data_status(&self) -> DataStatus {
        self.data_status.read().clone()
    }

    // ── Error log ───────────────────────────────────────────────────────

    pub fn push_error(&self, message: impl Into<String>, asset: Option<String>) {
        let mut errors = self.recent_errors.write();
        errors.push(ErrorRecord {
            message: message.into(),
            asset,
            at: Utc::now().to_rfc3339(),
        });
        if errors.len() > MAX_RECENT_ERRORS {
            let excess = errors.len() - MAX_RECENT_ERRORS;
            errors.drain(..excess);
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
