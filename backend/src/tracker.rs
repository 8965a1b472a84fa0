// =============================================================================
// Tracker Loop — periodic fetch + analyze + publish
// =============================================================================
//
// Runs as a background Tokio task:
//   1. Load the trending list once (failure is logged, list stays empty).
//   2. Refresh the selected asset immediately.
//   3. Refresh again on every interval tick and whenever the asset is
//      switched through `AppState::select_asset`.
//   4. Exit when the `TrackerHandle` is shut down.
//
// Every refresh is independent: the fetched series is analyzed from scratch
// and the snapshot replaces the previous one.  Nothing is cancelled mid-way;
// a refresh that finishes after an asset switch is simply discarded by
// `AppState::publish_snapshot`.
//
//   let handle = tracker::spawn_tracker(Arc::new(client), Arc::clone(&state));
//   ...
//   handle.shutdown().await;
//
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::analysis::analyze;
use crate::app_state::AppState;
use crate::coingecko::PriceSource;

/// Cancellation handle for a running tracker task.
pub struct TrackerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "tracker task terminated abnormally");
        }
    }
}

/// Spawn the tracker loop for `state` using `source`.
pub fn spawn_tracker<S>(source: Arc<S>, state: Arc<AppState>) -> TrackerHandle
where
    S: PriceSource + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run_tracker(source, state, shutdown_rx));
    TrackerHandle { shutdown_tx, task }
}

async fn run_tracker<S: PriceSource>(
    source: Arc<S>,
    state: Arc<AppState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let period = state.config.read().refresh_interval();
    info!(interval_secs = period.as_secs(), "Tracker started");

    load_trending(source.as_ref(), &state).await;

    // The first tick completes immediately and performs the initial refresh.
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = state.asset_changed.notified() => {
                debug!("asset switch requested");
            }
            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }
        }

        let asset = state.selected_asset();
        if let Err(e) = refresh_once(source.as_ref(), &state).await {
            warn!(asset = %asset, error = %format!("{e:#}"), "refresh failed, data unavailable");
        }
    }

    info!("Tracker stopped");
}

/// Fetch the trending list into `state`.  Errors are logged and recorded.
pub async fn load_trending<S: PriceSource>(source: &S, state: &AppState) {
    match source.fetch_trending().await {
        Ok(assets) => {
            info!(count = assets.len(), "trending assets loaded");
            state.set_trending(assets);
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "failed to load trending assets");
            state.push_error(format!("trending: {e:#}"), None);
        }
    }
}

/// One full refresh of the selected asset: fetch, analyze, publish.
///
/// On failure the state is marked unavailable and the error is returned.
pub async fn refresh_once<S: PriceSource>(source: &S, state: &AppState) -> Result<()> {
    let asset = state.selected_asset();
    let (query, locale) = {
        let cfg = state.config.read();
        (cfg.history_query(), cfg.default_locale)
    };

    let series = match source
        .fetch_price_history(&asset, &query)
        .await
        .with_context(|| format!("failed to fetch price history for {asset}"))
    {
        Ok(series) => series,
        Err(e) => {
            state.mark_unavailable(&asset, format!("{e:#}"));
            return Err(e);
        }
    };

    let snapshot = analyze(&asset, &series, locale.date_style());
    if !snapshot.has_data() {
        warn!(asset = %asset, "provider returned no price points");
    }
    let points = snapshot.points;
    if state.publish_snapshot(snapshot) {
        info!(
            asset = %asset,
            points,
            latest_price = ?series.latest_price(),
            "snapshot published"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PriceSeries;
    use crate::runtime_config::TrackerConfig;
    use crate::types::{DataStatus, HistoryQuery, TrendingAsset};
    use parking_lot::Mutex;
    use std::time::Duration;

    /// In-memory provider: rising prices for every asset except `"broken"`.
    #[derive(Default)]
    struct StaticSource {
        requests: Mutex<Vec<String>>,
        fail_trending: bool,
    }

    impl PriceSource for StaticSource {
        async fn fetch_price_history(&self, asset_id: &str, query: &HistoryQuery) -> Result<PriceSeries> {
            self.requests.lock().push(asset_id.to_string());
            if asset_id == "broken" {
                anyhow::bail!("connection reset");
            }
            Ok(PriceSeries::from_pairs(
                (0..query.days as i64).map(|i| (i * 86_400_000, 10.0 + i as f64)),
            ))
        }

        async fn fetch_trending(&self) -> Result<Vec<TrendingAsset>> {
            if self.fail_trending {
                anyhow::bail!("timeout");
            }
            Ok(vec![TrendingAsset {
                id: "polkadot".into(),
                name: "Polkadot".into(),
            }])
        }
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(TrackerConfig::default()))
    }

    async fn wait_for<F: Fn() -> bool>(cond: F) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn refresh_once_publishes_snapshot() {
        let state = state();
        let source = StaticSource::default();
        refresh_once(&source, &state).await.unwrap();

        let snap = state.latest_snapshot().unwrap();
        assert_eq!(snap.asset_id, "polkadot");
        assert_eq!(snap.points, 90);
        assert_eq!(snap.indicators.rsi.len(), 76);
        assert!(matches!(state.data_status(), DataStatus::Ready { .. }));
    }

    #[tokio::test]
    async fn refresh_failure_marks_data_unavailable() {
        let state = state();
        state.select_asset("broken");
        let err = refresh_once(&StaticSource::default(), &state).await.unwrap_err();

        assert!(format!("{err:#}").contains("connection reset"));
        assert!(state.latest_snapshot().is_none());
        assert!(matches!(state.data_status(), DataStatus::Unavailable { .. }));
        assert_eq!(state.recent_errors.read().len(), 1);
    }

    #[tokio::test]
    async fn trending_failure_is_tolerated() {
        let state = state();
        let source = StaticSource {
            fail_trending: true,
            ..StaticSource::default()
        };
        load_trending(&source, &state).await;
        assert!(state.trending.read().is_empty());
        assert_eq!(state.recent_errors.read().len(), 1);
    }

    #[tokio::test]
    async fn tracker_refreshes_on_start_switch_and_stops() {
        let state = state();
        let source = Arc::new(StaticSource::default());
        let handle = spawn_tracker(Arc::clone(&source), Arc::clone(&state));

        wait_for(|| state.latest_snapshot().is_some()).await;
        assert_eq!(state.trending.read().len(), 1);

        state.select_asset("solana");
        wait_for(|| {
            state
                .latest_snapshot()
                .is_some_and(|s| s.asset_id == "solana")
        })
        .await;
        assert!(source.requests.lock().contains(&"solana".to_string()));

        handle.shutdown().await;
    }
}
