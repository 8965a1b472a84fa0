// =============================================================================
// Price Source — the external data provider seam
// =============================================================================
//
// The tracker only needs two things from a provider: a historical price
// series for one asset and a list of trending assets.  `CoinGeckoClient` is
// the production implementation; tests plug in static sources.

pub mod client;
pub mod rate_limit;

use std::future::Future;

use anyhow::Result;

use crate::market_data::PriceSeries;
use crate::types::{HistoryQuery, TrendingAsset};

pub use client::{CoinGeckoClient, DEFAULT_BASE_URL};

/// Provider of historical prices and trending assets.
///
/// Implementations must tolerate provider omissions: an asset without data
/// yields an empty series and an empty trending list is not an error.
pub trait PriceSource: Send + Sync {
    /// Price history for `asset_id`, chronologically ascending.
    fn fetch_price_history(
        &self,
        asset_id: &str,
        query: &HistoryQuery,
    ) -> impl Future<Output = Result<PriceSeries>> + Send;

    fn fetch_trending(&self) -> impl Future<Output = Result<Vec<TrendingAsset>>> + Send;
}
