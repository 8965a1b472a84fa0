// =============================================================================
// CoinGecko REST Client — historical prices and trending assets
// =============================================================================
//
// Endpoints used:
//   GET /coins/{id}/market_chart?vs_currency=..&days=..&interval=..
//   GET /search/trending
//
// Provider payloads are decoded leniently: missing arrays decode as empty,
// malformed price pairs are skipped.  Non-2xx statuses become errors with the
// response body attached; a 429 also arms the cooldown tracker.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::coingecko::rate_limit::CooldownTracker;
use crate::coingecko::PriceSource;
use crate::market_data::PriceSeries;
use crate::types::{HistoryQuery, TrendingAsset};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying a CoinGecko demo-plan API key.
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

// =============================================================================
// Payload decoding
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingCoin>,
}

#[derive(Debug, Deserialize)]
struct TrendingCoin {
    item: Option<TrendingItem>,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: Option<String>,
    name: Option<String>,
}

/// Decode a `market_chart` body into a price series.
///
/// Each entry must be a `[timestamp_ms, price]` array of two numbers;
/// anything else is skipped.
pub fn parse_market_chart(body: &str) -> Result<PriceSeries> {
    let resp: MarketChartResponse =
        serde_json::from_str(body).context("failed to parse market_chart response")?;

    let pairs = resp.prices.iter().filter_map(|entry| {
        let pair = entry.as_array()?;
        match pair.as_slice() {
            [ts, price] => Some((ts.as_f64()? as i64, price.as_f64()?)),
            _ => None,
        }
    });

    Ok(PriceSeries::from_pairs(pairs.collect::<Vec<_>>()))
}

/// Decode a `search/trending` body; coins without an id are dropped and a
/// missing name falls back to the id.
pub fn parse_trending(body: &str) -> Result<Vec<TrendingAsset>> {
    let resp: TrendingResponse =
        serde_json::from_str(body).context("failed to parse trending response")?;

    Ok(resp
        .coins
        .into_iter()
        .filter_map(|coin| {
            let item = coin.item?;
            let id = item.id.filter(|id| !id.is_empty())?;
            let name = item.name.unwrap_or_else(|| id.clone());
            Some(TrendingAsset { id, name })
        })
        .collect())
}

// =============================================================================
// Client
// =============================================================================

/// CoinGecko REST API client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
    cooldown: Arc<CooldownTracker>,
}

impl CoinGeckoClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` — API root, e.g. [`DEFAULT_BASE_URL`].
    /// * `api_key`  — optional demo-plan key, sent as a header.
    /// * `timeout`  — per-request timeout.
    /// * `cooldown` — throttling tracker, usually `AppState::provider_cooldown`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        cooldown: Arc<CooldownTracker>,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let val = HeaderValue::from_str(&key).context("CoinGecko API key is not a valid header value")?;
            default_headers.insert(API_KEY_HEADER, val);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "CoinGeckoClient initialised");

        Ok(Self {
            base_url,
            client,
            cooldown,
        })
    }

    pub fn market_chart_url(&self, asset_id: &str, query: &HistoryQuery) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval={}",
            self.base_url, asset_id, query.vs_currency, query.days, query.interval
        )
    }

    pub fn trending_url(&self) -> String {
        format!("{}/search/trending", self.base_url)
    }

    /// GET `url` and return the body of a successful response.
    async fn get_text(&self, url: &str) -> Result<String> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        if self.cooldown.is_cooling_down(now_ms) {
            anyhow::bail!(
                "CoinGecko rate limit cooldown active ({}s remaining)",
                self.cooldown.remaining_secs(now_ms)
            );
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} request failed"))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            self.cooldown
                .record_throttled(resp.headers(), chrono::Utc::now().timestamp_millis());
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read response body from {url}"))?;

        if !status.is_success() {
            anyhow::bail!("CoinGecko GET {} returned {}: {}", url, status, body);
        }

        self.cooldown.reset();
        Ok(body)
    }
}

impl PriceSource for CoinGeckoClient {
    #[instrument(skip(self, query), name = "coingecko::fetch_price_history")]
    async fn fetch_price_history(&self, asset_id: &str, query: &HistoryQuery) -> Result<PriceSeries> {
        let url = self.market_chart_url(asset_id, query);
        let body = self.get_text(&url).await?;
        let series = parse_market_chart(&body)
            .with_context(|| format!("bad market_chart payload for {asset_id}"))?;
        debug!(points = series.len(), "price history retrieved");
        Ok(series)
    }

    #[instrument(skip(self), name = "coingecko::fetch_trending")]
    async fn fetch_trending(&self) -> Result<Vec<TrendingAsset>> {
        let body = self.get_text(&self.trending_url()).await?;
        let assets = parse_trending(&body)?;
        debug!(count = assets.len(), "trending assets retrieved");
        Ok(assets)
    }
}
