// =============================================================================
// Analysis Snapshot — one refresh worth of indicator output
// =============================================================================
//
// `analyze` runs the fixed pipeline over a fetched price series:
//
//   prices ─┬─ SMA(20)
//           ├─ SMA(50)
//           ├─ RSI(14)
//           └─ MACD(12, 26, 9)
//
// Each indicator is computed independently from the same price vector.  The
// snapshot keeps the raw series, the latest values, their interpretation and
// the chart payloads with every series aligned to its date labels.  A new
// snapshot replaces the previous one wholesale.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::interpretation::{Interpretation, LatestValues};
use crate::indicators::{calculate_default_macd, calculate_rsi, calculate_sma, MacdResult, RSI_PERIOD};
use crate::market_data::{pad_to_axis, AlignedSeries, DateStyle, PriceSeries};

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;

/// Indicator series computed from one price vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub prices: Vec<f64>,
    pub sma20: Vec<f64>,
    pub sma50: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: MacdResult,
}

impl IndicatorSet {
    pub fn compute(prices: Vec<f64>) -> Self {
        Self {
            sma20: calculate_sma(&prices, SMA_SHORT_PERIOD),
            sma50: calculate_sma(&prices, SMA_LONG_PERIOD),
            rsi: calculate_rsi(&prices, RSI_PERIOD),
            macd: calculate_default_macd(&prices),
            prices,
        }
    }

    pub fn latest(&self) -> LatestValues {
        let (macd, signal) = self.macd.latest().unzip();
        LatestValues {
            price: self.prices.last().copied(),
            rsi: self.rsi.last().copied(),
            sma20: self.sma20.last().copied(),
            sma50: self.sma50.last().copied(),
            macd,
            signal,
        }
    }
}

// =============================================================================
// Chart payloads
// =============================================================================

/// Price chart: raw prices plus both SMAs on the full date axis.  The SMAs
/// are left-padded with `None` so every dataset has one value per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub labels: Vec<String>,
    pub prices: Vec<f64>,
    pub sma20: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
}

/// MACD chart: the three components on a shared, trailing-sliced axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdChart {
    pub labels: Vec<String>,
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub price: PriceChart,
    pub rsi: AlignedSeries,
    pub macd: MacdChart,
}

impl Charts {
    pub fn build(axis: &[String], set: &IndicatorSet) -> Self {
        let macd_labels = AlignedSeries::trailing(axis, &set.macd.macd_line).labels;
        Self {
            price: PriceChart {
                labels: axis.to_vec(),
                prices: set.prices.clone(),
                sma20: pad_to_axis(axis.len(), &set.sma20),
                sma50: pad_to_axis(axis.len(), &set.sma50),
            },
            rsi: AlignedSeries::trailing(axis, &set.rsi),
            macd: MacdChart {
                labels: macd_labels,
                macd_line: set.macd.macd_line.clone(),
                signal_line: set.macd.signal_line.clone(),
                histogram: set.macd.histogram.clone(),
            },
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    pub asset_id: String,
    pub computed_at: DateTime<Utc>,
    pub date_style: DateStyle,
    pub points: usize,
    pub indicators: IndicatorSet,
    pub latest: LatestValues,
    pub interpretation: Interpretation,
    pub charts: Charts,
}

impl AnalysisSnapshot {
    pub fn has_data(&self) -> bool {
        self.points > 0
    }
}

/// Run the indicator pipeline over `series` for `asset_id`.
pub fn analyze(asset_id: &str, series: &PriceSeries, date_style: DateStyle) -> AnalysisSnapshot {
    let axis = series.date_axis(date_style);
    let indicators = IndicatorSet::compute(series.prices());
    let latest = indicators.latest();
    let charts = Charts::build(&axis, &indicators);

    AnalysisSnapshot {
        asset_id: asset_id.to_string(),
        computed_at: Utc::now(),
        date_style,
        points: series.len(),
        interpretation: Interpretation::from_latest(&latest),
        latest,
        indicators,
        charts,
    }
}
