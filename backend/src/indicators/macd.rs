// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd_line   = EMA(prices, fast) - EMA(prices, slow)
//   signal_line = EMA(macd_line, signal)
//   histogram   = macd_line - signal_line
//
// Both EMAs are first-price seeded (see `ema.rs`) and have the input's
// length, so the MACD line is never truncated for the slow EMA's warm-up.
// Early values are noisier than a warmed-up MACD; they are kept so every
// component stays index-aligned with the input prices.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// The three MACD components. All vectors have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    /// Most recent `(macd, signal)` pair, if any.
    pub fn latest(&self) -> Option<(f64, f64)> {
        Some((*self.macd_line.last()?, *self.signal_line.last()?))
    }
}

/// Compute MACD with the given fast / slow / signal periods.
///
/// For non-zero periods every component has `prices.len()` values.
pub fn calculate_macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdResult {
    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd_line, signal);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// MACD(12, 26, 9).
pub fn calculate_default_macd(prices: &[f64]) -> MacdResult {
    calculate_macd(prices, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD)
}
