// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean over a sliding window of `period` prices.
//
//   SMA_i = (p_i + p_{i+1} + ... + p_{i+period-1}) / period
//
// One value is emitted per full window, so the series is trailing-aligned with
// the input: value `i` belongs to the price at index `i + period - 1`.
// =============================================================================

/// Compute the SMA series for `prices` over windows of `period` values.
///
/// Returns `max(0, prices.len() - period + 1)` values.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `prices.len() < period` => empty vec
pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let divisor = period as f64;
    // Each window is summed afresh; a running sum drifts away from the exact
    // mean on long series.
    prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / divisor)
        .collect()
}
