// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Walk consecutive price deltas starting at index 1.
// Step 2 — Warm-up (i in 1..=period): accumulate the raw sums of gains and
//          losses.
// Step 3 — After the warm-up apply Wilder's smoothing to the accumulators:
//            gains  = (gains  * (period - 1) + gain) / period
//            losses = (losses * (period - 1) + loss) / period
// Step 4 — From i == period on, emit one value per step:
//            RS  = gains / losses
//            RSI = 100 - 100 / (1 + RS)
//
// The warm-up sums are not divided by `period`; RS is a ratio so the first
// emitted value is unaffected, and the smoothing that follows operates on the
// undivided sums.
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// Look-back period used for the dashboard RSI.
pub const RSI_PERIOD: usize = 14;

/// Compute the full RSI series for the given `prices` and `period`.
///
/// The returned vector has `prices.len() - period` values; value `j` belongs
/// to `prices[period + j]`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `prices.len() <= period` => empty vec
/// - No losses in the window (including a flat market) => RSI is 100.0.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() <= period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut gains = 0.0_f64;
    let mut losses = 0.0_f64;
    let mut result = Vec::with_capacity(prices.len() - period);

    for (i, pair) in prices.windows(2).enumerate() {
        let step = i + 1;
        let delta = pair[1] - pair[0];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if step <= period {
            gains += gain;
            losses += loss;
        } else {
            gains = (gains * (period_f - 1.0) + gain) / period_f;
            losses = (losses * (period_f - 1.0) + loss) / period_f;
        }

        if step >= period {
            result.push(rsi_from_accumulators(gains, losses));
        }
    }

    result
}

/// Convert the gain / loss accumulators into an RSI value.
///
/// `losses == 0` makes RS infinite, which saturates RSI to exactly 100.0.
/// The flat case (`gains == 0` as well) is pinned to 100.0 instead of NaN.
fn rsi_from_accumulators(gains: f64, losses: f64) -> f64 {
    if losses == 0.0 {
        return 100.0;
    }
    let rs = gains / losses;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|x| x as f64).collect()
    }

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], RSI_PERIOD).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        assert!(calculate_rsi(&ascending(14), RSI_PERIOD).is_empty());
    }

    #[test]
    fn rsi_sixteen_ascending_prices_emit_two_saturated_values() {
        let series = calculate_rsi(&ascending(16), RSI_PERIOD);
        assert_eq!(series, vec![100.0, 100.0]);
    }

    #[test]
    fn rsi_output_length() {
        for n in [0usize, 1, 14, 15, 30, 90] {
            let prices: Vec<f64> = (0..n).map(|x| (x as f64 * 0.7).cos() + 10.0).collect();
            assert_eq!(calculate_rsi(&prices, RSI_PERIOD).len(), n.saturating_sub(14));
        }
    }

    #[test]
    fn rsi_flat_market_saturates() {
        let series = calculate_rsi(&vec![100.0; 30], RSI_PERIOD);
        assert_eq!(series.len(), 16);
        assert!(series.iter().all(|&v| v == 100.0), "{series:?}");
    }

    #[test]
    fn rsi_all_losses() {
        let prices: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&prices, RSI_PERIOD);
        assert!(!series.is_empty());
        for &v in &series {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_first_value_uses_raw_sums() {
        // Deltas over the warm-up: +2, -1, +1 => gains 3, losses 1 => RS 3.
        let series = calculate_rsi(&[10.0, 12.0, 11.0, 12.0], 3);
        assert_eq!(series.len(), 1);
        assert!((series[0] - 75.0).abs() < 1e-12, "got {}", series[0]);
    }

    #[test]
    fn rsi_smoothing_applies_after_warm_up() {
        // Warm-up (period 2): +2, -1 => gains 2, losses 1 => RSI 66.67.
        // Next delta -1: gains = (2*1 + 0)/2 = 1, losses = (1*1 + 1)/2 = 1 => 50.
        let series = calculate_rsi(&[10.0, 12.0, 11.0, 10.0], 2);
        assert_eq!(series.len(), 2);
        assert!((series[0] - 200.0 / 3.0).abs() < 1e-10, "got {}", series[0]);
        assert!((series[1] - 50.0).abs() < 1e-12, "got {}", series[1]);
    }

    #[test]
    fn rsi_range_check() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&prices, RSI_PERIOD);
        assert_eq!(series.len(), 4);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }
}
