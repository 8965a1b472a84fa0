// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_0      = price_0
//   EMA_t      = (price_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The series is seeded with the first raw price, not with an SMA of the first
// `period` prices, so there is no warm-up truncation: the output always has
// the same length as the input. Existing MACD charts depend on this exact
// seeding.
// =============================================================================

/// Compute the EMA series for the given `prices` and look-back `period`.
///
/// Output element `i` corresponds to `prices[i]`.
///
/// # Edge cases
/// - `prices` empty => empty vec
/// - `period == 0` => empty vec
pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = prices.first() else {
        return Vec::new();
    };
    if period == 0 {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let mut result = Vec::with_capacity(prices.len());
    result.push(first);

    let mut prev = first;
    for &price in &prices[1..] {
        let ema = (price - prev) * multiplier + prev;
        result.push(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_known_values() {
        let ema = calculate_ema(&[10.0, 20.0, 30.0], 2);
        assert_eq!(ema.len(), 3);
        assert_eq!(ema[0], 10.0);
        assert!((ema[1] - 16.666_666_666_666_668).abs() < 1e-12, "got {}", ema[1]);
        assert!((ema[2] - 25.555_555_555_555_557).abs() < 1e-12, "got {}", ema[2]);
    }

    #[test]
    fn ema_seeds_from_first_price() {
        let ema = calculate_ema(&[7.5, 7.5, 7.5], 26);
        assert_eq!(ema, vec![7.5, 7.5, 7.5]);
    }

    #[test]
    fn ema_length_equals_input_length() {
        let prices: Vec<f64> = (1..=40).map(|x| (x as f64).sin() + 5.0).collect();
        for period in [1, 9, 12, 26, 100] {
            assert_eq!(calculate_ema(&prices, period).len(), prices.len());
        }
    }

    #[test]
    fn ema_period_one_tracks_price() {
        // multiplier == 1 => every value is the raw price.
        let prices = vec![3.0, 8.0, 1.0, 4.0];
        assert_eq!(calculate_ema(&prices, 1), prices);
    }

    #[test]
    fn ema_single_value() {
        assert_eq!(calculate_ema(&[42.0], 12), vec![42.0]);
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }
}
