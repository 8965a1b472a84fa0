// =============================================================================
// Indicator Interpretation — threshold rules over the latest values
// =============================================================================
//
//   RSI  < 30            => OVERSOLD
//   RSI  > 70            => OVERBOUGHT
//   price > SMA          => BULLISH   (otherwise BEARISH)
//   MACD > signal        => bullish crossover, MACD < signal => bearish
//   RSI  < 30            => overall "good day to invest", otherwise "wait"
//
// All comparisons are strict.  The classifications are plain enums; mapping
// them to localized text happens in `report.rs`.
// =============================================================================

use serde::Serialize;

use crate::i18n::MessageKey;

/// RSI below this value is oversold.
pub const RSI_OVERSOLD: f64 = 30.0;
/// RSI above this value is overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;

// =============================================================================
// Tags
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    Oversold,
    Overbought,
    Neutral,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi < RSI_OVERSOLD {
            Self::Oversold
        } else if rsi > RSI_OVERBOUGHT {
            Self::Overbought
        } else {
            Self::Neutral
        }
    }

    pub fn message_key(self) -> MessageKey {
        match self {
            Self::Oversold => MessageKey::Oversold,
            Self::Overbought => MessageKey::Overbought,
            Self::Neutral => MessageKey::Neutral,
        }
    }
}

/// Price relative to a moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    pub fn price_vs(price: f64, average: f64) -> Self {
        if price > average {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }

    pub fn message_key(self) -> MessageKey {
        match self {
            Self::Bullish => MessageKey::Bullish,
            Self::Bearish => MessageKey::Bearish,
        }
    }
}

/// Price relative to both SMA(20) and SMA(50).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SmaStack {
    AboveBoth,
    BelowBoth,
    Mixed,
}

impl SmaStack {
    pub fn classify(price: f64, sma20: f64, sma50: f64) -> Self {
        if price > sma20 && price > sma50 {
            Self::AboveBoth
        } else if price < sma20 && price < sma50 {
            Self::BelowBoth
        } else {
            Self::Mixed
        }
    }
}

/// MACD line relative to its signal line.  `None` when they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacdCrossover {
    Bullish,
    Bearish,
}

impl MacdCrossover {
    pub fn classify(macd: f64, signal: f64) -> Option<Self> {
        if macd > signal {
            Some(Self::Bullish)
        } else if macd < signal {
            Some(Self::Bearish)
        } else {
            None
        }
    }
}

/// Overall buy / wait heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentDecision {
    GoodDayToInvest,
    TimeToWait,
}

impl InvestmentDecision {
    /// A missing RSI (too little history) means wait.
    pub fn from_rsi(rsi: Option<f64>) -> Self {
        match rsi {
            Some(v) if v < RSI_OVERSOLD => Self::GoodDayToInvest,
            _ => Self::TimeToWait,
        }
    }

    pub fn message_key(self) -> MessageKey {
        match self {
            Self::GoodDayToInvest => MessageKey::GoodDayToInvestOverall,
            Self::TimeToWait => MessageKey::TimeToWaitOverall,
        }
    }
}

// =============================================================================
// Latest values
// =============================================================================

/// The most recent value of each dashboard series.  A field is `None` when
/// its series is empty (not enough history).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatestValues {
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
}

/// Classifications derived from `LatestValues`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interpretation {
    pub rsi_zone: Option<RsiZone>,
    pub sma20_trend: Option<Trend>,
    pub sma50_trend: Option<Trend>,
    pub sma_stack: Option<SmaStack>,
    pub macd_crossover: Option<MacdCrossover>,
    pub decision: InvestmentDecision,
}

impl Interpretation {
    pub fn from_latest(latest: &LatestValues) -> Self {
        let trend = |sma: Option<f64>| Some(Trend::price_vs(latest.price?, sma?));
        Self {
            rsi_zone: latest.rsi.map(RsiZone::classify),
            sma20_trend: trend(latest.sma20),
            sma50_trend: trend(latest.sma50),
            sma_stack: match (latest.price, latest.sma20, latest.sma50) {
                (Some(p), Some(s20), Some(s50)) => Some(SmaStack::classify(p, s20, s50)),
                _ => None,
            },
            macd_crossover: match (latest.macd, latest.signal) {
                (Some(m), Some(s)) => MacdCrossover::classify(m, s),
                _ => None,
            },
            decision: InvestmentDecision::from_rsi(latest.rsi),
        }
    }
}

// =============================================================================
// Investment calculator
// =============================================================================

/// Result of checking an investment amount against the latest indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculatorOutcome {
    /// Amount missing, zero or negative.
    InvalidAmount,
    /// Oversold and below SMA(20): buy at the current price.
    Invest { amount: f64, optimal_price: f64 },
    /// Any other situation.
    Wait { current_price: f64 },
}

/// Decide whether `amount` should be invested now.
///
/// Both conditions require their inputs; a missing RSI, SMA(20) or price is
/// treated as "not optimal".  A missing price reports as 0.
pub fn evaluate_investment(amount: Option<f64>, latest: &LatestValues) -> CalculatorOutcome {
    let amount = match amount {
        Some(a) if a > 0.0 => a,
        _ => return CalculatorOutcome::InvalidAmount,
    };

    let price = latest.price.unwrap_or(0.0);
    let favourable = match (latest.rsi, latest.price, latest.sma20) {
        (Some(rsi), Some(p), Some(sma20)) => rsi < RSI_OVERSOLD && p < sma20,
        _ => false,
    };

    if favourable {
        CalculatorOutcome::Invest {
            amount,
            optimal_price: price,
        }
    } else {
        CalculatorOutcome::Wait {
            current_price: price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest(price: f64, rsi: f64, sma20: f64, sma50: f64, macd: f64, signal: f64) -> LatestValues {
        LatestValues {
            price: Some(price),
            rsi: Some(rsi),
            sma20: Some(sma20),
            sma50: Some(sma50),
            macd: Some(macd),
            signal: Some(signal),
        }
    }

    #[test]
    fn rsi_thresholds_are_strict() {
        assert_eq!(RsiZone::classify(29.99), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(30.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(70.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(70.01), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(100.0), RsiZone::Overbought);
    }

    #[test]
    fn price_equal_to_sma_is_bearish() {
        assert_eq!(Trend::price_vs(10.0, 10.0), Trend::Bearish);
        assert_eq!(Trend::price_vs(10.5, 10.0), Trend::Bullish);
    }

    #[test]
    fn sma_stack() {
        assert_eq!(SmaStack::classify(12.0, 11.0, 10.0), SmaStack::AboveBoth);
        assert_eq!(SmaStack::classify(9.0, 11.0, 10.0), SmaStack::BelowBoth);
        assert_eq!(SmaStack::classify(10.5, 11.0, 10.0), SmaStack::Mixed);
        assert_eq!(SmaStack::classify(10.0, 10.0, 12.0), SmaStack::Mixed);
    }

    #[test]
    fn macd_crossover() {
        assert_eq!(MacdCrossover::classify(0.2, 0.1), Some(MacdCrossover::Bullish));
        assert_eq!(MacdCrossover::classify(-0.2, 0.1), Some(MacdCrossover::Bearish));
        assert_eq!(MacdCrossover::classify(0.1, 0.1), None);
    }

    #[test]
    fn decision_follows_rsi_only() {
        assert_eq!(InvestmentDecision::from_rsi(Some(25.0)), InvestmentDecision::GoodDayToInvest);
        assert_eq!(InvestmentDecision::from_rsi(Some(30.0)), InvestmentDecision::TimeToWait);
        assert_eq!(InvestmentDecision::from_rsi(None), InvestmentDecision::TimeToWait);
    }

    #[test]
    fn interpretation_with_full_data() {
        let i = Interpretation::from_latest(&latest(5.0, 75.0, 4.0, 4.5, 0.3, 0.1));
        assert_eq!(i.rsi_zone, Some(RsiZone::Overbought));
        assert_eq!(i.sma20_trend, Some(Trend::Bullish));
        assert_eq!(i.sma50_trend, Some(Trend::Bullish));
        assert_eq!(i.sma_stack, Some(SmaStack::AboveBoth));
        assert_eq!(i.macd_crossover, Some(MacdCrossover::Bullish));
        assert_eq!(i.decision, InvestmentDecision::TimeToWait);
    }

    #[test]
    fn interpretation_with_short_history() {
        let values = LatestValues {
            price: Some(5.0),
            sma20: Some(5.5),
            macd: Some(0.0),
            signal: Some(0.0),
            ..LatestValues::default()
        };
        let i = Interpretation::from_latest(&values);
        assert_eq!(i.rsi_zone, None);
        assert_eq!(i.sma20_trend, Some(Trend::Bearish));
        assert_eq!(i.sma50_trend, None);
        assert_eq!(i.sma_stack, None);
        assert_eq!(i.macd_crossover, None);
        assert_eq!(i.decision, InvestmentDecision::TimeToWait);
    }

    #[test]
    fn calculator_rejects_invalid_amounts() {
        let values = latest(5.0, 20.0, 6.0, 6.0, 0.0, 0.0);
        assert_eq!(evaluate_investment(None, &values), CalculatorOutcome::InvalidAmount);
        assert_eq!(evaluate_investment(Some(0.0), &values), CalculatorOutcome::InvalidAmount);
        assert_eq!(evaluate_investment(Some(-10.0), &values), CalculatorOutcome::InvalidAmount);
    }

    #[test]
    fn calculator_invests_when_oversold_below_sma20() {
        let values = latest(5.0, 20.0, 6.0, 6.0, 0.0, 0.0);
        assert_eq!(
            evaluate_investment(Some(100.0), &values),
            CalculatorOutcome::Invest {
                amount: 100.0,
                optimal_price: 5.0
            }
        );
    }

    #[test]
    fn calculator_waits_otherwise() {
        // Oversold but above SMA(20).
        let values = latest(7.0, 20.0, 6.0, 6.0, 0.0, 0.0);
        assert_eq!(
            evaluate_investment(Some(100.0), &values),
            CalculatorOutcome::Wait { current_price: 7.0 }
        );
        // Below SMA(20) but not oversold.
        let values = latest(5.0, 45.0, 6.0, 6.0, 0.0, 0.0);
        assert_eq!(
            evaluate_investment(Some(100.0), &values),
            CalculatorOutcome::Wait { current_price: 5.0 }
        );
        // No data at all.
        assert_eq!(
            evaluate_investment(Some(100.0), &LatestValues::default()),
            CalculatorOutcome::Wait { current_price: 0.0 }
        );
    }
}
