// =============================================================================
// Localized Report — presentation payload built from a snapshot
// =============================================================================
//
// Maps the numeric snapshot to display strings for one locale:
//   - indicator summary table (RSI / SMA to 2 dp, MACD / signal to 4 dp)
//   - dynamic analysis paragraph
//   - overall decision text
//   - chart datasets with localized labels
// =============================================================================

use serde::Serialize;

use crate::analysis::interpretation::{
    CalculatorOutcome, MacdCrossover, RsiZone, SmaStack, Trend,
};
use crate::analysis::snapshot::{AnalysisSnapshot, Charts};
use crate::i18n::{render, translate, Locale, MessageKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub name: &'static str,
    pub value: String,
    /// Empty when the row has no interpretation or the value is missing.
    pub interpretation: String,
}

/// Dataset label for each chart series, in the report's locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLabels {
    pub price: String,
    pub sma20: String,
    pub sma50: String,
    pub rsi: String,
    pub macd_line: String,
    pub signal_line: String,
    pub histogram: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedReport {
    pub asset_id: String,
    pub locale: Locale,
    pub current_price: Option<f64>,
    pub summary: Vec<SummaryRow>,
    pub analysis_text: String,
    pub decision: String,
    pub chart_labels: ChartLabels,
    pub charts: Charts,
}

/// `polkadot` → `Polkadot`.
pub fn display_name(asset_id: &str) -> String {
    let mut chars = asset_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

impl LocalizedReport {
    pub fn build(snapshot: &AnalysisSnapshot, locale: Locale) -> Self {
        let latest = &snapshot.latest;
        let interp = &snapshot.interpretation;
        let tag = |key: Option<MessageKey>| key.map(|k| translate(locale, k)).unwrap_or_default();

        let summary = vec![
            SummaryRow {
                name: "RSI (14)",
                value: fixed(latest.rsi, 2),
                interpretation: tag(interp.rsi_zone.map(RsiZone::message_key)),
            },
            SummaryRow {
                name: "SMA (20)",
                value: fixed(latest.sma20, 2),
                interpretation: tag(interp.sma20_trend.map(Trend::message_key)),
            },
            SummaryRow {
                name: "SMA (50)",
                value: fixed(latest.sma50, 2),
                interpretation: tag(interp.sma50_trend.map(Trend::message_key)),
            },
            SummaryRow {
                name: "MACD Line",
                value: fixed(latest.macd, 4),
                interpretation: String::new(),
            },
            SummaryRow {
                name: "Signal Line",
                value: fixed(latest.signal, 4),
                interpretation: String::new(),
            },
        ];

        let crypto = display_name(&snapshot.asset_id);

        Self {
            asset_id: snapshot.asset_id.clone(),
            locale,
            current_price: latest.price,
            summary,
            analysis_text: analysis_text(snapshot, &crypto, locale),
            decision: translate(locale, interp.decision.message_key()),
            chart_labels: ChartLabels {
                price: render(locale, MessageKey::PriceHistoryLabel, &[("crypto", crypto.as_str())]),
                sma20: translate(locale, MessageKey::Sma20),
                sma50: translate(locale, MessageKey::Sma50),
                rsi: translate(locale, MessageKey::Rsi14Day),
                macd_line: translate(locale, MessageKey::MacdLine),
                signal_line: translate(locale, MessageKey::SignalLine),
                histogram: translate(locale, MessageKey::Histogram),
            },
            charts: snapshot.charts.clone(),
        }
    }
}

/// Heading plus one sentence per noteworthy condition, space-separated.
fn analysis_text(snapshot: &AnalysisSnapshot, crypto: &str, locale: Locale) -> String {
    let latest = &snapshot.latest;
    let interp = &snapshot.interpretation;
    let mut parts = vec![render(locale, MessageKey::AnalysisFor, &[("crypto", crypto)])];

    let rsi = fixed(latest.rsi, 2);
    match interp.rsi_zone {
        Some(RsiZone::Oversold) => {
            parts.push(render(locale, MessageKey::RsiOversoldText, &[("rsi", rsi.as_str())]))
        }
        Some(RsiZone::Overbought) => {
            parts.push(render(locale, MessageKey::RsiOverboughtText, &[("rsi", rsi.as_str())]))
        }
        Some(RsiZone::Neutral) | None => {}
    }

    let sma20 = fixed(latest.sma20, 2);
    let sma50 = fixed(latest.sma50, 2);
    let smas = [("sma20", sma20.as_str()), ("sma50", sma50.as_str())];
    match interp.sma_stack {
        Some(SmaStack::AboveBoth) => parts.push(render(locale, MessageKey::PriceAboveSmasText, &smas)),
        Some(SmaStack::BelowBoth) => parts.push(render(locale, MessageKey::PriceBelowSmasText, &smas)),
        Some(SmaStack::Mixed) | None => {}
    }

    let macd = fixed(latest.macd, 4);
    let signal = fixed(latest.signal, 4);
    let lines = [("macd", macd.as_str()), ("signal", signal.as_str())];
    match interp.macd_crossover {
        Some(MacdCrossover::Bullish) => parts.push(render(locale, MessageKey::MacdBullishText, &lines)),
        Some(MacdCrossover::Bearish) => parts.push(render(locale, MessageKey::MacdBearishText, &lines)),
        None => {}
    }

    parts.join(" ")
}

// =============================================================================
// Calculator messages
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorMessage {
    pub result: String,
    pub optimal_price: String,
}

pub fn calculator_message(outcome: &CalculatorOutcome, locale: Locale) -> CalculatorMessage {
    match *outcome {
        CalculatorOutcome::InvalidAmount => CalculatorMessage {
            result: translate(locale, MessageKey::EnterValidAmount),
            optimal_price: String::new(),
        },
        CalculatorOutcome::Invest {
            amount,
            optimal_price,
        } => CalculatorMessage {
            result: format!("{} {amount} USD!", translate(locale, MessageKey::GoodDayToInvest)),
            optimal_price: format!(
                "{}: {optimal_price:.4}",
                translate(locale, MessageKey::OptimalPrice)
            ),
        },
        CalculatorOutcome::Wait { current_price } => CalculatorMessage {
            result: translate(locale, MessageKey::NotOptimalTime),
            optimal_price: format!(
                "{} {}: {current_price:.4}",
                translate(locale, MessageKey::NoOptimalPrice),
                translate(locale, MessageKey::CurrentPrice)
            ),
        },
    }
}
