// =============================================================================
// Localization — key → template tables per locale
// =============================================================================
//
// Every user-visible string is addressed by a `MessageKey`.  The locale is
// always passed explicitly; there is no process-wide "current language".
//
// Templates may contain `{{name}}` placeholders which `render` substitutes
// from the supplied arguments.  Unknown placeholders are left untouched.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::market_data::DateStyle;

/// Supported display languages.  English is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Parse a language tag such as `es`, `es-ES` or `EN_us`.
    /// Anything that is not Spanish falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "es" => Self::Es,
            _ => Self::En,
        }
    }

    pub fn date_style(self) -> DateStyle {
        match self {
            Self::En => DateStyle::MonthFirst,
            Self::Es => DateStyle::DayFirst,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Es => write!(f, "es"),
        }
    }
}

/// Identifier of a translatable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    // ── Interpretation tags ─────────────────────────────────────────────
    Oversold,
    Overbought,
    Neutral,
    Bullish,
    Bearish,

    // ── Dynamic analysis sentences ──────────────────────────────────────
    AnalysisFor,
    RsiOversoldText,
    RsiOverboughtText,
    PriceAboveSmasText,
    PriceBelowSmasText,
    MacdBullishText,
    MacdBearishText,

    // ── Decisions / calculator ──────────────────────────────────────────
    GoodDayToInvestOverall,
    TimeToWaitOverall,
    EnterValidAmount,
    GoodDayToInvest,
    NotOptimalTime,
    OptimalPrice,
    NoOptimalPrice,
    CurrentPrice,

    // ── Chart dataset labels ────────────────────────────────────────────
    PriceHistoryLabel,
    Sma20,
    Sma50,
    Rsi14Day,
    MacdLine,
    SignalLine,
    Histogram,

    // ── Status ──────────────────────────────────────────────────────────
    DataUnavailable,
}

/// Raw template for `key` in `locale`.
pub fn template(locale: Locale, key: MessageKey) -> &'static str {
    use MessageKey::*;
    match locale {
        Locale::En => match key {
            Oversold => "Oversold",
            Overbought => "Overbought",
            Neutral => "Neutral",
            Bullish => "Bullish",
            Bearish => "Bearish",
            AnalysisFor => "Analysis for {{crypto}}:",
            RsiOversoldText => "The RSI is at {{rsi}}, indicating the asset may be oversold.",
            RsiOverboughtText => "The RSI is at {{rsi}}, indicating the asset may be overbought.",
            PriceAboveSmasText => {
                "The price is above both the 20-day SMA ({{sma20}}) and the 50-day SMA ({{sma50}}), suggesting an upward trend."
            }
            PriceBelowSmasText => {
                "The price is below both the 20-day SMA ({{sma20}}) and the 50-day SMA ({{sma50}}), suggesting a downward trend."
            }
            MacdBullishText => {
                "The MACD line ({{macd}}) is above the signal line ({{signal}}), a bullish signal."
            }
            MacdBearishText => {
                "The MACD line ({{macd}}) is below the signal line ({{signal}}), a bearish signal."
            }
            GoodDayToInvestOverall => "Indicators suggest today could be a good day to invest.",
            TimeToWaitOverall => "Indicators suggest it is better to wait for now.",
            EnterValidAmount => "Please enter a valid amount.",
            GoodDayToInvest => "Today is a good day to invest",
            NotOptimalTime => "It is not an optimal time to invest.",
            OptimalPrice => "Optimal purchase price",
            NoOptimalPrice => "No optimal price right now.",
            CurrentPrice => "Current price",
            PriceHistoryLabel => "{{crypto}} price history (USD)",
            Sma20 => "20-day SMA",
            Sma50 => "50-day SMA",
            Rsi14Day => "14-day RSI",
            MacdLine => "MACD line",
            SignalLine => "Signal line",
            Histogram => "Histogram",
            DataUnavailable => "Price data is currently unavailable. Please try again later.",
        },
        Locale::Es => match key {
            Oversold => "Sobrevendido",
            Overbought => "Sobrecomprado",
            Neutral => "Neutral",
            Bullish => "Alcista",
            Bearish => "Bajista",
            AnalysisFor => "Análisis de {{crypto}}:",
            RsiOversoldText => {
                "El RSI está en {{rsi}}, lo que indica que el activo podría estar sobrevendido."
            }
            RsiOverboughtText => {
                "El RSI está en {{rsi}}, lo que indica que el activo podría estar sobrecomprado."
            }
            PriceAboveSmasText => {
                "El precio está por encima de la SMA de 20 días ({{sma20}}) y de la SMA de 50 días ({{sma50}}), lo que sugiere una tendencia alcista."
            }
            PriceBelowSmasText => {
                "El precio está por debajo de la SMA de 20 días ({{sma20}}) y de la SMA de 50 días ({{sma50}}), lo que sugiere una tendencia bajista."
            }
            MacdBullishText => {
                "La línea MACD ({{macd}}) está por encima de la línea de señal ({{signal}}), una señal alcista."
            }
            MacdBearishText => {
                "La línea MACD ({{macd}}) está por debajo de la línea de señal ({{signal}}), una señal bajista."
            }
            GoodDayToInvestOverall => "Los indicadores sugieren que hoy podría ser un buen día para invertir.",
            TimeToWaitOverall => "Los indicadores sugieren que es mejor esperar por ahora.",
            EnterValidAmount => "Por favor, introduce una cantidad válida.",
            GoodDayToInvest => "Hoy es un buen día para invertir",
            NotOptimalTime => "No es un momento óptimo para invertir.",
            OptimalPrice => "Precio óptimo de compra",
            NoOptimalPrice => "No hay un precio óptimo ahora mismo.",
            CurrentPrice => "Precio actual",
            PriceHistoryLabel => "Historial de precios de {{crypto}} (USD)",
            Sma20 => "SMA de 20 días",
            Sma50 => "SMA de 50 días",
            Rsi14Day => "RSI de 14 días",
            MacdLine => "Línea MACD",
            SignalLine => "Línea de señal",
            Histogram => "Histograma",
            DataUnavailable => {
                "Los datos de precios no están disponibles en este momento. Inténtalo de nuevo más tarde."
            }
        },
    }
}

/// Template for `key` without placeholder substitution.
pub fn translate(locale: Locale, key: MessageKey) -> String {
    template(locale, key).to_string()
}

/// Template for `key` with every `{{name}}` replaced by its argument.
pub fn render(locale: Locale, key: MessageKey, args: &[(&str, &str)]) -> String {
    let mut out = template(locale, key).to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_from_tag() {
        assert_eq!(Locale::from_tag("es"), Locale::Es);
        assert_eq!(Locale::from_tag("es-ES"), Locale::Es);
        assert_eq!(Locale::from_tag(" ES_mx "), Locale::Es);
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn render_substitutes_placeholders() {
        let text = render(Locale::En, MessageKey::AnalysisFor, &[("crypto", "Polkadot")]);
        assert_eq!(text, "Analysis for Polkadot:");

        let text = render(
            Locale::Es,
            MessageKey::MacdBullishText,
            &[("macd", "0.1234"), ("signal", "0.0456")],
        );
        assert!(text.contains("(0.1234)"));
        assert!(text.contains("(0.0456)"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let text = render(Locale::En, MessageKey::AnalysisFor, &[("other", "x")]);
        assert_eq!(text, "Analysis for {{crypto}}:");
    }

    #[test]
    fn locales_differ() {
        assert_eq!(translate(Locale::En, MessageKey::Oversold), "Oversold");
        assert_eq!(translate(Locale::Es, MessageKey::Oversold), "Sobrevendido");
    }

    #[test]
    fn locale_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::Es).unwrap(), "\"es\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }
}
