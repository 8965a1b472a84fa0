use chrono::DateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single `(timestamp, price)` observation from the price source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// UNIX timestamp in milliseconds.
    pub timestamp_ms: i64,
    pub price: f64,
}

/// How timestamps are rendered into date-axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateStyle {
    /// `MM/DD/YYYY`
    MonthFirst,
    /// `DD/MM/YYYY`
    DayFirst,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            Self::MonthFirst => "%m/%d/%Y",
            Self::DayFirst => "%d/%m/%Y",
        }
    }
}

// ---------------------------------------------------------------------------
// PriceSeries
// ---------------------------------------------------------------------------

/// Chronologically ascending price history for one asset.
///
/// The price vector and the date axis are both derived from the same points,
/// so they are always index-aligned 1:1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw `(timestamp_ms, price)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        Self {
            points: pairs
                .into_iter()
                .map(|(timestamp_ms, price)| PricePoint {
                    timestamp_ms,
                    price,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The price vector fed to the indicator engine.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// One human-readable date label per point, in `style`.
    ///
    /// Timestamps outside chrono's range fall back to the raw millisecond
    /// value so the axis never loses an entry.
    pub fn date_axis(&self, style: DateStyle) -> Vec<String> {
        self.points
            .iter()
            .map(|p| format_date(p.timestamp_ms, style))
            .collect()
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }
}

/// Render a UTC date label for `timestamp_ms`.
pub fn format_date(timestamp_ms: i64, style: DateStyle) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format(style.pattern()).to_string(),
        None => timestamp_ms.to_string(),
    }
}
