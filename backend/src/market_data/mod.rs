pub mod axis;
pub mod price_series;

// Re-export the common types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use axis::{pad_to_axis, AlignedSeries};
pub use price_series::{DateStyle, PriceSeries};
