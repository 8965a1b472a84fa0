// =============================================================================
// Axis Alignment — pairing indicator series with their date labels
// =============================================================================
//
// Every indicator series is trailing-aligned with the price vector: the last
// value of the series belongs to the last price.  For a series of length `m`
// over an axis of length `n` the offset is `n - m`, and value `i` is plotted at
// `axis[offset + i]`.
//
// Chart payloads either slice the axis (one series per chart, e.g. RSI) or pad
// the series with leading gaps so several series can share the full axis (the
// price chart overlays SMA(20) and SMA(50) on the raw prices).  Both helpers
// guarantee `labels.len() == values.len()`.
// =============================================================================

use serde::Serialize;

/// Offset of a trailing-aligned series of `series_len` values on an axis of
/// `axis_len` labels.  A series longer than the axis gets offset 0.
pub fn trailing_offset(axis_len: usize, series_len: usize) -> usize {
    axis_len.saturating_sub(series_len)
}

/// A series together with exactly one label per value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl AlignedSeries {
    /// Slice `axis` so it ends with `values`.
    ///
    /// If `values` is longer than `axis` (never the case for series derived
    /// from the axis' own prices) the oldest values are dropped instead.
    pub fn trailing(axis: &[String], values: &[f64]) -> Self {
        let labels = &axis[trailing_offset(axis.len(), values.len())..];
        let values = &values[values.len() - labels.len()..];
        Self {
            labels: labels.to_vec(),
            values: values.to_vec(),
        }
    }
}

/// Left-pad a trailing-aligned series with `None` so it spans `axis_len`.
pub fn pad_to_axis(axis_len: usize, values: &[f64]) -> Vec<Option<f64>> {
    let offset = trailing_offset(axis_len, values.len());
    let skip = values.len().saturating_sub(axis_len);
    std::iter::repeat(None)
        .take(offset)
        .chain(values[skip..].iter().copied().map(Some))
        .collect()
}
