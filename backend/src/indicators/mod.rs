// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the price,
// RSI and MACD charts.  Every function takes an immutable price slice and
// returns a freshly allocated series; short or empty input yields a short or
// empty series, never an error.  Callers must check lengths before indexing.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use macd::{calculate_default_macd, MacdResult};
pub use rsi::{calculate_rsi, RSI_PERIOD};
pub use sma::calculate_sma;
