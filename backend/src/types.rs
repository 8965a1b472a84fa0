// =============================================================================
// Shared types used across the crypto tracker
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry of the provider's trending list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingAsset {
    pub id: String,
    pub name: String,
}

/// Query parameters for a historical price request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub vs_currency: String,
    pub days: u32,
    pub interval: String,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            days: 90,
            interval: "daily".to_string(),
        }
    }
}

/// Availability of the data behind the published snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DataStatus {
    /// No refresh has completed yet for the selected asset.
    Loading,
    Ready { updated_at: DateTime<Utc> },
    /// The last refresh failed; `reason` is the error chain.
    Unavailable { reason: String, since: DateTime<Utc> },
}

impl Default for DataStatus {
    fn default() -> Self {
        Self::Loading
    }
}

impl std::fmt::Display for DataStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading"),
            Self::Ready { .. } => write!(f, "Ready"),
            Self::Unavailable { .. } => write!(f, "Unavailable"),
        }
    }
}
