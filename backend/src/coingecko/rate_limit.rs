// =============================================================================
// Cooldown Tracker — backs off after CoinGecko answers 429
// =============================================================================
//
// The public CoinGecko API throttles per IP and answers `429 Too Many
// Requests`, usually with a `Retry-After` header in seconds.  The tracker
// records the instant until which requests are pointless and lets the client
// fail fast instead of hammering the API on every refresh tick.
//
// State is a single atomic (UNIX millis), so any task may query it lock-free.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use tracing::{debug, warn};

/// Cooldown applied when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;
/// Upper bound on any cooldown, whatever the server asks for.
const MAX_COOLDOWN_SECS: u64 = 600;

/// Thread-safe cooldown tracker backed by atomics.
pub struct CooldownTracker {
    blocked_until_ms: AtomicI64,
    throttled_total: AtomicU32,
}

/// Serializable view of the tracker for the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownSnapshot {
    pub cooling_down: bool,
    pub remaining_secs: u64,
    pub throttled_total: u32,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self {
            blocked_until_ms: AtomicI64::new(0),
            throttled_total: AtomicU32::new(0),
        }
    }

    /// Arm the cooldown after a 429 received at `now_ms`.
    pub fn record_throttled(&self, headers: &reqwest::header::HeaderMap, now_ms: i64) {
        let secs = headers
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_COOLDOWN_SECS)
            .min(MAX_COOLDOWN_SECS);

        let until = now_ms + (secs as i64) * 1000;
        self.blocked_until_ms.fetch_max(until, Ordering::Relaxed);
        let total = self.throttled_total.fetch_add(1, Ordering::Relaxed) + 1;

        warn!(
            cooldown_secs = secs,
            throttled_total = total,
            "CoinGecko rate limit hit — pausing requests"
        );
    }

    pub fn is_cooling_down(&self, now_ms: i64) -> bool {
        self.blocked_until_ms.load(Ordering::Relaxed) > now_ms
    }

    /// Whole seconds left in the cooldown, rounded up.
    pub fn remaining_secs(&self, now_ms: i64) -> u64 {
        let until = self.blocked_until_ms.load(Ordering::Relaxed);
        if until <= now_ms {
            return 0;
        }
        ((until - now_ms) as u64).div_ceil(1000)
    }

    /// Clear the cooldown (e.g. after a successful response).
    pub fn reset(&self) {
        if self.blocked_until_ms.swap(0, Ordering::Relaxed) != 0 {
            debug!("cooldown cleared");
        }
    }

    pub fn snapshot(&self, now_ms: i64) -> CooldownSnapshot {
        CooldownSnapshot {
            cooling_down: self.is_cooling_down(now_ms),
            remaining_secs: self.remaining_secs(now_ms),
            throttled_total: self.throttled_total.load(Ordering::Relaxed),
        }
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CooldownTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownTracker")
            .field("blocked_until_ms", &self.blocked_until_ms.load(Ordering::Relaxed))
            .field("throttled_total", &self.throttled_total.load(Ordering::Relaxed))
            .finish()
    }
}
