//! TTL policy for cached gateway operations.
//!
//! TTLs follow data volatility: listings churn hourly, stream sources
//! expire quickly upstream, and per-title data (episode lists, info) is
//! kept longer on weekends, when upstream catalogues change less.

use std::time::Duration;

use chrono::{Datelike, Local, Weekday};

/// Source of the current day of week, injectable for tests.
pub trait Clock: Send + Sync {
    fn weekday(&self) -> Weekday;
}

/// Reads the host's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn weekday(&self) -> Weekday {
        Local::now().weekday()
    }
}

/// Always reports the same weekday.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Weekday);

impl Clock for FixedClock {
    fn weekday(&self) -> Weekday {
        self.0
    }
}

/// Per-operation TTLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Trending and popular listings. Default: 1 hour.
    pub listing: Duration,
    /// Episode lists and info on Monday–Friday. Default: 30 minutes.
    pub item_weekday: Duration,
    /// Episode lists and info on Saturday and Sunday. Default: 2 hours.
    pub item_weekend: Duration,
    /// Stream sources. Default: 10 minutes.
    pub sources: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            listing: Duration::from_secs(60 * 60),
            item_weekday: Duration::from_secs(60 * 30),
            item_weekend: Duration::from_secs(60 * 120),
            sources: Duration::from_secs(600),
        }
    }
}

impl TtlPolicy {
    /// TTL for per-title data written on `weekday`.
    pub fn item(&self, weekday: Weekday) -> Duration {
        if is_weekend(weekday) {
            self.item_weekend
        } else {
            self.item_weekday
        }
    }
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}
