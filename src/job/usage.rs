//! Per-owner usage accounting.
//!
//! Transcribed seconds accumulate into calendar-month periods. The period a
//! job bills to is a pure function of a timestamp, with the clock injected
//! so accounting is testable without wall-clock dependence.

use crate::error::Result;
use crate::job::OwnerId;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for tests.
#[derive(Debug)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// One calendar month of usage, the billing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsagePeriod {
    pub year: i32,
    pub month: u32,
}

impl UsagePeriod {
    /// The period a timestamp falls in.
    pub fn containing(timestamp: DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// First day of the month.
    ///
    /// `None` only for a hand-built period whose month is out of range.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for UsagePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Receives per-owner usage for durable accounting.
///
/// Repeated records for the same owner and period must accumulate.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, owner: &OwnerId, period: UsagePeriod, seconds: u64) -> Result<()>;
}

/// In-memory sink summing seconds per (owner, period).
#[derive(Default)]
pub struct MemoryUsageSink {
    totals: Mutex<HashMap<(OwnerId, UsagePeriod), u64>>,
}

impl MemoryUsageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated seconds for an owner in a period.
    pub fn total(&self, owner: &OwnerId, period: UsagePeriod) -> u64 {
        self.totals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(owner.clone(), period))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl UsageSink for MemoryUsageSink {
    async fn record(&self, owner: &OwnerId, period: UsagePeriod, seconds: u64) -> Result<()> {
        let mut totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        *totals.entry((owner.clone(), period)).or_insert(0) += seconds;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_period_from_timestamp() {
        let period = UsagePeriod::containing(instant(2025, 3, 14));
        assert_eq!(period, UsagePeriod { year: 2025, month: 3 });
    }

    #[test]
    fn test_same_month_maps_to_same_period() {
        let first = UsagePeriod::containing(instant(2025, 3, 1));
        let last = UsagePeriod::containing(instant(2025, 3, 31));
        assert_eq!(first, last);
    }

    #[test]
    fn test_month_boundary_splits_periods() {
        let march = UsagePeriod::containing(instant(2025, 3, 31));
        let april = UsagePeriod::containing(instant(2025, 4, 1));
        assert_ne!(march, april);
        assert!(march < april);
    }

    #[test]
    fn test_start_date_is_first_of_month() {
        let period = UsagePeriod { year: 2025, month: 12 };
        assert_eq!(
            period.start_date(),
            NaiveDate::from_ymd_opt(2025, 12, 1)
        );
    }

    #[test]
    fn test_invalid_month_has_no_start_date() {
        let period = UsagePeriod { year: 2025, month: 13 };
        assert_eq!(period.start_date(), None);
    }

    #[test]
    fn test_period_display() {
        let period = UsagePeriod { year: 2025, month: 3 };
        assert_eq!(period.to_string(), "2025-03");
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::new(instant(2025, 6, 15));
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test]
    async fn test_memory_sink_accumulates_within_period() {
        let sink = MemoryUsageSink::new();
        let owner = OwnerId::new("owner-1");
        let period = UsagePeriod { year: 2025, month: 3 };

        sink.record(&owner, period, 120).await.unwrap();
        sink.record(&owner, period, 45).await.unwrap();

        assert_eq!(sink.total(&owner, period), 165);
    }

    #[tokio::test]
    async fn test_memory_sink_keeps_periods_apart() {
        let sink = MemoryUsageSink::new();
        let owner = OwnerId::new("owner-1");
        let march = UsagePeriod { year: 2025, month: 3 };
        let april = UsagePeriod { year: 2025, month: 4 };

        sink.record(&owner, march, 100).await.unwrap();
        sink.record(&owner, april, 50).await.unwrap();

        assert_eq!(sink.total(&owner, march), 100);
        assert_eq!(sink.total(&owner, april), 50);
    }

    #[tokio::test]
    async fn test_memory_sink_keeps_owners_apart() {
        let sink = MemoryUsageSink::new();
        let first = OwnerId::new("owner-1");
        let second = OwnerId::new("owner-2");
        let period = UsagePeriod { year: 2025, month: 3 };

        sink.record(&first, period, 100).await.unwrap();

        assert_eq!(sink.total(&first, period), 100);
        assert_eq!(sink.total(&second, period), 0);
    }
}
