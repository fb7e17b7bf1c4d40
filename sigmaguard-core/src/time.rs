//! Time handling for detection runs
//!
//! Provides the clock abstraction the pipeline reads `now` from:
//! - System clock (production)
//! - Fixed clock (tests and reproducible reports)
//!
//! Also owns timestamp parsing for raw records. RFC 3339 is tried first,
//! then the offset-less layouts in [`NAIVE_TIMESTAMP_FORMATS`], which are
//! read as UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::constants::time::{DATE_ONLY_FORMAT, MS_PER_DAY, NAIVE_TIMESTAMP_FORMATS};

/// Absolute instant used for every reading and window bound
pub type Timestamp = DateTime<Utc>;

/// Source of "now" for a detection run
pub trait Clock {
    /// Current instant
    fn now(&self) -> Timestamp;
}

/// Wall clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn advance(&mut self, by: Duration) {
        self.timestamp += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Parse timestamp text into an absolute instant
///
/// Returns `None` when no accepted layout matches.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Instant `days_back` whole days before `now`
///
/// `None` if the subtraction leaves chrono's representable range.
pub fn window_start(now: Timestamp, days_back: u32) -> Option<Timestamp> {
    let span = Duration::try_milliseconds(i64::from(days_back) * MS_PER_DAY)?;
    now.checked_sub_signed(span)
}
