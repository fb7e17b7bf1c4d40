//! Time-Related Constants
//!
//! Conversion factors and the timestamp layouts the filter accepts.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: i64 = 1000;

/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Milliseconds per day.
pub const MS_PER_DAY: i64 = SECONDS_PER_DAY * MS_PER_SECOND;

// ===== TIMESTAMP FORMATS =====

/// Layouts without an offset, tried after RFC 3339. Values are read as UTC.
///
/// `%.f` accepts an optional fractional part, so each layout also covers
/// millisecond and microsecond precision.
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Date-only layout; the reading is placed at midnight UTC.
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Layout used for timestamps in reports.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout used for the report time range header.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";
