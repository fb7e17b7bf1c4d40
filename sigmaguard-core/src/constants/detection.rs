//! Detection Constants
//!
//! Defaults for the three-sigma rule and for the views built on its output.

// ===== CLASSIFICATION =====

/// Default multiplier `k` in `mean + k * stddev`.
///
/// Three standard deviations is the conventional cut-off: for normally
/// distributed data roughly 0.13% of readings land above it.
pub const DEFAULT_SIGMA_THRESHOLD: f64 = 3.0;

// ===== TIME WINDOW =====

/// Default look-back window in days.
pub const DEFAULT_DAYS_BACK: u32 = 7;

// ===== PRESENTATION =====

/// Fractional digits used when formatting statistics for display.
pub const DISPLAY_PRECISION: usize = 2;

/// Number of anomalies listed per sensor in text reports.
pub const DEFAULT_TOP_ANOMALIES: usize = 5;
