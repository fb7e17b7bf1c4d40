//! Constants for SigmaGuard Core
//!
//! Defaults and conversion factors used throughout the detection pipeline.
//! Every numeric default a caller might want to override lives here, so
//! configuration defaults and report formatting stay in agreement.
//!
//! ## Organization
//!
//! - **Detection**: sigma multiplier, window length, report limits
//! - **Time**: unit conversions and accepted timestamp formats

/// Detection defaults: sigma multiplier, window size and display settings.
pub mod detection;

/// Time unit conversions and timestamp formats.
pub mod time;

pub use detection::{
    DEFAULT_SIGMA_THRESHOLD, DEFAULT_DAYS_BACK,
    DISPLAY_PRECISION, DEFAULT_TOP_ANOMALIES,
};

pub use time::{
    MS_PER_SECOND, SECONDS_PER_DAY, MS_PER_DAY,
    NAIVE_TIMESTAMP_FORMATS, DISPLAY_TIMESTAMP_FORMAT,
};
