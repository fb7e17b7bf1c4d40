//! Error Types for the Detection Pipeline
//!
//! ## Error Categories
//!
//! Failures fall into two groups that are handled very differently:
//!
//! ### Structural Failures (abort the run)
//! - `MalformedInput`: the top-level input is not a list of record objects
//! - `MissingStatistics`: the detector was handed readings whose sensor has
//!   no statistics entry (a caller bug, never a data bug)
//! - `InvalidSigma` / `InvalidWindow`: configuration outside its domain
//! - `Json`: raw text could not be parsed at all
//!
//! ### Record Issues (absorbed at the filter boundary)
//! A single bad record never aborts a run. It is described by a
//! [`RecordIssue`] and reported next to the filtered readings, so the
//! aggregator and detector only ever see validated data.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use sigmaguard_core::{filter, DetectionError};
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
//! let input = serde_json::json!({ "sensor_id": "s1" });
//!
//! match filter::filter(&input, 7, now) {
//!     Ok(readings) => println!("{} readings in window", readings.len()),
//!     Err(DetectionError::MalformedInput { reason }) => {
//!         // Reject the upload, nothing partial was produced
//!         eprintln!("bad input: {reason}");
//!     }
//!     Err(e) => eprintln!("run failed: {e}"),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Result type for pipeline operations
pub type DetectionResult<T> = Result<T, DetectionError>;

/// Fatal errors surfaced to the caller of a detection run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Top-level input is not a sequence of record-like entries
    #[error("Malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the input shape
        reason: String,
    },

    /// A reading references a sensor with no statistics entry
    #[error("No statistics for sensor '{sensor_id}'")]
    MissingStatistics {
        /// Sensor id that could not be resolved
        sensor_id: String,
    },

    /// Sigma multiplier must be finite and strictly positive
    #[error("Sigma threshold {sigma} must be a finite number greater than 0")]
    InvalidSigma {
        /// The rejected multiplier
        sigma: f64,
    },

    /// Time window cannot be represented relative to `now`
    #[error("Window of {days_back} days cannot be applied to the current time")]
    InvalidWindow {
        /// The rejected window size
        days_back: u32,
    },

    /// Raw text was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(String),
}

impl DetectionError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DetectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Why a single record was left out of the filtered set
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordIssue {
    /// A required field is absent
    #[error("missing field '{field}'")]
    MissingField {
        /// Field name
        field: &'static str,
    },

    /// A field holds the wrong JSON type
    #[error("field '{field}' should be {expected}")]
    WrongType {
        /// Field name
        field: &'static str,
        /// Expected type, e.g. "a number"
        expected: &'static str,
    },

    /// `sensor_id` is an empty string
    #[error("sensor_id is empty")]
    EmptySensorId,

    /// Timestamp text matched no recognised format
    #[error("unparseable timestamp '{raw}'")]
    UnparseableTimestamp {
        /// The original text
        raw: String,
    },

    /// Value is NaN or infinite
    #[error("value is not a finite number")]
    NonFiniteValue,
}
