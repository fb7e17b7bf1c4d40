//! Three-sigma anomaly detection for sensor readings
//!
//! Flags readings that sit more than `k` standard deviations above their
//! own sensor's mean, over a recent time window. Statistics are computed
//! independently per sensor.
//!
//! Pipeline stages, leaves first:
//! - [`filter`](mod@filter): input shape checks, record validation, time window
//! - [`stats`]: per-sensor mean, population stddev, count, min, max
//! - [`detector`]: threshold classification and ranking
//!
//! ```no_run
//! use sigmaguard_core::{AnomalyPipeline, DetectionConfig, DetectionReport};
//!
//! let input = std::fs::read_to_string("readings.json")?;
//! let pipeline = AnomalyPipeline::new(DetectionConfig::default())?;
//!
//! let run = pipeline.run_str(&input)?;
//! for anomaly in &run.anomalies {
//!     println!("{} {:.2} ({:.2}σ)", anomaly.sensor_id, anomaly.value, anomaly.deviation);
//! }
//! print!("{}", DetectionReport::new(&run).render_text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]

pub mod constants;
pub mod detector;
pub mod errors;
pub mod filter;
pub mod pipeline;
pub mod reading;
pub mod report;
pub mod stats;
pub mod time;

// Public API
pub use detector::{detect, AnomalyRecord};
pub use errors::{DetectionError, DetectionResult, RecordIssue};
pub use filter::{filter, FilterReport, SkippedRecord, TimeWindow, WindowEnd};
pub use pipeline::{AnomalyPipeline, DetectionConfig, DetectionRun};
pub use reading::{RawReading, Reading};
pub use report::DetectionReport;
pub use stats::{aggregate, SensorStatistics, StatisticsMap};
pub use time::{Clock, FixedClock, SystemClock, Timestamp};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
