//! Detection pipeline
//!
//! One run is one synchronous pass through the three stages:
//!
//! ```text
//! raw input ──> filter ──> readings ──> aggregate ──> statistics
//!                              │                          │
//!                              └────────> detect <────────┘
//!                                           │
//!                                           v
//!                                   ranked anomalies
//! ```
//!
//! [`AnomalyPipeline`] holds only configuration and a clock. Each run
//! allocates its own readings, statistics and anomaly list and hands them
//! back in a [`DetectionRun`], so a pipeline can be shared freely between
//! callers and re-run with different settings.
//!
//! ## Configuration
//!
//! ```rust
//! use sigmaguard_core::{DetectionConfig, WindowEnd};
//!
//! // Every field is optional in JSON
//! let config = DetectionConfig::from_json_str(r#"{ "days_back": 30 }"#)?;
//! assert_eq!(config.sigma_threshold, 3.0);
//!
//! let strict = DetectionConfig::default()
//!     .with_sigma(2.5)
//!     .with_window_end(WindowEnd::AtNow);
//! strict.validate()?;
//! # Ok::<(), sigmaguard_core::DetectionError>(())
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{DEFAULT_DAYS_BACK, DEFAULT_SIGMA_THRESHOLD},
    detector::{check_sigma, detect, AnomalyRecord},
    errors::DetectionResult,
    filter::{
        filter_detailed, filter_raw, filter_readings, FilterReport, SkippedRecord, TimeWindow,
        WindowEnd,
    },
    reading::{RawReading, Reading},
    stats::{aggregate, StatisticsMap},
    time::{Clock, SystemClock},
};

/// Settings for a detection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Multiplier `k` in `mean + k * stddev`
    pub sigma_threshold: f64,
    /// Look-back window in days from now
    pub days_back: u32,
    /// Whether readings dated after now are kept
    pub window_end: WindowEnd,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sigma_threshold: DEFAULT_SIGMA_THRESHOLD,
            days_back: DEFAULT_DAYS_BACK,
            window_end: WindowEnd::Open,
        }
    }
}

impl DetectionConfig {
    pub fn new(sigma_threshold: f64, days_back: u32) -> Self {
        Self {
            sigma_threshold,
            days_back,
            ..Self::default()
        }
    }

    pub fn with_sigma(mut self, sigma_threshold: f64) -> Self {
        self.sigma_threshold = sigma_threshold;
        self
    }

    pub fn with_days_back(mut self, days_back: u32) -> Self {
        self.days_back = days_back;
        self
    }

    pub fn with_window_end(mut self, window_end: WindowEnd) -> Self {
        self.window_end = window_end;
        self
    }

    pub fn validate(&self) -> DetectionResult<()> {
        check_sigma(self.sigma_threshold)
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(text: &str) -> DetectionResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRun {
    /// Window the input was filtered against
    pub window: TimeWindow,
    /// Multiplier used for classification
    pub sigma: f64,
    /// Filtered readings, in input order
    pub readings: Vec<Reading>,
    /// Records dropped by validation
    pub skipped: Vec<SkippedRecord>,
    /// Valid records outside the window
    pub outside_window: usize,
    /// Per-sensor statistics over `readings`
    pub statistics: StatisticsMap,
    /// Anomalies, most deviant first
    pub anomalies: Vec<AnomalyRecord>,
}

impl DetectionRun {
    /// Re-classify with another multiplier, reusing readings and statistics
    pub fn with_sigma(&self, sigma: f64) -> DetectionResult<Self> {
        let anomalies = detect(&self.readings, &self.statistics, sigma)?;
        Ok(Self {
            sigma,
            anomalies,
            ..self.clone()
        })
    }

    pub fn anomaly_count(&self) -> usize {
        self.anomalies.len()
    }

    pub fn sensor_count(&self) -> usize {
        self.statistics.len()
    }
}

/// Filter, aggregate and detect in one call
#[derive(Debug, Clone)]
pub struct AnomalyPipeline<C = SystemClock> {
    config: DetectionConfig,
    clock: C,
}

impl AnomalyPipeline<SystemClock> {
    /// Pipeline reading `now` from the system clock
    pub fn new(config: DetectionConfig) -> DetectionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> AnomalyPipeline<C> {
    /// Swap the time source, e.g. for reproducible runs
    pub fn with_clock<D: Clock>(self, clock: D) -> AnomalyPipeline<D> {
        AnomalyPipeline {
            config: self.config,
            clock,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Mutable access to the time source, e.g. to advance a [`FixedClock`]
    ///
    /// [`FixedClock`]: crate::time::FixedClock
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Window for a run starting now
    pub fn window(&self) -> DetectionResult<TimeWindow> {
        TimeWindow::with_end(self.clock.now(), self.config.days_back, self.config.window_end)
    }

    /// Run on a JSON array of reading records
    pub fn run(&self, input: &Value) -> DetectionResult<DetectionRun> {
        let window = self.window()?;
        let report = filter_detailed(input, &window)?;
        self.finish(window, report)
    }

    /// Run on JSON text
    pub fn run_str(&self, text: &str) -> DetectionResult<DetectionRun> {
        let input: Value = serde_json::from_str(text)?;
        self.run(&input)
    }

    /// Run on records the caller already decoded
    pub fn run_raw(&self, raw: &[RawReading]) -> DetectionResult<DetectionRun> {
        let window = self.window()?;
        let report = filter_raw(raw, &window);
        self.finish(window, report)
    }

    /// Run on validated readings; only the window is applied
    pub fn run_readings(&self, readings: &[Reading]) -> DetectionResult<DetectionRun> {
        let window = self.window()?;
        let kept = filter_readings(readings, &window);
        let report = FilterReport {
            outside_window: readings.len() - kept.len(),
            readings: kept,
            skipped: Vec::new(),
        };
        self.finish(window, report)
    }

    fn finish(&self, window: TimeWindow, report: FilterReport) -> DetectionResult<DetectionRun> {
        let FilterReport {
            readings,
            skipped,
            outside_window,
        } = report;

        if readings.is_empty() && !skipped.is_empty() && outside_window == 0 {
            warn!("all {} records failed validation", skipped.len());
        }

        let statistics = aggregate(&readings);
        let sigma = self.config.sigma_threshold;
        let anomalies = detect(&readings, &statistics, sigma)?;

        info!(
            "run: {} readings, {} skipped, {} outside window, {} sensors, {} anomalies at {}σ",
            readings.len(),
            skipped.len(),
            outside_window,
            statistics.len(),
            anomalies.len(),
            sigma
        );

        Ok(DetectionRun {
            window,
            sigma,
            readings,
            skipped,
            outside_window,
            statistics,
            anomalies,
        })
    }
}
