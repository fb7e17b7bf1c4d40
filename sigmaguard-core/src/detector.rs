//! Anomaly Detector
//!
//! Applies the three-sigma rule to each filtered reading:
//!
//! ```text
//! threshold = mean + sigma * stddev
//! anomalous iff value > threshold        (strict: equal is normal)
//! deviation = (value - mean) / stddev
//! ```
//!
//! ## Zero spread
//!
//! When a sensor's readings are all equal `stddev == 0`, the threshold
//! collapses to the mean and the division above is undefined. Deviation is
//! then `0.0` for `value == mean` and signed infinity otherwise, so any
//! anomaly from a zero-spread sensor reports `+∞` and ranks first. A
//! singleton group is never anomalous because its only value is the mean.
//!
//! ## Ranking
//!
//! Results are sorted by descending deviation with a stable sort; records
//! with equal deviation keep the order their readings had in the input.

use serde::Serialize;

use crate::{
    errors::{DetectionError, DetectionResult},
    reading::Reading,
    stats::{SensorStatistics, StatisticsMap},
    time::Timestamp,
};

/// A reading that exceeded its sensor's threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub sensor_id: String,
    pub value: f64,
    pub timestamp: Timestamp,
    /// Sensor mean at detection time
    pub mean: f64,
    /// Sensor standard deviation at detection time
    pub stddev: f64,
    /// `mean + sigma * stddev`
    pub threshold: f64,
    /// Standard deviations above the mean
    pub deviation: f64,
}

impl AnomalyRecord {
    fn new(reading: &Reading, stats: &SensorStatistics, threshold: f64) -> Self {
        Self {
            sensor_id: reading.sensor_id().to_string(),
            value: reading.value(),
            timestamp: reading.timestamp(),
            mean: stats.mean,
            stddev: stats.stddev,
            threshold,
            deviation: deviation(reading.value(), stats),
        }
    }
}

/// Signed number of standard deviations `value` lies above the mean
pub fn deviation(value: f64, stats: &SensorStatistics) -> f64 {
    let delta = value - stats.mean;
    if !stats.is_constant() {
        return delta / stats.stddev;
    }

    if delta == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(delta)
    }
}

/// Reject multipliers the threshold formula has no meaning for
pub fn check_sigma(sigma: f64) -> DetectionResult<()> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(DetectionError::InvalidSigma { sigma })
    }
}

/// Classify `readings` against `stats` and rank the anomalies
///
/// Fails with [`DetectionError::MissingStatistics`] on the first reading
/// whose sensor has no entry, before anything is classified.
pub fn detect(
    readings: &[Reading],
    stats: &StatisticsMap,
    sigma: f64,
) -> DetectionResult<Vec<AnomalyRecord>> {
    check_sigma(sigma)?;

    let resolved = readings
        .iter()
        .map(|reading| {
            stats
                .get(reading.sensor_id())
                .map(|s| (reading, s))
                .ok_or_else(|| DetectionError::MissingStatistics {
                    sensor_id: reading.sensor_id().to_string(),
                })
        })
        .collect::<DetectionResult<Vec<_>>>()?;

    let mut anomalies: Vec<AnomalyRecord> = resolved
        .into_iter()
        .filter_map(|(reading, sensor)| {
            let threshold = sensor.threshold(sigma);
            (reading.value() > threshold).then(|| AnomalyRecord::new(reading, sensor, threshold))
        })
        .collect();

    rank(&mut anomalies);
    Ok(anomalies)
}

/// Sort by descending deviation, ties in existing order
pub fn rank(anomalies: &mut [AnomalyRecord]) {
    anomalies.sort_by(|a, b| b.deviation.total_cmp(&a.deviation));
}
