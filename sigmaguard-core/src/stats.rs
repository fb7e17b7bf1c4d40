//! Sensor Statistics Aggregator
//!
//! Groups filtered readings by `sensor_id` and computes population
//! statistics for each group:
//!
//! ```text
//! mean     = Σ v_i / n
//! variance = Σ (v_i - mean)² / n      (population: divide by n, not n - 1)
//! stddev   = sqrt(variance)
//! ```
//!
//! Two passes are made over each group (mean first, then squared
//! deviations) so the variance is never negative from cancellation.
//!
//! Values are divided by the power of two at or below the group's largest
//! magnitude before summing. The division is exact, so ordinary data gives
//! the same bits as an unscaled computation, while groups near `f64::MAX`
//! no longer overflow and groups of subnormals no longer underflow.
//!
//! A group of one reading has `stddev == 0`. That value flows unchanged into
//! threshold computation; the detector defines what it means.
//!
//! Sensors with no filtered readings are simply absent from the map.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::reading::Reading;

const EXPONENT_BITS: u64 = 0x7ff0_0000_0000_0000;

/// Smallest positive subnormal `f64`
const SMALLEST_SPREAD: f64 = f64::MIN_POSITIVE * f64::EPSILON;

/// Per-sensor statistics keyed by sensor id, iterated in id order
pub type StatisticsMap = BTreeMap<String, SensorStatistics>;

/// Descriptive statistics for one sensor's filtered readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorStatistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub stddev: f64,
    /// Number of readings, always at least 1
    pub count: usize,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl SensorStatistics {
    /// Statistics of a non-empty value set, `None` when `values` is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let n = count as f64;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Equal values are summed exactly only sometimes (0.1 * 3 is not
        // 0.3), so a constant group is pinned instead of computed.
        if min == max {
            return Some(Self {
                mean: min,
                stddev: 0.0,
                count,
                min,
                max,
            });
        }

        let magnitude = min.abs().max(max.abs());
        let scale = binade(magnitude);

        let scaled_mean = values.iter().map(|v| v / scale).sum::<f64>() / n;
        let scaled_variance = values
            .iter()
            .map(|v| (v / scale - scaled_mean).powi(2))
            .sum::<f64>()
            / n;

        let mean = (scaled_mean * scale).clamp(min, max);
        // Unequal values never report zero spread, even when the true
        // stddev rounds below the smallest subnormal
        let stddev = (scaled_variance.sqrt() * scale)
            .min(magnitude)
            .max(SMALLEST_SPREAD);

        Some(Self {
            mean,
            stddev,
            count,
            min,
            max,
        })
    }

    /// Population variance
    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }

    /// `mean + sigma * stddev`
    pub fn threshold(&self, sigma: f64) -> f64 {
        self.mean + sigma * self.stddev
    }

    /// Whether every reading in the group had the same value
    pub fn is_constant(&self) -> bool {
        self.stddev == 0.0
    }
}

/// Largest power of two not above `x`, for finite `x > 0`
fn binade(x: f64) -> f64 {
    let bits = x.to_bits();
    let exponent = bits & EXPONENT_BITS;
    if exponent != 0 {
        f64::from_bits(exponent)
    } else {
        // Subnormal: keep only the highest set mantissa bit
        f64::from_bits(1 << (63 - bits.leading_zeros()))
    }
}

/// Compute statistics for every sensor present in `readings`
pub fn aggregate(readings: &[Reading]) -> StatisticsMap {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        groups
            .entry(reading.sensor_id())
            .or_default()
            .push(reading.value());
    }

    groups
        .into_iter()
        .filter_map(|(sensor_id, values)| {
            SensorStatistics::from_values(&values).map(|stats| (sensor_id.to_string(), stats))
        })
        .collect()
}
