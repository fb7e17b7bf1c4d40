//! Views over a detection run for presentation layers
//!
//! Nothing here feeds back into detection. These types regroup a
//! [`DetectionRun`] the way summary cards, charts and tables consume it,
//! and format numbers to a fixed precision ([`DISPLAY_PRECISION`] by
//! default).
//!
//! ```text
//! Sensor Anomaly Detection Results
//! ======================================================================
//! Time Range: 2024-01-01 to 2024-01-08
//! Sigma Threshold: 3σ
//!
//! Sensor: sensor_002
//!    Readings: 11
//!    Mean: 77.27 | Std Dev: 38.81 | Threshold (3σ): 193.71
//!    Found 1 anomalies:
//!       - 2024-01-05 12:00:00 | Value: 200.00 | Deviation: 3.16σ
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::{
    constants::{
        time::{DISPLAY_DATE_FORMAT, DISPLAY_TIMESTAMP_FORMAT},
        DEFAULT_TOP_ANOMALIES, DISPLAY_PRECISION,
    },
    detector::AnomalyRecord,
    pipeline::DetectionRun,
    stats::{SensorStatistics, StatisticsMap},
    time::Timestamp,
};

const RULE_WIDTH: usize = 70;

/// Format `value` with exactly `precision` fractional digits
pub fn format_fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Anomaly counts per sensor, for distribution charts
pub fn anomaly_distribution(anomalies: &[AnomalyRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for anomaly in anomalies {
        *counts.entry(anomaly.sensor_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// One row of the anomaly detail table, every column preformatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyRow {
    pub timestamp: String,
    pub sensor_id: String,
    pub value: String,
    pub mean: String,
    pub stddev: String,
    pub threshold: String,
    pub deviation: String,
}

impl AnomalyRow {
    pub fn new(record: &AnomalyRecord, precision: usize) -> Self {
        Self {
            timestamp: record.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
            sensor_id: record.sensor_id.clone(),
            value: format_fixed(record.value, precision),
            mean: format_fixed(record.mean, precision),
            stddev: format_fixed(record.stddev, precision),
            threshold: format_fixed(record.threshold, precision),
            deviation: format_fixed(record.deviation, precision),
        }
    }
}

/// Summary card for one sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorCard {
    pub sensor_id: String,
    pub count: usize,
    pub mean: String,
    pub stddev: String,
    pub min: String,
    pub max: String,
}

/// Cards for every sensor, ordered by sensor id
pub fn sensor_cards(statistics: &StatisticsMap, precision: usize) -> Vec<SensorCard> {
    statistics
        .iter()
        .map(|(sensor_id, s)| SensorCard {
            sensor_id: sensor_id.clone(),
            count: s.count,
            mean: format_fixed(s.mean, precision),
            stddev: format_fixed(s.stddev, precision),
            min: format_fixed(s.min, precision),
            max: format_fixed(s.max, precision),
        })
        .collect()
}

/// Statistics and anomalies for a single sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReport {
    pub sensor_id: String,
    pub statistics: SensorStatistics,
    pub threshold: f64,
    /// This sensor's anomalies, most deviant first
    pub anomalies: Vec<AnomalyRecord>,
}

/// A run regrouped per sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub window_start: Timestamp,
    pub window_now: Timestamp,
    pub sigma: f64,
    /// Ordered by sensor id
    pub sensors: Vec<SensorReport>,
    /// All anomalies in ranking order
    pub anomalies: Vec<AnomalyRecord>,
}

impl DetectionReport {
    pub fn new(run: &DetectionRun) -> Self {
        let sensors = run
            .statistics
            .iter()
            .map(|(sensor_id, statistics)| SensorReport {
                sensor_id: sensor_id.clone(),
                statistics: *statistics,
                threshold: statistics.threshold(run.sigma),
                // Ranking order is preserved by filtering the ranked list
                anomalies: run
                    .anomalies
                    .iter()
                    .filter(|a| &a.sensor_id == sensor_id)
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            window_start: run.window.start(),
            window_now: run.window.now(),
            sigma: run.sigma,
            sensors,
            anomalies: run.anomalies.clone(),
        }
    }

    pub fn total_anomalies(&self) -> usize {
        self.anomalies.len()
    }

    pub fn distribution(&self) -> BTreeMap<String, usize> {
        anomaly_distribution(&self.anomalies)
    }

    /// Detail table rows in ranking order
    pub fn rows(&self, precision: usize) -> Vec<AnomalyRow> {
        self.anomalies
            .iter()
            .map(|a| AnomalyRow::new(a, precision))
            .collect()
    }

    /// Plain-text rendering listing at most `top_n` anomalies per sensor
    pub fn text(&self, top_n: usize) -> TextReport<'_> {
        TextReport { report: self, top_n }
    }

    pub fn render_text(&self) -> String {
        self.text(DEFAULT_TOP_ANOMALIES).to_string()
    }
}

/// [`fmt::Display`] adapter returned by [`DetectionReport::text`]
pub struct TextReport<'a> {
    report: &'a DetectionReport,
    top_n: usize,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let p = DISPLAY_PRECISION;
        let rule = "=".repeat(RULE_WIDTH);
        let sigma = report.sigma;

        writeln!(f, "Sensor Anomaly Detection Results")?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Time Range: {} to {}",
            report.window_start.format(DISPLAY_DATE_FORMAT),
            report.window_now.format(DISPLAY_DATE_FORMAT)
        )?;
        writeln!(f, "Sigma Threshold: {}σ", sigma)?;
        writeln!(f)?;

        for sensor in &report.sensors {
            let s = &sensor.statistics;
            writeln!(f, "Sensor: {}", sensor.sensor_id)?;
            writeln!(f, "   Readings: {}", s.count)?;
            writeln!(
                f,
                "   Mean: {} | Std Dev: {} | Threshold ({}σ): {}",
                format_fixed(s.mean, p),
                format_fixed(s.stddev, p),
                sigma,
                format_fixed(sensor.threshold, p)
            )?;

            if sensor.anomalies.is_empty() {
                writeln!(f, "   No anomalies detected")?;
            } else {
                writeln!(f, "   Found {} anomalies:", sensor.anomalies.len())?;
                for anomaly in sensor.anomalies.iter().take(self.top_n) {
                    writeln!(
                        f,
                        "      - {} | Value: {} | Deviation: {}σ",
                        anomaly.timestamp.format(DISPLAY_TIMESTAMP_FORMAT),
                        format_fixed(anomaly.value, p),
                        format_fixed(anomaly.deviation, p)
                    )?;
                }
                if sensor.anomalies.len() > self.top_n {
                    writeln!(f, "      ... and {} more", sensor.anomalies.len() - self.top_n)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Summary: {} total anomalies detected across {} sensors",
            report.total_anomalies(),
            report.sensors.len()
        )?;
        writeln!(f, "{}", rule)
    }
}
