//! Reading Store / Filter
//!
//! ## Overview
//!
//! First stage of a detection run. Takes the raw input set, checks its
//! shape, validates every record and keeps the readings that fall inside
//! the recency window.
//!
//! ## Validation Layers
//!
//! ### 1. Structure (fatal)
//! The input must be a JSON array whose entries are all objects. Anything
//! else is [`DetectionError::MalformedInput`] and no partial result is
//! produced. The whole array is checked before any record is parsed.
//!
//! ### 2. Record schema (soft-skip)
//! Each object needs:
//! - `sensor_id`: non-empty string
//! - `value`: JSON number, finite. Strings such as `"21.5"` are rejected,
//!   never coerced. A literal outside the `f64` range (`1e400`) is skipped
//!   as non-finite
//! - `timestamp`: string in RFC 3339 or one of the naive UTC layouts
//!
//! A record failing any check is left out and reported as a
//! [`SkippedRecord`]. It never reaches the statistics, so a bad value cannot
//! be counted as zero.
//!
//! ### 3. Time window
//! ```text
//! cutoff = now - days_back days
//! keep iff timestamp >= cutoff          (WindowEnd::Open)
//! keep iff cutoff <= timestamp <= now   (WindowEnd::AtNow)
//! ```
//! The lower bound is inclusive: a reading exactly at the cutoff is kept,
//! one millisecond earlier is dropped.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::{DetectionError, DetectionResult, RecordIssue},
    reading::{RawReading, Reading},
    time::{parse_timestamp, window_start, Timestamp},
};

/// Whether readings dated after `now` stay in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEnd {
    /// Only the lower bound applies
    #[default]
    Open,
    /// Readings after `now` are dropped as well
    AtNow,
}

/// Recency window resolved against a concrete `now`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    start: Timestamp,
    now: Timestamp,
    end: WindowEnd,
}

impl TimeWindow {
    /// Window of `days_back` days ending at `now`, lower bound only
    pub fn new(now: Timestamp, days_back: u32) -> DetectionResult<Self> {
        Self::with_end(now, days_back, WindowEnd::Open)
    }

    pub fn with_end(now: Timestamp, days_back: u32, end: WindowEnd) -> DetectionResult<Self> {
        let start =
            window_start(now, days_back).ok_or(DetectionError::InvalidWindow { days_back })?;
        Ok(Self { start, now, end })
    }

    /// Inclusive cutoff
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Instant the window was resolved against
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        if timestamp < self.start {
            return false;
        }
        match self.end {
            WindowEnd::Open => true,
            WindowEnd::AtNow => timestamp <= self.now,
        }
    }
}

/// A record left out of the filtered set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Position in the input sequence
    pub index: usize,
    /// What was wrong with it
    pub issue: RecordIssue,
}

/// Output of a filter pass with the bookkeeping callers may want to show
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterReport {
    /// Valid readings inside the window, in input order
    pub readings: Vec<Reading>,
    /// Records that failed validation
    pub skipped: Vec<SkippedRecord>,
    /// Valid records that fell outside the window
    pub outside_window: usize,
}

impl FilterReport {
    /// Number of records inspected
    pub fn total(&self) -> usize {
        self.readings.len() + self.skipped.len() + self.outside_window
    }

    fn record(&mut self, index: usize, parsed: Result<Reading, RecordIssue>, window: &TimeWindow) {
        match parsed {
            Ok(reading) if window.contains(reading.timestamp()) => self.readings.push(reading),
            Ok(_) => self.outside_window += 1,
            Err(issue) => {
                debug!("skipping record {}: {}", index, issue);
                self.skipped.push(SkippedRecord { index, issue });
            }
        }
    }
}

/// Keep the readings from `input` dated within the last `days_back` days
pub fn filter(input: &Value, days_back: u32, now: Timestamp) -> DetectionResult<Vec<Reading>> {
    let window = TimeWindow::new(now, days_back)?;
    filter_detailed(input, &window).map(|report| report.readings)
}

/// Filter a JSON document against a resolved window
pub fn filter_detailed(input: &Value, window: &TimeWindow) -> DetectionResult<FilterReport> {
    let records = as_records(input)?;

    let mut report = FilterReport::default();
    for (index, record) in records.into_iter().enumerate() {
        report.record(index, parse_record(record), window);
    }
    Ok(report)
}

/// Parse JSON text, then filter it
pub fn filter_json_str(text: &str, window: &TimeWindow) -> DetectionResult<FilterReport> {
    let input: Value = serde_json::from_str(text)?;
    filter_detailed(&input, window)
}

/// Filter records already decoded by the caller
pub fn filter_raw(raw: &[RawReading], window: &TimeWindow) -> FilterReport {
    let mut report = FilterReport::default();
    for (index, record) in raw.iter().enumerate() {
        report.record(index, Reading::try_from(record), window);
    }
    report
}

/// Window-only filtering for readings that are already validated
pub fn filter_readings(readings: &[Reading], window: &TimeWindow) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| window.contains(r.timestamp()))
        .cloned()
        .collect()
}

fn as_records(input: &Value) -> DetectionResult<Vec<&Map<String, Value>>> {
    let entries = input.as_array().ok_or_else(|| {
        DetectionError::malformed(format!("expected an array of records, got {}", kind(input)))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry.as_object().ok_or_else(|| {
                DetectionError::malformed(format!(
                    "entry {} is {}, expected an object",
                    index,
                    kind(entry)
                ))
            })
        })
        .collect()
}

fn parse_record(record: &Map<String, Value>) -> Result<Reading, RecordIssue> {
    let sensor_id = match field(record, "sensor_id")? {
        Value::String(s) => s.as_str(),
        _ => {
            return Err(RecordIssue::WrongType {
                field: "sensor_id",
                expected: "a string",
            })
        }
    };

    let value = match field(record, "value")? {
        Value::Number(n) => n.as_f64().ok_or(RecordIssue::NonFiniteValue)?,
        _ => {
            return Err(RecordIssue::WrongType {
                field: "value",
                expected: "a number",
            })
        }
    };

    let timestamp = match field(record, "timestamp")? {
        Value::String(s) => {
            parse_timestamp(s).ok_or_else(|| RecordIssue::UnparseableTimestamp { raw: s.clone() })?
        }
        _ => {
            return Err(RecordIssue::WrongType {
                field: "timestamp",
                expected: "a timestamp string",
            })
        }
    };

    Reading::new(sensor_id, value, timestamp)
}

fn field<'a>(record: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, RecordIssue> {
    record.get(name).ok_or(RecordIssue::MissingField { field: name })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
    }

    #[test]
    fn keeps_readings_inside_window() {
        let input = json!([
            { "sensor_id": "s1", "value": 1.0, "timestamp": "2024-01-07T12:00:00Z" },
            { "sensor_id": "s1", "value": 2.0, "timestamp": "2023-12-01T00:00:00Z" },
            { "sensor_id": "s2", "value": 3.0, "timestamp": "2024-01-02T00:00:00Z" },
        ]);

        let readings = filter(&input, 7, now()).unwrap();
        let values: Vec<f64> = readings.iter().map(Reading::value).collect();
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn cutoff_is_inclusive() {
        let cutoff = now() - Duration::days(7);
        let just_before = cutoff - Duration::milliseconds(1);
        let input = json!([
            { "sensor_id": "s1", "value": 1.0, "timestamp": cutoff.to_rfc3339() },
            { "sensor_id": "s1", "value": 2.0, "timestamp": just_before.to_rfc3339() },
        ]);

        let readings = filter(&input, 7, now()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].timestamp(), cutoff);
    }

    #[test]
    fn top_level_must_be_array_of_objects() {
        let not_array = json!({ "sensor_id": "s1", "value": 1.0 });
        assert!(matches!(
            filter(&not_array, 7, now()),
            Err(DetectionError::MalformedInput { .. })
        ));

        let mixed = json!([
            { "sensor_id": "s1", "value": 1.0, "timestamp": "2024-01-07T00:00:00Z" },
            42,
        ]);
        let err = filter(&mixed, 7, now()).unwrap_err();
        assert_eq!(
            err,
            DetectionError::MalformedInput {
                reason: "entry 1 is a number, expected an object".to_string()
            }
        );
    }

    #[test]
    fn bad_records_are_skipped_not_fatal() {
        let window = TimeWindow::new(now(), 7).unwrap();
        let input = json!([
            { "sensor_id": "s1", "value": 1.0, "timestamp": "2024-01-07T00:00:00Z" },
            { "sensor_id": "s1", "value": "21.5", "timestamp": "2024-01-07T00:00:00Z" },
            { "sensor_id": "s1", "value": 1.0, "timestamp": "last tuesday" },
            { "sensor_id": "", "value": 1.0, "timestamp": "2024-01-07T00:00:00Z" },
            { "value": 1.0, "timestamp": "2024-01-07T00:00:00Z" },
            { "sensor_id": 7, "value": 1.0, "timestamp": "2024-01-07T00:00:00Z" },
        ]);

        let report = filter_detailed(&input, &window).unwrap();
        assert_eq!(report.readings.len(), 1);
        assert_eq!(report.total(), 6);

        let issues: Vec<&RecordIssue> = report.skipped.iter().map(|s| &s.issue).collect();
        assert_eq!(
            issues,
            vec![
                &RecordIssue::WrongType { field: "value", expected: "a number" },
                &RecordIssue::UnparseableTimestamp { raw: "last tuesday".to_string() },
                &RecordIssue::EmptySensorId,
                &RecordIssue::MissingField { field: "sensor_id" },
                &RecordIssue::WrongType { field: "sensor_id", expected: "a string" },
            ]
        );
        assert_eq!(report.skipped[0].index, 1);
    }

    #[test]
    fn future_readings_respect_window_end() {
        let tomorrow = (now() + Duration::days(1)).to_rfc3339();
        let input = json!([{ "sensor_id": "s1", "value": 1.0, "timestamp": tomorrow }]);

        let open = TimeWindow::new(now(), 7).unwrap();
        assert_eq!(filter_detailed(&input, &open).unwrap().readings.len(), 1);

        let bounded = TimeWindow::with_end(now(), 7, WindowEnd::AtNow).unwrap();
        let report = filter_detailed(&input, &bounded).unwrap();
        assert!(report.readings.is_empty());
        assert_eq!(report.outside_window, 1);
    }

    #[test]
    fn out_of_range_numbers_are_skipped() {
        let window = TimeWindow::new(now(), 7).unwrap();
        let huge_integer = format!("1{}", "0".repeat(400));
        let text = format!(
            r#"[
                {{ "sensor_id": "s1", "value": 1.0, "timestamp": "2024-01-07T00:00:00Z" }},
                {{ "sensor_id": "s1", "value": 1e400, "timestamp": "2024-01-07T00:00:00Z" }},
                {{ "sensor_id": "s1", "value": -1e400, "timestamp": "2024-01-07T00:00:00Z" }},
                {{ "sensor_id": "s1", "value": {}, "timestamp": "2024-01-07T00:00:00Z" }}
            ]"#,
            huge_integer
        );

        let report = filter_json_str(&text, &window).unwrap();
        assert_eq!(report.readings.len(), 1);
        assert_eq!(report.readings[0].value(), 1.0);

        let indices: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.issue == RecordIssue::NonFiniteValue));
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(filter(&json!([]), 7, now()).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_text() {
        let window = TimeWindow::new(now(), 7).unwrap();
        assert!(matches!(
            filter_json_str("[{\"sensor_id\":", &window),
            Err(DetectionError::Json(_))
        ));
    }

    #[test]
    fn raw_and_typed_paths_agree() {
        let window = TimeWindow::new(now(), 1).unwrap();
        let raw = vec![
            RawReading::new("s1", 5.0, "2024-01-07T12:00:00Z"),
            RawReading::new("s1", f64::NAN, "2024-01-07T12:00:00Z"),
            RawReading::new("s1", 6.0, "2024-01-01T12:00:00Z"),
        ];

        let report = filter_raw(&raw, &window);
        assert_eq!(report.readings.len(), 1);
        assert_eq!(report.skipped[0].issue, RecordIssue::NonFiniteValue);
        assert_eq!(report.outside_window, 1);

        let all: Vec<Reading> = raw
            .iter()
            .filter_map(|r| Reading::try_from(r).ok())
            .collect();
        assert_eq!(filter_readings(&all, &window), report.readings);
    }
}
