//! Sensor readings
//!
//! [`Reading`] is the only record shape the aggregator and detector accept.
//! Its fields are private and there are no setters: once the filter has
//! built one it is never changed.
//!
//! [`RawReading`] is the typed but unvalidated form handed over by an input
//! collaborator that already decoded its own format. Converting it runs the
//! same checks as the JSON boundary in [`crate::filter`](mod@crate::filter).

use serde::{Deserialize, Serialize};

use crate::{errors::RecordIssue, time::{parse_timestamp, Timestamp}};

/// One validated sensor observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    sensor_id: String,
    value: f64,
    timestamp: Timestamp,
}

impl Reading {
    /// Build a reading, rejecting an empty id or a non-finite value
    pub fn new(
        sensor_id: impl Into<String>,
        value: f64,
        timestamp: Timestamp,
    ) -> Result<Self, RecordIssue> {
        let sensor_id = sensor_id.into();
        if sensor_id.is_empty() {
            return Err(RecordIssue::EmptySensorId);
        }
        if !value.is_finite() {
            return Err(RecordIssue::NonFiniteValue);
        }
        Ok(Self {
            sensor_id,
            value,
            timestamp,
        })
    }

    /// Sensor identity this reading belongs to
    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    /// Observed value, always finite
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Absolute instant of the observation
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Reading as decoded by an input collaborator, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub sensor_id: String,
    pub value: f64,
    pub timestamp: String,
}

impl RawReading {
    pub fn new(sensor_id: impl Into<String>, value: f64, timestamp: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            value,
            timestamp: timestamp.into(),
        }
    }
}

impl TryFrom<&RawReading> for Reading {
    type Error = RecordIssue;

    fn try_from(raw: &RawReading) -> Result<Self, Self::Error> {
        let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| {
            RecordIssue::UnparseableTimestamp {
                raw: raw.timestamp.clone(),
            }
        })?;
        Reading::new(raw.sensor_id.as_str(), raw.value, timestamp)
    }
}
