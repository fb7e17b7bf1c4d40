//! Pre-built scenarios with their expected outcomes
//!
//! Each scenario pairs an input document with the facts a correct run must
//! report about it.

use chrono::Duration;
use serde_json::{json, Value};

use super::{
    generators::{ReadingGenerator, STANDARD_SENSORS},
    test_now,
};

/// Expected test outcomes
#[derive(Debug, Default)]
pub struct ExpectedOutcomes {
    pub filtered: usize,
    pub skipped: usize,
    pub outside_window: usize,
    pub sensors: usize,
    pub anomalies: usize,
}

pub struct TestScenario {
    pub name: &'static str,
    pub input: Value,
    pub expected: ExpectedOutcomes,
}

pub struct Scenarios;

impl Scenarios {
    pub fn hours_ago(hours: i64) -> String {
        (test_now() - Duration::hours(hours)).to_rfc3339()
    }

    /// Four readings where the visual outlier stays below 3σ
    pub fn masked_outlier() -> TestScenario {
        let ts = Self::hours_ago(1);
        TestScenario {
            name: "masked_outlier",
            input: json!([
                { "sensor_id": "sensor_001", "value": 20.0, "timestamp": ts },
                { "sensor_id": "sensor_001", "value": 20.5, "timestamp": ts },
                { "sensor_id": "sensor_001", "value": 21.0, "timestamp": ts },
                { "sensor_id": "sensor_001", "value": 100.0, "timestamp": ts },
            ]),
            expected: ExpectedOutcomes {
                filtered: 4,
                sensors: 1,
                ..ExpectedOutcomes::default()
            },
        }
    }

    /// Ten humidity readings around 65 and one spike at 200
    pub fn humidity_spike() -> TestScenario {
        let mut records: Vec<Value> = (0..10)
            .map(|i| {
                json!({
                    "sensor_id": "sensor_002",
                    "value": if i % 2 == 0 { 64.5 } else { 65.5 },
                    "timestamp": Self::hours_ago(i + 2),
                })
            })
            .collect();
        records.push(json!({
            "sensor_id": "sensor_002",
            "value": 200.0,
            "timestamp": Self::hours_ago(1),
        }));

        TestScenario {
            name: "humidity_spike",
            input: Value::Array(records),
            expected: ExpectedOutcomes {
                filtered: 11,
                sensors: 1,
                anomalies: 1,
                ..ExpectedOutcomes::default()
            },
        }
    }

    /// Generated data for five sensors plus bad and stale records
    pub fn noisy_upload() -> TestScenario {
        let mut generator = ReadingGenerator::new(test_now());
        let mut records = generator.normal_records(&STANDARD_SENSORS, 200, 6.0);

        let recent = Self::hours_ago(3);
        records.push(json!({ "sensor_id": "sensor_001", "value": null, "timestamp": recent }));
        records.push(json!({ "sensor_id": "sensor_001", "value": 22.0 }));
        records.push(json!({ "sensor_id": "sensor_003", "value": "1013", "timestamp": recent }));
        records.push(generator.record("sensor_004", 450.0, 30.0));

        TestScenario {
            name: "noisy_upload",
            input: Value::Array(records),
            expected: ExpectedOutcomes {
                filtered: 200,
                skipped: 3,
                outside_window: 1,
                sensors: 5,
                anomalies: 0,
            },
        }
    }

    /// Generated data with one spike injected per sensor
    pub fn spiked_sensors() -> TestScenario {
        let mut generator = ReadingGenerator::new(test_now()).with_seed(7);
        let mut records = generator.normal_records(&STANDARD_SENSORS[..2], 120, 5.0);

        records.push(generator.record("sensor_001", 40.0, 0.5));
        records.push(generator.record("sensor_002", 130.0, 0.5));

        TestScenario {
            name: "spiked_sensors",
            input: Value::Array(records),
            expected: ExpectedOutcomes {
                filtered: 122,
                sensors: 2,
                anomalies: 2,
                ..ExpectedOutcomes::default()
            },
        }
    }
}
