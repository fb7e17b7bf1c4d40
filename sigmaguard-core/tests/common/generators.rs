//! Deterministic reading generators
//!
//! Uses a linear congruential generator so every run of the suite sees the
//! same data.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

/// Sensor profile used by the generator
pub struct SensorProfile {
    pub id: &'static str,
    pub base: f64,
    /// Relative spread, e.g. 0.1 for ±10%
    pub variation: f64,
}

impl SensorProfile {
    pub const fn new(id: &'static str, base: f64, variation: f64) -> Self {
        Self { id, base, variation }
    }
}

/// Temperature, humidity, pressure, CO2 and light sensors
pub const STANDARD_SENSORS: [SensorProfile; 5] = [
    SensorProfile::new("sensor_001", 22.0, 0.1),
    SensorProfile::new("sensor_002", 65.0, 0.1),
    SensorProfile::new("sensor_003", 1013.0, 0.1),
    SensorProfile::new("sensor_004", 450.0, 0.1),
    SensorProfile::new("sensor_005", 350.0, 0.1),
];

pub struct ReadingGenerator {
    seed: u32,
    now: DateTime<Utc>,
}

impl ReadingGenerator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { seed: 42, now }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Uniform float in [0, 1)
    pub fn random_float(&mut self) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        self.seed as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform float in [low, high)
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.random_float() * (high - low)
    }

    /// `count` records spread over the last `span_days`, values within
    /// each profile's variation band
    pub fn normal_records(
        &mut self,
        profiles: &[SensorProfile],
        count: usize,
        span_days: f64,
    ) -> Vec<Value> {
        (0..count)
            .map(|_| {
                let index = (self.random_float() * profiles.len() as f64) as usize;
                let profile = &profiles[index.min(profiles.len() - 1)];
                let spread = profile.base * profile.variation;
                let value = profile.base + self.uniform(-spread, spread);
                let age = self.uniform(0.0, span_days);
                self.record(profile.id, value, age)
            })
            .collect()
    }

    /// One record `age_days` before now, value rounded to two digits
    pub fn record(&self, sensor_id: &str, value: f64, age_days: f64) -> Value {
        let age = Duration::milliseconds((age_days * 86_400_000.0) as i64);
        json!({
            "sensor_id": sensor_id,
            "value": (value * 100.0).round() / 100.0,
            "timestamp": (self.now - age).to_rfc3339(),
        })
    }
}
