//! Common test utilities for integration tests
//!
//! This module provides:
//! - A fixed `now` shared by every scenario
//! - Deterministic reading generators
//! - Pre-built scenarios with their expected outcomes

#![allow(dead_code)]

pub mod generators;
pub mod scenarios;

use chrono::{DateTime, TimeZone, Utc};
use sigmaguard_core::{AnomalyPipeline, DetectionConfig, FixedClock};

/// Instant every scenario is evaluated at
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Pipeline pinned to [`test_now`]
pub fn pinned_pipeline(config: DetectionConfig) -> AnomalyPipeline<FixedClock> {
    AnomalyPipeline::new(config)
        .expect("valid test config")
        .with_clock(FixedClock::new(test_now()))
}

/// Approximate float comparison
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
