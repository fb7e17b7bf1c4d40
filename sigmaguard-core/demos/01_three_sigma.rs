//! Three-Sigma Detection Example
//!
//! This example walks through the three pipeline stages by hand:
//! filtering raw records, aggregating per-sensor statistics and
//! classifying readings against `mean + 3 * stddev`.
//!
//! ## What You'll Learn
//!
//! - Why a single large outlier can hide itself by inflating the spread
//! - How a tight cluster makes the same rule very sensitive
//! - What happens to a sensor with only one reading
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_three_sigma
//! ```

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sigmaguard_core::{aggregate, detect, filter, DetectionError};

fn main() -> Result<(), DetectionError> {
    println!("SigmaGuard Three-Sigma Example");
    println!("==============================\n");

    let now = Utc::now();
    let ts = |hours: i64| (now - Duration::hours(hours)).to_rfc3339();

    let mut records = vec![
        // Temperature: three normal readings and one visual outlier
        json!({ "sensor_id": "sensor_001", "value": 20.0, "timestamp": ts(4) }),
        json!({ "sensor_id": "sensor_001", "value": 20.5, "timestamp": ts(3) }),
        json!({ "sensor_id": "sensor_001", "value": 21.0, "timestamp": ts(2) }),
        json!({ "sensor_id": "sensor_001", "value": 100.0, "timestamp": ts(1) }),
        // Pressure: a sensor that reported once
        json!({ "sensor_id": "sensor_003", "value": 1013.25, "timestamp": ts(1) }),
    ];

    // Humidity: ten readings around 65% and one spike
    for i in 0..10 {
        let value = if i % 2 == 0 { 64.5 } else { 65.5 };
        records.push(json!({ "sensor_id": "sensor_002", "value": value, "timestamp": ts(i + 2) }));
    }
    records.push(json!({ "sensor_id": "sensor_002", "value": 200.0, "timestamp": ts(1) }));

    let readings = filter(&Value::Array(records), 7, now)?;
    println!("{} readings inside the 7 day window\n", readings.len());

    let stats = aggregate(&readings);
    println!("Per-sensor statistics:");
    for (sensor_id, s) in &stats {
        println!(
            "  {}: n={:2} mean={:8.2} stddev={:7.2} threshold={:8.2}",
            sensor_id,
            s.count,
            s.mean,
            s.stddev,
            s.threshold(3.0)
        );
    }
    println!();

    let anomalies = detect(&readings, &stats, 3.0)?;
    println!("Anomalies (most deviant first):");
    if anomalies.is_empty() {
        println!("  none");
    }
    for a in &anomalies {
        println!(
            "  {} value={:.2} threshold={:.2} deviation={:.2}σ",
            a.sensor_id, a.value, a.threshold, a.deviation
        );
    }

    println!("\nNotes:");
    println!("  sensor_001: 100 is not flagged, it pulls the mean and stddev up with it");
    println!("  sensor_002: 200 is flagged against a cluster that barely moves");
    println!("  sensor_003: a single reading equals its own mean and is never flagged");

    Ok(())
}
