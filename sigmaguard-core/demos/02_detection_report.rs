//! Detection Report Example
//!
//! Runs the full pipeline on a JSON document and prints the text report
//! plus the preformatted rows a table widget would consume.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_detection_report
//! ```

use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use sigmaguard_core::{
    constants::DISPLAY_PRECISION, report::sensor_cards, AnomalyPipeline, DetectionConfig,
    DetectionReport, FixedClock,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pin the clock so the report is reproducible
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let ts = |minutes: i64| (now - Duration::minutes(minutes)).to_rfc3339();

    let mut records: Vec<Value> = Vec::new();
    for i in 0..48 {
        let wobble = (i % 6) as f64 * 0.4;
        records.push(json!({
            "sensor_id": "sensor_001",
            "value": 21.0 + wobble,
            "timestamp": ts(i * 30),
            "unit": "celsius",
        }));
        records.push(json!({
            "sensor_id": "sensor_004",
            "value": 440.0 + wobble * 10.0,
            "timestamp": ts(i * 30),
            "unit": "ppm",
        }));
    }
    records.push(json!({ "sensor_id": "sensor_001", "value": 38.2, "timestamp": ts(15) }));
    records.push(json!({ "sensor_id": "sensor_004", "value": 910.0, "timestamp": ts(45) }));
    records.push(json!({ "sensor_id": "sensor_004", "value": 875.0, "timestamp": ts(75) }));
    // Rejected: stringly-typed value
    records.push(json!({ "sensor_id": "sensor_004", "value": "12", "timestamp": ts(5) }));

    let config = DetectionConfig::from_json_str(r#"{ "sigma_threshold": 3.0, "days_back": 7 }"#)?;
    let pipeline = AnomalyPipeline::new(config)?.with_clock(FixedClock::new(now));
    let run = pipeline.run(&Value::Array(records))?;

    let report = DetectionReport::new(&run);
    print!("{}", report.render_text());

    println!("\nSkipped records:");
    for skipped in &run.skipped {
        println!("  #{}: {}", skipped.index, skipped.issue);
    }

    println!("\nSensor cards:");
    for card in sensor_cards(&run.statistics, DISPLAY_PRECISION) {
        println!(
            "  {} | n={} | mean {} | stddev {} | range {} - {}",
            card.sensor_id, card.count, card.mean, card.stddev, card.min, card.max
        );
    }

    println!("\nAnomaly table (JSON):");
    println!("{}", serde_json::to_string_pretty(&report.rows(DISPLAY_PRECISION))?);

    println!("\nDistribution: {:?}", report.distribution());

    // Only the detector reruns when sigma changes
    let relaxed = run.with_sigma(2.0)?;
    println!("At 2σ: {} anomalies (was {})", relaxed.anomaly_count(), run.anomaly_count());

    Ok(())
}
