//! Error Handling Example
//!
//! Shows which problems abort a run and which only drop a record.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_error_handling
//! ```

use chrono::{TimeZone, Utc};
use sigmaguard_core::{
    aggregate, detect, AnomalyPipeline, DetectionConfig, DetectionError, FixedClock,
};

fn main() {
    println!("SigmaGuard Error Handling Example");
    println!("=================================\n");

    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let pipeline = AnomalyPipeline::new(DetectionConfig::default())
        .expect("default config is valid")
        .with_clock(FixedClock::new(now));

    let inputs = [
        ("not JSON", "readings: 1, 2, 3"),
        ("object instead of list", r#"{ "sensor_id": "sensor_001", "value": 1 }"#),
        ("list of numbers", "[1, 2, 3]"),
        (
            "bad records only",
            r#"[
                { "sensor_id": "sensor_001", "value": "n/a", "timestamp": "2024-06-15T10:00:00Z" },
                { "sensor_id": "", "value": 3.0, "timestamp": "2024-06-15T10:00:00Z" },
                { "sensor_id": "sensor_001", "value": 3.0, "timestamp": "soon" },
                { "sensor_id": "sensor_001", "value": 3.0 }
            ]"#,
        ),
    ];

    for (label, text) in inputs {
        print!("{:<24} -> ", label);
        match pipeline.run_str(text) {
            Ok(run) => {
                println!("ok, {} readings, {} skipped", run.readings.len(), run.skipped.len());
                for skipped in &run.skipped {
                    println!("{:<28}#{}: {}", "", skipped.index, skipped.issue);
                }
            }
            Err(DetectionError::MalformedInput { reason }) => println!("malformed: {}", reason),
            Err(e) => println!("error: {}", e),
        }
    }

    println!("\nConfiguration errors:");
    for sigma in [0.0, -2.0, f64::NAN] {
        match AnomalyPipeline::new(DetectionConfig::default().with_sigma(sigma)) {
            Ok(_) => println!("  sigma {} accepted", sigma),
            Err(e) => println!("  {}", e),
        }
    }

    println!("\nMismatched inputs:");
    let single = r#"[
        { "sensor_id": "sensor_001", "value": 21.0, "timestamp": "2024-06-15T10:00:00Z" }
    ]"#;
    let run = pipeline.run_str(single).expect("valid input");
    let other = aggregate(&[]);
    match detect(&run.readings, &other, 3.0) {
        Ok(_) => println!("  unexpectedly classified"),
        Err(e) => println!("  {}", e),
    }
}
