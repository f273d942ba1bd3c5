//! # Snapshot Report Tests
//!
//! The summary block keeps a fixed label set and units so that reports
//! stay comparable across runs.

use cachepower_core::accounting::EnergySnapshot;
use cachepower_core::common::{Joules, SimTime, SquareMillimeters, Watts};
use cachepower_core::dvfs::OperatingPoint;
use pretty_assertions::assert_eq;

use crate::common::fixed_accountant;

fn sample_snapshot() -> EnergySnapshot {
    EnergySnapshot {
        time: SimTime::from_secs(2),
        operating_point: OperatingPoint::from_registry(1.0, 2.0),
        area: SquareMillimeters(1.25),
        leakage_power: Watts(0.5),
        leakage_energy: Joules(1.5),
        dynamic_energy: Joules(0.25),
        last_dynamic_energy: Joules(0.125),
        average_static_power: Watts(0.75),
        average_dynamic_power: Watts(0.125),
    }
}

#[test]
fn test_summary_block() {
    let mut out: Vec<u8> = Vec::new();
    sample_snapshot().write_summary(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "    Area (in mm^2): 1.25\n\
         \x20   Average Static Power (in W): 0.75\n\
         \x20   Average Dynamic Power (in W): 0.125\n\
         \x20   Total Leakage Energy (in J): 1.5\n\
         \x20   Total Dynamic Energy (in J): 0.25\n"
    );
}

#[test]
fn test_display_matches_summary() {
    let snapshot = sample_snapshot();
    let mut out: Vec<u8> = Vec::new();
    snapshot.write_summary(&mut out).unwrap();
    assert_eq!(snapshot.to_string(), String::from_utf8(out).unwrap());
}

#[test]
fn test_summary_labels_and_units() {
    let text = fixed_accountant()
        .snapshot(SimTime::from_secs(1))
        .unwrap()
        .to_string();
    let labels: Vec<&str> = text
        .lines()
        .map(|line| line.trim_start().split(": ").next().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Area (in mm^2)",
            "Average Static Power (in W)",
            "Average Dynamic Power (in W)",
            "Total Leakage Energy (in J)",
            "Total Dynamic Energy (in J)",
        ]
    );
    assert!(text.lines().all(|line| line.starts_with("    ")));
}

#[test]
fn test_snapshot_serializes_to_json() {
    let value = serde_json::to_value(sample_snapshot()).unwrap();
    assert_eq!(value["time"], 2_000_000_000_000_u64);
    assert_eq!(value["operating_point"]["voltage"], 1.0);
    assert_eq!(value["operating_point"]["frequency"], 2e9);
    assert_eq!(value["leakage_energy"], 1.5);
    assert_eq!(value["average_dynamic_power"], 0.125);
}
