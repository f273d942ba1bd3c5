//! # Geometry Tests
//!
//! Resolution of the static cache geometry: required keys, range checks
//! and derived quantities.

use cachepower_core::EnergyError;
use cachepower_core::config::{Config, DeviceType};
use cachepower_core::geometry::CacheGeometry;
use rstest::rstest;
use serde_json::Value;

use crate::common::{REFERENCE_CONFIG, reference_geometry};

/// Applies `edit` to the reference document and resolves its geometry.
fn resolve_with(edit: impl FnOnce(&mut Value)) -> Result<CacheGeometry, EnergyError> {
    let mut doc: Value = serde_json::from_str(REFERENCE_CONFIG).unwrap();
    edit(&mut doc);
    let config = Config::from_json_str(&doc.to_string()).unwrap();
    CacheGeometry::from_config(&config)
}

fn remove(doc: &mut Value, section: &str, key: &str) {
    let removed = doc[section].as_object_mut().unwrap().remove(key);
    assert!(removed.is_some(), "fixture has no {section}/{key}");
}

#[test]
fn test_reference_geometry() {
    let g = reference_geometry();
    assert_eq!(g.size_bytes, 262_144);
    assert_eq!(g.line_bytes, 64);
    assert_eq!(g.associativity, 8);
    assert_eq!(g.banks, 1);
    assert_eq!(g.access_latency_cycles, 10);
    assert_eq!(g.technology_node_nm, 45);
    assert_eq!(g.temperature_k, 350);
    assert_eq!(g.device_type, DeviceType::HighPerformance);
    assert!(g.long_channel);
}

#[test]
fn test_output_width_defaults_to_line_size() {
    assert_eq!(reference_geometry().output_width_bytes, 64);
}

#[test]
fn test_output_width_override() {
    let g = resolve_with(|doc| doc["cache"]["output_width_bytes"] = 32.into()).unwrap();
    assert_eq!(g.output_width_bytes, 32);
}

#[test]
fn test_derived_sizes() {
    let g = reference_geometry();
    // 256 KiB / (64 B * 8 ways)
    assert_eq!(g.num_sets(), 512);
    assert_eq!(g.data_bits(), 262_144 * 8);
    // 52 address bits - 6 offset bits - 9 index bits + valid + dirty
    assert_eq!(g.tag_bits(52), 39);
}

#[rstest]
#[case("general", "technology_node", "general/technology_node")]
#[case("general", "temperature", "general/temperature")]
#[case("cache", "size_bytes", "cache/size_bytes")]
#[case("cache", "line_bytes", "cache/line_bytes")]
#[case("cache", "associativity", "cache/associativity")]
#[case("cache", "banks", "cache/banks")]
#[case("cache", "access_latency_cycles", "cache/access_latency_cycles")]
fn test_missing_required_key(#[case] section: &str, #[case] key: &str, #[case] path: &str) {
    crate::common::harness::init_logging();
    let err = resolve_with(|doc| remove(doc, section, key)).unwrap_err();
    match err {
        EnergyError::MissingConfig { key } => assert_eq!(key, path),
        other => panic!("expected MissingConfig, got {other:?}"),
    }
}

#[rstest]
#[case("general", "technology_node", "general/technology_node")]
#[case("cache", "associativity", "cache/associativity")]
#[case("cache", "banks", "cache/banks")]
#[case("cache", "access_latency_cycles", "cache/access_latency_cycles")]
#[case("cache", "throughput", "cache/throughput")]
fn test_zero_value_is_invalid(#[case] section: &str, #[case] key: &str, #[case] path: &str) {
    let err = resolve_with(|doc| doc[section][key] = 0.into()).unwrap_err();
    match err {
        EnergyError::InvalidConfig { key, .. } => assert_eq!(key, path),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[rstest]
#[case(0.0)]
#[case(-0.25)]
#[case(1.5)]
fn test_duty_cycle_out_of_range(#[case] duty: f64) {
    let err = resolve_with(|doc| doc["cache"]["duty_cycle"] = duty.into()).unwrap_err();
    assert!(matches!(
        err,
        EnergyError::InvalidConfig {
            key: "cache/duty_cycle",
            ..
        }
    ));
}

#[test]
fn test_full_duty_cycle_accepted() {
    let g = resolve_with(|doc| doc["cache"]["duty_cycle"] = 1.0.into()).unwrap();
    assert_eq!(g.duty_cycle, 1.0);
}

#[test]
fn test_size_not_multiple_of_ways() {
    let err = resolve_with(|doc| doc["cache"]["size_bytes"] = 1000.into()).unwrap_err();
    assert!(matches!(
        err,
        EnergyError::InvalidConfig {
            key: "cache/size_bytes",
            ..
        }
    ));
}

#[test]
fn test_overflowing_line_size_is_invalid() {
    let err = resolve_with(|doc| doc["cache"]["line_bytes"] = u64::MAX.into()).unwrap_err();
    assert!(matches!(
        err,
        EnergyError::InvalidConfig {
            key: "cache/line_bytes",
            ..
        }
    ));
}

#[test]
fn test_overflowing_capacity_is_invalid() {
    let err = resolve_with(|doc| doc["cache"]["size_bytes"] = u64::MAX.into()).unwrap_err();
    assert!(matches!(
        err,
        EnergyError::InvalidConfig {
            key: "cache/size_bytes",
            ..
        }
    ));
}

#[test]
fn test_sets_not_divisible_by_banks() {
    // 512 sets over 3 banks
    let err = resolve_with(|doc| doc["cache"]["banks"] = 3.into()).unwrap_err();
    assert!(matches!(
        err,
        EnergyError::InvalidConfig {
            key: "cache/banks",
            ..
        }
    ));
}

#[test]
fn test_banked_geometry_accepted() {
    let g = resolve_with(|doc| doc["cache"]["banks"] = 4.into()).unwrap();
    assert_eq!(g.banks, 4);
}
