//! # Configuration Tests
//!
//! Deserialization, defaults and file loading of the JSON configuration.

use std::io::Write;

use cachepower_core::EnergyError;
use cachepower_core::config::*;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use crate::common::REFERENCE_CONFIG;

#[test]
fn test_config_default_leaves_required_keys_unset() {
    let config = Config::default();
    assert_eq!(config.general.technology_node, None);
    assert_eq!(config.general.temperature, None);
    assert_eq!(config.cache.size_bytes, None);
    assert_eq!(config.cache.associativity, None);
    assert!(config.dvfs.levels.is_none());
    assert_eq!(config.dvfs.initial_voltage, None);
}

#[test]
fn test_cache_config_defaults() {
    let cache = CacheConfig::default();
    assert_eq!(cache.policy, 1);
    assert_eq!(cache.throughput, 1);
    assert_eq!(cache.duty_cycle, 0.5);
    assert_eq!(cache.device_type, DeviceType::HighPerformance);
    assert!(cache.long_channel);
    assert_eq!(cache.output_width_bytes, None);
}

#[test]
fn test_port_and_buffer_defaults() {
    assert_eq!(
        PortConfig::default(),
        PortConfig {
            read: 1,
            write: 1,
            read_write: 1
        }
    );
    let buffers = BufferConfig::default();
    assert_eq!(
        [buffers.miss, buffers.fill, buffers.prefetch, buffers.writeback],
        [4, 4, 4, 4]
    );
}

#[test]
fn test_reference_model_defaults() {
    let c = ReferenceModelConfig::default();
    assert_eq!(c.cell_area_f2, 146.0);
    assert_eq!(c.reference_node_nm, 45.0);
    assert_eq!(c.reference_temperature_k, 300.0);
    assert_eq!(c.long_channel_factor, 0.75);
}

#[test]
fn test_parse_reference_document() {
    let config = Config::from_json_str(REFERENCE_CONFIG).unwrap();
    assert_eq!(config.general.technology_node, Some(45));
    assert_eq!(config.general.temperature, Some(350));
    assert_eq!(config.cache.size_bytes, Some(262_144));
    assert_eq!(config.cache.line_bytes, Some(64));
    assert_eq!(config.cache.associativity, Some(8));
    assert_eq!(config.cache.banks, Some(1));
    assert_eq!(config.cache.access_latency_cycles, Some(10));
    assert_eq!(config.cache.ports, PortConfig::default());
    assert_eq!(
        config.dvfs.levels,
        Some(vec![
            DvfsLevelConfig {
                voltage: 0.8,
                frequency_ghz: 1.0
            },
            DvfsLevelConfig {
                voltage: 1.0,
                frequency_ghz: 2.0
            },
        ])
    );
    assert_eq!(config.dvfs.initial_voltage, Some(0.8));
}

#[test]
fn test_partial_sections_keep_field_defaults() {
    let config = Config::from_json_str(
        r#"{ "cache": { "ports": { "read": 2 }, "buffers": { "fill": 8 } } }"#,
    )
    .unwrap();
    assert_eq!(config.cache.ports.read, 2);
    assert_eq!(config.cache.ports.write, 1);
    assert_eq!(config.cache.buffers.fill, 8);
    assert_eq!(config.cache.buffers.miss, 4);
    assert_eq!(config.cache.duty_cycle, 0.5);
}

#[test]
fn test_device_type_aliases() {
    let hp: DeviceType = serde_json::from_str(r#""HP""#).unwrap();
    let lstp: DeviceType = serde_json::from_str(r#""LSTP""#).unwrap();
    let full: DeviceType = serde_json::from_str(r#""LowStandbyPower""#).unwrap();
    assert_eq!(hp, DeviceType::HighPerformance);
    assert_eq!(lstp, DeviceType::LowStandbyPower);
    assert_eq!(full, DeviceType::LowStandbyPower);
}

#[test]
fn test_reference_model_override() {
    let config =
        Config::from_json_str(r#"{ "reference_model": { "miss_pj": 7.5 } }"#).unwrap();
    assert_eq!(config.reference_model.miss_pj, 7.5);
    assert_eq!(config.reference_model.cell_area_f2, 146.0);
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = Config::from_json_str("{ \"cache\": ").unwrap_err();
    assert!(matches!(err, EnergyError::ConfigParse(_)));
}

#[test]
fn test_wrong_type_is_parse_error() {
    let err = Config::from_json_str(r#"{ "cache": { "size_bytes": "big" } }"#).unwrap_err();
    assert!(matches!(err, EnergyError::ConfigParse(_)));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(REFERENCE_CONFIG.as_bytes()).unwrap();
    file.flush().unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.cache.size_bytes, Some(262_144));
}

#[test]
fn test_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EnergyError::ConfigIo(_)));
}
