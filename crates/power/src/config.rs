//! Configuration document for the cache energy accountant.
//!
//! This module defines the serde structures the simulator's configuration is
//! loaded into. It provides:
//! 1. **Defaults:** Baseline cache parameters that the power model fixes when the file is silent.
//! 2. **Structures:** `general`, `cache`, `dvfs` and `reference_model` sections.
//! 3. **Loading:** JSON parsing from a string or a file.
//!
//! Keys that have no sensible default (technology node, temperature, cache
//! geometry, DVFS levels) are kept as `Option` here and resolved by
//! [`CacheGeometry::from_config`](crate::geometry::CacheGeometry::from_config)
//! and [`DvfsLevels::from_config`](crate::dvfs::DvfsLevels::from_config), which
//! report exactly which key is missing.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::EnergyError;

/// Default configuration constants.
///
/// These values are the cache-model settings the simulator has always fixed
/// for a shared L2-style cache when they are not overridden.
mod defaults {
    /// Read ports per bank.
    pub const READ_PORTS: u32 = 1;

    /// Write ports per bank.
    pub const WRITE_PORTS: u32 = 1;

    /// Combined read/write ports per bank.
    pub const READ_WRITE_PORTS: u32 = 1;

    /// Entries in each of the miss, fill, prefetch and writeback buffers.
    pub const BUFFER_ENTRIES: u32 = 4;

    /// Accesses accepted per cycle.
    pub const THROUGHPUT: u32 = 1;

    /// Cache access-policy flag handed to the power model.
    ///
    /// `1` selects sequential tag-then-data access.
    pub const ACCESS_POLICY: u32 = 1;

    /// Fraction of cycles the cache is assumed active.
    pub const DUTY_CYCLE: f64 = 0.5;

    /// SRAM cell footprint in units of F^2.
    pub const CELL_AREA_F2: f64 = 146.0;

    /// Multiplier for decoders, sense amplifiers and routing around the arrays.
    pub const ARRAY_OVERHEAD: f64 = 1.4;

    /// Feature size the leakage and energy coefficients are quoted at, in nm.
    pub const REFERENCE_NODE_NM: f64 = 45.0;

    /// Temperature the leakage coefficients are quoted at, in Kelvin.
    pub const REFERENCE_TEMPERATURE_K: f64 = 300.0;

    /// Temperature rise that doubles subthreshold leakage, in Kelvin.
    pub const LEAKAGE_DOUBLING_K: f64 = 25.0;

    /// Subthreshold leakage current per bit at 1 V, in nA.
    pub const SUBTHRESHOLD_NA_PER_BIT: f64 = 10.0;

    /// Fraction of subthreshold leakage that remains with longer-channel devices.
    pub const LONG_CHANNEL_FACTOR: f64 = 0.75;

    /// Fraction of subthreshold leakage that remains with low-standby-power devices.
    pub const LOW_STANDBY_FACTOR: f64 = 0.05;

    /// Gate leakage current per bit at 1 V, in nA.
    pub const GATE_NA_PER_BIT: f64 = 1.0;

    /// Switching energy per data-array bit at 1 V, in fJ.
    pub const DATA_FJ_PER_BIT: f64 = 10.0;

    /// Switching energy per tag-array bit at 1 V, in fJ.
    pub const TAG_FJ_PER_BIT: f64 = 5.0;

    /// Decoder and output-driver energy per port access at 1 V, in pJ.
    pub const PORT_PJ_PER_ACCESS: f64 = 1.0;

    /// Buffer allocation energy per miss at 1 V, in pJ.
    pub const MISS_PJ: f64 = 2.0;
}

/// Transistor flavour used for the cache arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DeviceType {
    /// High-performance devices (fast, leaky).
    #[default]
    #[serde(alias = "HP")]
    HighPerformance,
    /// Low-standby-power devices (slow, low leakage).
    #[serde(alias = "LSTP")]
    LowStandbyPower,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachepower_core::config::Config;
///
/// let json = r#"{
///     "general": { "technology_node": 45, "temperature": 350 },
///     "cache": {
///         "size_bytes": 262144,
///         "line_bytes": 64,
///         "associativity": 8,
///         "banks": 1,
///         "access_latency_cycles": 10
///     },
///     "dvfs": {
///         "levels": [
///             { "voltage": 0.8, "frequency_ghz": 1.0 },
///             { "voltage": 1.0, "frequency_ghz": 2.0 }
///         ],
///         "initial_voltage": 0.8
///     }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.general.technology_node, Some(45));
/// assert_eq!(config.cache.ports.read, 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Technology and environment settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache geometry and power-model settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// DVFS operating points
    #[serde(default)]
    pub dvfs: DvfsConfig,
    /// Coefficients for the built-in reference power model
    #[serde(default)]
    pub reference_model: ReferenceModelConfig,
}

impl Config {
    /// Parses a configuration document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::ConfigParse`] if the text is not a valid document.
    pub fn from_json_str(json: &str) -> Result<Self, EnergyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::ConfigIo`] if the file cannot be read and
    /// [`EnergyError::ConfigParse`] if it is not a valid document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EnergyError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Technology and environment settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Technology node in nanometres (`general/technology_node`)
    #[serde(default)]
    pub technology_node: Option<u32>,
    /// Ambient temperature in Kelvin (`general/temperature`)
    #[serde(default)]
    pub temperature: Option<u32>,
}

/// Port counts per bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PortConfig {
    /// Read-only ports
    #[serde(default = "PortConfig::default_read")]
    pub read: u32,
    /// Write-only ports
    #[serde(default = "PortConfig::default_write")]
    pub write: u32,
    /// Shared read/write ports
    #[serde(default = "PortConfig::default_read_write")]
    pub read_write: u32,
}

impl PortConfig {
    fn default_read() -> u32 {
        defaults::READ_PORTS
    }

    fn default_write() -> u32 {
        defaults::WRITE_PORTS
    }

    fn default_read_write() -> u32 {
        defaults::READ_WRITE_PORTS
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            read: defaults::READ_PORTS,
            write: defaults::WRITE_PORTS,
            read_write: defaults::READ_WRITE_PORTS,
        }
    }
}

/// Buffer sizes (entries) attached to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BufferConfig {
    /// Miss buffer entries
    #[serde(default = "BufferConfig::default_entries")]
    pub miss: u32,
    /// Fill buffer entries
    #[serde(default = "BufferConfig::default_entries")]
    pub fill: u32,
    /// Prefetch buffer entries
    #[serde(default = "BufferConfig::default_entries")]
    pub prefetch: u32,
    /// Writeback buffer entries
    #[serde(default = "BufferConfig::default_entries")]
    pub writeback: u32,
}

impl BufferConfig {
    fn default_entries() -> u32 {
        defaults::BUFFER_ENTRIES
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            miss: defaults::BUFFER_ENTRIES,
            fill: defaults::BUFFER_ENTRIES,
            prefetch: defaults::BUFFER_ENTRIES,
            writeback: defaults::BUFFER_ENTRIES,
        }
    }
}

/// Cache geometry and power-model settings.
///
/// Geometry keys are required; the remaining keys default to the values the
/// power model has always been given for this cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Capacity in bytes (`cache/size_bytes`)
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Line size in bytes (`cache/line_bytes`)
    #[serde(default)]
    pub line_bytes: Option<u64>,
    /// Associativity (`cache/associativity`)
    #[serde(default)]
    pub associativity: Option<u32>,
    /// Number of banks (`cache/banks`)
    #[serde(default)]
    pub banks: Option<u32>,
    /// Tag-and-data access latency in cycles (`cache/access_latency_cycles`)
    #[serde(default)]
    pub access_latency_cycles: Option<u64>,
    /// Output width in bytes; defaults to the line size
    #[serde(default)]
    pub output_width_bytes: Option<u64>,
    /// Access-policy flag passed through to the power model
    #[serde(default = "CacheConfig::default_policy")]
    pub policy: u32,
    /// Accesses accepted per cycle
    #[serde(default = "CacheConfig::default_throughput")]
    pub throughput: u32,
    /// Port counts
    #[serde(default)]
    pub ports: PortConfig,
    /// Buffer sizes
    #[serde(default)]
    pub buffers: BufferConfig,
    /// Activity duty cycle in `(0, 1]`
    #[serde(default = "CacheConfig::default_duty_cycle")]
    pub duty_cycle: f64,
    /// Device flavour of the arrays
    #[serde(default)]
    pub device_type: DeviceType,
    /// Use longer-channel devices (selects the long-channel leakage figure)
    #[serde(default = "CacheConfig::default_long_channel")]
    pub long_channel: bool,
}

impl CacheConfig {
    fn default_policy() -> u32 {
        defaults::ACCESS_POLICY
    }

    fn default_throughput() -> u32 {
        defaults::THROUGHPUT
    }

    fn default_duty_cycle() -> f64 {
        defaults::DUTY_CYCLE
    }

    /// Longer-channel devices are on unless explicitly disabled.
    fn default_long_channel() -> bool {
        true
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: None,
            line_bytes: None,
            associativity: None,
            banks: None,
            access_latency_cycles: None,
            output_width_bytes: None,
            policy: defaults::ACCESS_POLICY,
            throughput: defaults::THROUGHPUT,
            ports: PortConfig::default(),
            buffers: BufferConfig::default(),
            duty_cycle: defaults::DUTY_CYCLE,
            device_type: DeviceType::default(),
            long_channel: true,
        }
    }
}

/// One DVFS level as published by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DvfsLevelConfig {
    /// Supply voltage in volts
    pub voltage: f64,
    /// Maximum frequency at this voltage, in GHz
    pub frequency_ghz: f64,
}

/// DVFS operating points.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DvfsConfig {
    /// Supported levels, in registry order (`dvfs/levels`)
    #[serde(default)]
    pub levels: Option<Vec<DvfsLevelConfig>>,
    /// Voltage the cache starts at; the first level when absent
    #[serde(default)]
    pub initial_voltage: Option<f64>,
}

/// Coefficient table for the built-in reference power model.
///
/// All electrical coefficients are quoted at 1 V, the reference node and
/// the reference temperature.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReferenceModelConfig {
    /// SRAM cell footprint in F^2
    pub cell_area_f2: f64,
    /// Periphery area multiplier
    pub array_overhead: f64,
    /// Node the coefficients are quoted at, in nm
    pub reference_node_nm: f64,
    /// Temperature the coefficients are quoted at, in K
    pub reference_temperature_k: f64,
    /// Temperature rise that doubles subthreshold leakage, in K
    pub leakage_doubling_k: f64,
    /// Subthreshold leakage per bit, in nA
    pub subthreshold_na_per_bit: f64,
    /// Remaining subthreshold leakage with longer-channel devices
    pub long_channel_factor: f64,
    /// Remaining subthreshold leakage with low-standby-power devices
    pub low_standby_factor: f64,
    /// Gate leakage per bit, in nA
    pub gate_na_per_bit: f64,
    /// Data-array switching energy per bit, in fJ
    pub data_fj_per_bit: f64,
    /// Tag-array switching energy per bit, in fJ
    pub tag_fj_per_bit: f64,
    /// Port energy per read or write access, in pJ
    pub port_pj_per_access: f64,
    /// Buffer energy per miss, in pJ
    pub miss_pj: f64,
}

impl Default for ReferenceModelConfig {
    fn default() -> Self {
        Self {
            cell_area_f2: defaults::CELL_AREA_F2,
            array_overhead: defaults::ARRAY_OVERHEAD,
            reference_node_nm: defaults::REFERENCE_NODE_NM,
            reference_temperature_k: defaults::REFERENCE_TEMPERATURE_K,
            leakage_doubling_k: defaults::LEAKAGE_DOUBLING_K,
            subthreshold_na_per_bit: defaults::SUBTHRESHOLD_NA_PER_BIT,
            long_channel_factor: defaults::LONG_CHANNEL_FACTOR,
            low_standby_factor: defaults::LOW_STANDBY_FACTOR,
            gate_na_per_bit: defaults::GATE_NA_PER_BIT,
            data_fj_per_bit: defaults::DATA_FJ_PER_BIT,
            tag_fj_per_bit: defaults::TAG_FJ_PER_BIT,
            port_pj_per_access: defaults::PORT_PJ_PER_ACCESS,
            miss_pj: defaults::MISS_PJ,
        }
    }
}
