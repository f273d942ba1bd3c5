//! Static cache geometry shared by every operating-point model.
//!
//! A [`CacheGeometry`] is resolved once from the configuration document and
//! never changes afterwards. Resolution is the only place configuration keys
//! are checked: a missing key is logged with its full path before the error is
//! returned, so the operator can fix the file rather than read the code.

use tracing::error;

use crate::common::EnergyError;
use crate::config::{BufferConfig, Config, DeviceType, PortConfig};

/// Immutable description of the simulated cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheGeometry {
    /// Capacity in bytes.
    pub size_bytes: u64,
    /// Line size in bytes.
    pub line_bytes: u64,
    /// Ways per set.
    pub associativity: u32,
    /// Independent banks.
    pub banks: u32,
    /// Tag-and-data access latency in cycles.
    pub access_latency_cycles: u64,
    /// Output width in bytes.
    pub output_width_bytes: u64,
    /// Access-policy flag forwarded to the power model.
    pub policy: u32,
    /// Accesses accepted per cycle.
    pub throughput: u32,
    /// Port counts per bank.
    pub ports: PortConfig,
    /// Miss/fill/prefetch/writeback buffer sizes.
    pub buffers: BufferConfig,
    /// Fraction of cycles the arrays are active.
    pub duty_cycle: f64,
    /// Transistor flavour of the arrays.
    pub device_type: DeviceType,
    /// Longer-channel devices; selects which subthreshold leakage figure is reported.
    pub long_channel: bool,
    /// Technology node in nanometres.
    pub technology_node_nm: u32,
    /// Ambient temperature in Kelvin.
    pub temperature_k: u32,
}

impl CacheGeometry {
    /// Resolves and validates the geometry described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - The parsed configuration document.
    ///
    /// # Returns
    ///
    /// The validated geometry.
    ///
    /// # Errors
    ///
    /// [`EnergyError::MissingConfig`] naming the first absent required key, or
    /// [`EnergyError::InvalidConfig`] for zero, out-of-range or inconsistent values.
    pub fn from_config(config: &Config) -> Result<Self, EnergyError> {
        let general = &config.general;
        let cache = &config.cache;

        let technology_node_nm = nonzero(
            require(general.technology_node, "general/technology_node")?,
            "general/technology_node",
        )?;
        let temperature_k = nonzero(
            require(general.temperature, "general/temperature")?,
            "general/temperature",
        )?;

        let size_bytes = nonzero(require(cache.size_bytes, "cache/size_bytes")?, "cache/size_bytes")?;
        let line_bytes = nonzero(require(cache.line_bytes, "cache/line_bytes")?, "cache/line_bytes")?;
        let associativity = nonzero(
            require(cache.associativity, "cache/associativity")?,
            "cache/associativity",
        )?;
        let banks = nonzero(require(cache.banks, "cache/banks")?, "cache/banks")?;
        let access_latency_cycles = nonzero(
            require(cache.access_latency_cycles, "cache/access_latency_cycles")?,
            "cache/access_latency_cycles",
        )?;
        let output_width_bytes = nonzero(
            cache.output_width_bytes.unwrap_or(line_bytes),
            "cache/output_width_bytes",
        )?;
        let throughput = nonzero(cache.throughput, "cache/throughput")?;

        if !(cache.duty_cycle > 0.0 && cache.duty_cycle <= 1.0) {
            return Err(EnergyError::invalid(
                "cache/duty_cycle",
                format!("{} is outside (0, 1]", cache.duty_cycle),
            ));
        }

        if size_bytes.checked_mul(8).is_none() {
            return Err(EnergyError::invalid(
                "cache/size_bytes",
                format!("{size_bytes} bytes exceeds the addressable bit count"),
            ));
        }
        let Some(ways_bytes) = line_bytes.checked_mul(u64::from(associativity)) else {
            error!(line_bytes, associativity, "line size times associativity overflows");
            return Err(EnergyError::invalid(
                "cache/line_bytes",
                format!("{line_bytes} bytes x {associativity} ways overflows"),
            ));
        };
        if size_bytes % ways_bytes != 0 {
            return Err(EnergyError::invalid(
                "cache/size_bytes",
                format!(
                    "{size_bytes} is not a multiple of line_bytes * associativity ({ways_bytes})"
                ),
            ));
        }
        if (size_bytes / ways_bytes) % u64::from(banks) != 0 {
            return Err(EnergyError::invalid(
                "cache/banks",
                format!("{} sets cannot be split across {banks} banks", size_bytes / ways_bytes),
            ));
        }

        Ok(Self {
            size_bytes,
            line_bytes,
            associativity,
            banks,
            access_latency_cycles,
            output_width_bytes,
            policy: cache.policy,
            throughput,
            ports: cache.ports,
            buffers: cache.buffers,
            duty_cycle: cache.duty_cycle,
            device_type: cache.device_type,
            long_channel: cache.long_channel,
            technology_node_nm,
            temperature_k,
        })
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> u64 {
        match self.line_bytes.checked_mul(self.associativity as u64) {
            Some(0) | None => 0,
            Some(ways_bytes) => self.size_bytes / ways_bytes,
        }
    }

    /// Data-array capacity in bits.
    pub const fn data_bits(&self) -> u64 {
        self.size_bytes.saturating_mul(8)
    }

    /// Width of one tag entry in bits, including valid and dirty bits.
    ///
    /// # Arguments
    ///
    /// * `address_bits` - Physical address width the tags must cover.
    pub fn tag_bits(&self, address_bits: u32) -> u32 {
        let offset = self.line_bytes.max(1).ilog2();
        let index = self.num_sets().max(1).ilog2();
        address_bits.saturating_sub(offset + index) + 2
    }
}

/// Unwraps a required key, logging its path when it is absent.
fn require<T>(value: Option<T>, key: &'static str) -> Result<T, EnergyError> {
    value.ok_or_else(|| {
        error!(key, "could not read [{key}] from the configuration");
        EnergyError::MissingConfig { key }
    })
}

fn nonzero<T>(value: T, key: &'static str) -> Result<T, EnergyError>
where
    T: Copy + Default + PartialEq,
{
    if value == T::default() {
        error!(key, "configuration key [{key}] must be non-zero");
        return Err(EnergyError::invalid(key, "must be non-zero"));
    }
    Ok(value)
}
