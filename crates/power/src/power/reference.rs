//! Coefficient-table reference oracle.
//!
//! Stands in for an external power-estimation engine when none is linked.
//! Every figure is a product of coefficients from [`ReferenceModelConfig`]
//! and the cache parameters:
//! - area scales with stored bits, ports and banks;
//! - leakage scales linearly with vdd, with the bit count, inversely with
//!   feature size, and doubles every `leakage_doubling_k` Kelvin;
//! - dynamic energy is a per-operation cost scaling with vdd^2.
//!
//! The clock rate is validated but does not enter the figures: energy per
//! access is frequency independent and leakage is a power.

use tracing::debug;

use super::{CacheEnergyModel, CacheModelParams, ModelOutput, PowerModelFactory};
use crate::common::{Joules, PowerError, SquareMicrons, Watts};
use crate::config::{DeviceType, ReferenceModelConfig};
use crate::stats::AccessCounters;

const NA: f64 = 1e-9;
const PJ: f64 = 1e-12;
const FJ: f64 = 1e-15;

/// Area added per port beyond the first, as a fraction of the array area.
const EXTRA_PORT_AREA: f64 = 0.25;

/// Area added per bank beyond the first, as a fraction of the array area.
const EXTRA_BANK_AREA: f64 = 0.05;

/// Builds [`ReferenceModel`]s from a coefficient table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceModelFactory {
    coefficients: ReferenceModelConfig,
}

impl ReferenceModelFactory {
    /// Creates a factory using `coefficients`.
    pub const fn new(coefficients: ReferenceModelConfig) -> Self {
        Self { coefficients }
    }

    /// The coefficient table in use.
    pub const fn coefficients(&self) -> &ReferenceModelConfig {
        &self.coefficients
    }
}

impl PowerModelFactory for ReferenceModelFactory {
    fn build(&self, params: &CacheModelParams) -> Result<Box<dyn CacheEnergyModel>, PowerError> {
        let model = ReferenceModel::new(&self.coefficients, params)?;
        debug!(
            vdd = params.vdd.volts(),
            clock_mhz = params.clock_mhz,
            area_um2 = model.area.0,
            "reference cache model built"
        );
        Ok(Box::new(model))
    }
}

/// One reference-oracle instance.
///
/// Leakage and area are fixed at construction; evaluation only prices activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModel {
    area: SquareMicrons,
    subthreshold: Watts,
    longer_channel: Watts,
    gate: Watts,
    data_op: Joules,
    tag_op: Joules,
    port_op: Joules,
    miss_op: Joules,
}

impl ReferenceModel {
    /// Evaluates the coefficient table for `params`.
    ///
    /// # Errors
    ///
    /// [`PowerError::InvalidParameters`] for a non-positive or non-finite
    /// voltage or clock, a zero technology node or temperature, or a geometry
    /// with no sets.
    pub fn new(c: &ReferenceModelConfig, params: &CacheModelParams) -> Result<Self, PowerError> {
        let g = &params.geometry;
        let vdd = params.vdd.volts();

        if !vdd.is_finite() || vdd <= 0.0 {
            return Err(PowerError::InvalidParameters(format!("vdd {vdd} V")));
        }
        if !params.clock_mhz.is_finite() || params.clock_mhz <= 0.0 {
            return Err(PowerError::InvalidParameters(format!(
                "clock rate {} MHz",
                params.clock_mhz
            )));
        }
        if g.technology_node_nm == 0 || g.temperature_k == 0 {
            return Err(PowerError::InvalidParameters(
                "technology node and temperature must be non-zero".into(),
            ));
        }
        if g.num_sets() == 0 {
            return Err(PowerError::InvalidParameters(format!(
                "{} bytes cannot hold one set of {} x {} bytes",
                g.size_bytes, g.associativity, g.line_bytes
            )));
        }

        let bits = g.data_bits() as f64 + params.tag_array_bits() as f64 + params.buffer_bits() as f64;
        let node = f64::from(g.technology_node_nm);
        let feature_um = node / 1000.0;

        let port_factor = 1.0 + EXTRA_PORT_AREA * f64::from(params.total_ports().saturating_sub(1));
        let bank_factor = 1.0 + EXTRA_BANK_AREA * f64::from(g.banks.saturating_sub(1));
        let area = bits * c.cell_area_f2 * feature_um * feature_um * c.array_overhead * port_factor * bank_factor;

        let node_scale = c.reference_node_nm / node;
        let energy_scale = node / c.reference_node_nm;
        let temperature_scale =
            ((f64::from(g.temperature_k) - c.reference_temperature_k) / c.leakage_doubling_k).exp2();
        let device_factor = match g.device_type {
            DeviceType::HighPerformance => 1.0,
            DeviceType::LowStandbyPower => c.low_standby_factor,
        };

        let subthreshold =
            bits * c.subthreshold_na_per_bit * NA * vdd * node_scale * temperature_scale * device_factor;
        let gate = bits * c.gate_na_per_bit * NA * vdd * node_scale * device_factor;

        let switching = vdd * vdd * energy_scale;
        let line_bits = g.line_bytes as f64 * 8.0;
        let tag_bits = f64::from(g.associativity) * f64::from(g.tag_bits(params.physical_address_bits));

        Ok(Self {
            area: SquareMicrons(area),
            subthreshold: Watts(subthreshold),
            longer_channel: Watts(subthreshold * c.long_channel_factor),
            gate: Watts(gate),
            data_op: Joules(line_bits * c.data_fj_per_bit * FJ * switching),
            tag_op: Joules(tag_bits * c.tag_fj_per_bit * FJ * switching),
            port_op: Joules(c.port_pj_per_access * PJ * switching),
            miss_op: Joules(c.miss_pj * PJ * switching),
        })
    }
}

impl CacheEnergyModel for ReferenceModel {
    fn compute(&self, activity: &AccessCounters) -> Result<ModelOutput, PowerError> {
        let data_ops = activity.data_array_reads as f64 + activity.data_array_writes as f64;
        let tag_ops = activity.tag_array_reads as f64 + activity.tag_array_writes as f64;
        let dynamic = data_ops * self.data_op.0
            + tag_ops * self.tag_op.0
            + activity.accesses() as f64 * self.port_op.0
            + activity.misses() as f64 * self.miss_op.0;

        if !dynamic.is_finite() {
            return Err(PowerError::Computation(format!(
                "dynamic energy overflowed for {activity:?}"
            )));
        }

        Ok(ModelOutput {
            area: self.area,
            subthreshold_leakage: self.subthreshold,
            longer_channel_leakage: self.longer_channel,
            gate_leakage: self.gate,
            dynamic_energy: Joules(dynamic),
        })
    }
}
