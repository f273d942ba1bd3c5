//! Input parameters for the power oracle.

use crate::common::Voltage;
use crate::common::constants::{MACHINE_BITS, PHYSICAL_ADDRESS_BITS};
use crate::dvfs::OperatingPoint;
use crate::geometry::CacheGeometry;

/// Everything the oracle needs to build a model of one cache at one operating point.
///
/// Only `vdd` and `clock_mhz` differ between the instances of one cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheModelParams {
    /// Static geometry and technology.
    pub geometry: CacheGeometry,
    /// Supply voltage.
    pub vdd: Voltage,
    /// Clock rate in MHz.
    pub clock_mhz: f64,
    /// Machine word width in bits.
    pub machine_bits: u32,
    /// Physical address width in bits.
    pub physical_address_bits: u32,
}

impl CacheModelParams {
    /// Parameterises `geometry` for `point`.
    ///
    /// # Arguments
    ///
    /// * `geometry` - The cache's static geometry.
    /// * `point` - Operating point; its frequency is converted to MHz here.
    pub fn new(geometry: &CacheGeometry, point: OperatingPoint) -> Self {
        Self {
            geometry: geometry.clone(),
            vdd: point.voltage,
            clock_mhz: point.frequency.mhz(),
            machine_bits: MACHINE_BITS,
            physical_address_bits: PHYSICAL_ADDRESS_BITS,
        }
    }

    /// Total tag storage in bits.
    pub fn tag_array_bits(&self) -> u64 {
        let g = &self.geometry;
        g.num_sets()
            .saturating_mul(u64::from(g.associativity))
            .saturating_mul(u64::from(g.tag_bits(self.physical_address_bits)))
    }

    /// Total buffer storage in bits.
    pub fn buffer_bits(&self) -> u64 {
        let b = &self.geometry.buffers;
        let entries = u64::from(b.miss) + u64::from(b.fill) + u64::from(b.prefetch) + u64::from(b.writeback);
        entries.saturating_mul(self.geometry.line_bytes).saturating_mul(8)
    }

    /// Ports per bank, of all kinds.
    pub const fn total_ports(&self) -> u32 {
        let p = &self.geometry.ports;
        p.read + p.write + p.read_write
    }
}
