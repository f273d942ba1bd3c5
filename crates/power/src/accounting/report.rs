//! Point-in-time view of the accounted totals and its text rendering.

use std::fmt;
use std::io;

use serde::Serialize;

use crate::common::{Joules, SimTime, SquareMillimeters, Watts};
use crate::dvfs::OperatingPoint;

/// Totals as of one query time.
///
/// Produced by [`EnergyAccountant::snapshot`](super::EnergyAccountant::snapshot);
/// holding one never affects the accountant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnergySnapshot {
    /// Query time.
    pub time: SimTime,
    /// Operating point in effect at `time`.
    pub operating_point: OperatingPoint,
    /// Cache area.
    pub area: SquareMillimeters,
    /// Leakage power at the current operating point.
    pub leakage_power: Watts,
    /// Total leakage energy up to `time`, including the open interval.
    pub leakage_energy: Joules,
    /// Total dynamic energy of all sampled intervals.
    pub dynamic_energy: Joules,
    /// Dynamic energy of the most recently sampled interval.
    pub last_dynamic_energy: Joules,
    /// Leakage energy divided by time since creation.
    pub average_static_power: Watts,
    /// Dynamic energy divided by time since creation.
    pub average_dynamic_power: Watts,
}

impl EnergySnapshot {
    /// Writes the labelled summary block, one `label: value` line per metric.
    ///
    /// The field set and units (mm^2, W, J) are fixed so that reports stay
    /// comparable across runs.
    ///
    /// # Errors
    ///
    /// Any error from `out`.
    pub fn write_summary<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for EnergySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "    ";
        writeln!(f, "{indent}Area (in mm^2): {}", self.area.val())?;
        writeln!(
            f,
            "{indent}Average Static Power (in W): {}",
            self.average_static_power.val()
        )?;
        writeln!(
            f,
            "{indent}Average Dynamic Power (in W): {}",
            self.average_dynamic_power.val()
        )?;
        writeln!(f, "{indent}Total Leakage Energy (in J): {}", self.leakage_energy.val())?;
        writeln!(f, "{indent}Total Dynamic Energy (in J): {}", self.dynamic_energy.val())
    }
}
