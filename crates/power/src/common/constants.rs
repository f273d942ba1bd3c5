//! Unit conversion factors and fixed oracle parameters.
//!
//! This module defines the constants shared by the accounting and power-model layers. It includes:
//! 1. **Time:** Picosecond scale factors for `SimTime`.
//! 2. **Frequency:** Hz/MHz/GHz conversion factors.
//! 3. **Area:** The um^2 to mm^2 factor applied to oracle output.
//! 4. **Oracle System Parameters:** Values the cache model fixes for every instance.

/// Picoseconds per nanosecond.
pub const PS_PER_NS: u64 = 1_000;

/// Picoseconds per second.
pub const PS_PER_SEC: u64 = 1_000_000_000_000;

/// Hertz per megahertz.
pub const HZ_PER_MHZ: f64 = 1e6;

/// Hertz per gigahertz.
pub const HZ_PER_GHZ: f64 = 1e9;

/// Square micrometres per square millimetre.
pub const UM2_PER_MM2: f64 = 1e6;

/// Machine word width presented to the oracle, in bits.
pub const MACHINE_BITS: u32 = 64;

/// Physical address width presented to the oracle, in bits.
///
/// Determines tag width together with the cache geometry.
pub const PHYSICAL_ADDRESS_BITS: u32 = 52;

/// Tolerance used when comparing a requested frequency with the registered one.
pub const FREQUENCY_MATCH_TOLERANCE_HZ: f64 = 1.0;
