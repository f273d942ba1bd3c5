//! Unit-carrying quantities used at the power-model boundary.
//!
//! Every number that crosses between the simulator, the accountant and the
//! power oracle is wrapped in one of these types. It provides the following:
//! 1. **Electrical:** `Voltage`, `Frequency` (stored in Hz, converted to MHz for the oracle).
//! 2. **Time:** `SimTime` and `SimDuration` in integer picoseconds of simulated time.
//! 3. **Power and Energy:** `Watts`, `Joules`, and `Watts * SimDuration = Joules`.
//! 4. **Area:** `SquareMicrons` (oracle native) and `SquareMillimeters` (reported).

use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

use super::constants::{HZ_PER_GHZ, HZ_PER_MHZ, PS_PER_NS, PS_PER_SEC, UM2_PER_MM2};

/// Supply voltage in volts.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Voltage(pub f64);

impl Voltage {
    /// Creates a voltage from a value in volts.
    #[inline]
    pub const fn new(volts: f64) -> Self {
        Self(volts)
    }

    /// Returns the raw value in volts.
    #[inline]
    pub const fn volts(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} V", self.0)
    }
}

/// Clock frequency, stored in hertz.
///
/// The DVFS registry speaks GHz and the power oracle expects MHz; keeping the
/// canonical value in Hz means both conversions are explicit at the call site.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(pub f64);

impl Frequency {
    /// Creates a frequency from a value in hertz.
    #[inline]
    pub const fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from a value in megahertz.
    #[inline]
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * HZ_PER_MHZ)
    }

    /// Creates a frequency from a value in gigahertz.
    ///
    /// # Arguments
    ///
    /// * `ghz` - Frequency in GHz, as published by the DVFS registry.
    ///
    /// # Returns
    ///
    /// The equivalent `Frequency`.
    #[inline]
    pub fn from_ghz(ghz: f64) -> Self {
        Self(ghz * HZ_PER_GHZ)
    }

    /// Returns the frequency in hertz.
    #[inline]
    pub const fn hz(self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz (the oracle's clock-rate unit).
    #[inline]
    pub fn mhz(self) -> f64 {
        self.0 / HZ_PER_MHZ
    }

    /// Returns the frequency in gigahertz.
    #[inline]
    pub fn ghz(self) -> f64 {
        self.0 / HZ_PER_GHZ
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} GHz", self.ghz())
    }
}

/// A point in simulated time, in picoseconds since the start of the simulation.
///
/// Integer picoseconds keep the time axis exact; conversion to seconds only
/// happens when a duration is multiplied by a power.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    /// The start of simulated time.
    pub const ZERO: Self = Self(0);

    /// Creates a time from picoseconds.
    #[inline]
    pub const fn from_ps(ps: u64) -> Self {
        Self(ps)
    }

    /// Creates a time from nanoseconds, saturating at the end of the time axis.
    ///
    /// Use [`SimTime::try_from_ns`] for untrusted input.
    #[inline]
    pub const fn from_ns(ns: u64) -> Self {
        Self(ns.saturating_mul(PS_PER_NS))
    }

    /// Creates a time from nanoseconds.
    ///
    /// # Returns
    ///
    /// `None` if the time is not representable in picoseconds.
    #[inline]
    pub const fn try_from_ns(ns: u64) -> Option<Self> {
        match ns.checked_mul(PS_PER_NS) {
            Some(ps) => Some(Self(ps)),
            None => None,
        }
    }

    /// Creates a time from whole seconds, saturating at the end of the time axis.
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(PS_PER_SEC))
    }

    /// Creates a time from whole seconds.
    ///
    /// # Returns
    ///
    /// `None` if the time is not representable in picoseconds.
    #[inline]
    pub const fn try_from_secs(secs: u64) -> Option<Self> {
        match secs.checked_mul(PS_PER_SEC) {
            Some(ps) => Some(Self(ps)),
            None => None,
        }
    }

    /// Returns the raw picosecond value.
    #[inline]
    pub const fn ps(self) -> u64 {
        self.0
    }

    /// Returns this time in seconds.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / PS_PER_SEC as f64
    }

    /// Returns the duration from `earlier` to `self`.
    ///
    /// # Arguments
    ///
    /// * `earlier` - The start of the interval.
    ///
    /// # Returns
    ///
    /// `None` if `earlier` lies after `self` (time went backwards).
    #[inline]
    pub const fn checked_since(self, earlier: Self) -> Option<SimDuration> {
        match self.0.checked_sub(earlier.0) {
            Some(ps) => Some(SimDuration(ps)),
            None => None,
        }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ps", self.0)
    }
}

/// A span of simulated time, in picoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimDuration(pub u64);

impl SimDuration {
    /// An empty interval.
    pub const ZERO: Self = Self(0);

    /// Returns the raw picosecond value.
    #[inline]
    pub const fn ps(self) -> u64 {
        self.0
    }

    /// Returns the duration in seconds.
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / PS_PER_SEC as f64
    }

    /// Returns `true` for a zero-length interval.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Power in watts.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

impl Watts {
    /// Zero power.
    pub const ZERO: Self = Self(0.0);

    /// Returns the raw value in watts.
    #[inline]
    pub const fn val(self) -> f64 {
        self.0
    }
}

impl Add for Watts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<SimDuration> for Watts {
    type Output = Joules;

    /// Integrates a constant power over an interval.
    fn mul(self, rhs: SimDuration) -> Joules {
        Joules(self.0 * rhs.as_secs_f64())
    }
}

/// Energy in joules.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Joules(pub f64);

impl Joules {
    /// Zero energy.
    pub const ZERO: Self = Self(0.0);

    /// Returns the raw value in joules.
    #[inline]
    pub const fn val(self) -> f64 {
        self.0
    }

    /// Average power if this energy was spent over `span`.
    ///
    /// A zero-length span reports zero power rather than dividing by zero.
    pub fn average_over(self, span: SimDuration) -> Watts {
        if span.is_zero() {
            Watts::ZERO
        } else {
            Watts(self.0 / span.as_secs_f64())
        }
    }
}

impl Add for Joules {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Joules {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Area in square micrometres, the power oracle's native unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMicrons(pub f64);

impl SquareMicrons {
    /// Converts to square millimetres (x 1e-6).
    #[inline]
    pub fn to_mm2(self) -> SquareMillimeters {
        SquareMillimeters(self.0 / UM2_PER_MM2)
    }
}

/// Area in square millimetres, the reporting unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

impl SquareMillimeters {
    /// Returns the raw value in mm^2.
    #[inline]
    pub const fn val(self) -> f64 {
        self.0
    }
}
