//! DVFS operating points and the registry they are enumerated from.
//!
//! The registry is read once at startup and never changes during a run. An
//! operating point is identified by its voltage: no two supported levels share
//! a voltage, so the voltage alone selects a power model.

use std::fmt;

use serde::Serialize;
use tracing::{debug, error};

use crate::common::{EnergyError, Frequency, Voltage};
use crate::config::Config;

/// A `(voltage, frequency)` pair the cache may run at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OperatingPoint {
    /// Supply voltage.
    pub voltage: Voltage,
    /// Maximum clock frequency at `voltage`.
    pub frequency: Frequency,
}

impl OperatingPoint {
    /// Creates an operating point.
    pub const fn new(voltage: Voltage, frequency: Frequency) -> Self {
        Self { voltage, frequency }
    }

    /// Creates an operating point from registry units (volts, GHz).
    pub fn from_registry(volts: f64, ghz: f64) -> Self {
        Self::new(Voltage::new(volts), Frequency::from_ghz(ghz))
    }

    /// The identity of this point.
    pub fn key(&self) -> VoltageKey {
        VoltageKey::from(self.voltage)
    }
}

impl fmt::Display for OperatingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.voltage, self.frequency)
    }
}

/// Totally ordered map key for a voltage.
///
/// Built from the IEEE-754 bit pattern, with `-0.0` folded onto `0.0`, so two
/// voltages compare equal exactly when their values do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoltageKey(u64);

impl From<Voltage> for VoltageKey {
    fn from(voltage: Voltage) -> Self {
        let v = voltage.volts();
        Self(if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() })
    }
}

/// The ordered set of supported operating points.
#[derive(Clone, Debug, PartialEq)]
pub struct DvfsLevels {
    levels: Vec<OperatingPoint>,
}

impl DvfsLevels {
    /// Validates and stores a registry.
    ///
    /// Registry order is preserved. A level listed twice with the same
    /// frequency is kept once.
    ///
    /// # Arguments
    ///
    /// * `points` - Levels in registry order.
    ///
    /// # Errors
    ///
    /// [`EnergyError::InvalidConfig`] for an empty registry, a non-positive or
    /// non-finite voltage or frequency, or a voltage listed with two different
    /// frequencies.
    pub fn new(points: impl IntoIterator<Item = OperatingPoint>) -> Result<Self, EnergyError> {
        let mut levels: Vec<OperatingPoint> = Vec::new();
        for point in points {
            let volts = point.voltage.volts();
            let hz = point.frequency.hz();
            if !volts.is_finite() || volts <= 0.0 {
                return Err(EnergyError::invalid(
                    "dvfs/levels",
                    format!("voltage {volts} must be positive and finite"),
                ));
            }
            if !hz.is_finite() || hz <= 0.0 {
                return Err(EnergyError::invalid(
                    "dvfs/levels",
                    format!("frequency at {volts} V must be positive and finite"),
                ));
            }
            match levels.iter().find(|known| known.key() == point.key()) {
                Some(known) if known.frequency == point.frequency => {
                    debug!(%point, "duplicate DVFS level ignored");
                }
                Some(known) => {
                    return Err(EnergyError::invalid(
                        "dvfs/levels",
                        format!(
                            "voltage {} listed with two frequencies ({} and {})",
                            point.voltage, known.frequency, point.frequency
                        ),
                    ));
                }
                None => levels.push(point),
            }
        }
        if levels.is_empty() {
            return Err(EnergyError::invalid("dvfs/levels", "no operating points"));
        }
        Ok(Self { levels })
    }

    /// Builds the registry from the `dvfs` configuration section.
    ///
    /// # Errors
    ///
    /// [`EnergyError::MissingConfig`] if `dvfs/levels` is absent, otherwise as [`DvfsLevels::new`].
    pub fn from_config(config: &Config) -> Result<Self, EnergyError> {
        let Some(levels) = config.dvfs.levels.as_ref() else {
            error!("could not read [dvfs/levels] from the configuration");
            return Err(EnergyError::MissingConfig { key: "dvfs/levels" });
        };
        Self::new(
            levels
                .iter()
                .map(|level| OperatingPoint::from_registry(level.voltage, level.frequency_ghz)),
        )
    }

    /// The operating point the cache starts at, per `dvfs/initial_voltage`.
    ///
    /// Falls back to the first registered level when the key is absent.
    ///
    /// # Errors
    ///
    /// [`EnergyError::UnsupportedOperatingPoint`] if the configured voltage is not registered.
    pub fn initial(&self, config: &Config) -> Result<OperatingPoint, EnergyError> {
        match config.dvfs.initial_voltage {
            Some(volts) => {
                let voltage = Voltage::new(volts);
                self.find(voltage)
                    .ok_or(EnergyError::UnsupportedOperatingPoint { voltage })
            }
            None => self
                .levels
                .first()
                .copied()
                .ok_or_else(|| EnergyError::invalid("dvfs/levels", "no operating points")),
        }
    }

    /// Looks up the registered point for `voltage`.
    pub fn find(&self, voltage: Voltage) -> Option<OperatingPoint> {
        let key = VoltageKey::from(voltage);
        self.levels.iter().copied().find(|p| p.key() == key)
    }

    /// Iterates over the levels in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &OperatingPoint> {
        self.levels.iter()
    }

    /// Number of distinct levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`: an empty registry is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
