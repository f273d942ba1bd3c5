//! Power-model oracle seam.
//!
//! The numeric power model is an external collaborator. This module defines
//! the contract the accountant relies on. It provides:
//! 1. **Parameters:** `CacheModelParams`, the full input describing one cache at one operating point.
//! 2. **Models:** `CacheEnergyModel`, a pure function from interval activity to area, leakage and energy.
//! 3. **Factories:** `PowerModelFactory`, which builds one model per operating point.
//! 4. **Reference Oracle:** A deterministic coefficient-table model for driving runs without an external engine.

/// Oracle input parameters.
pub mod params;

/// Built-in coefficient-table oracle.
pub mod reference;

pub use params::CacheModelParams;
pub use reference::{ReferenceModel, ReferenceModelFactory};

use crate::common::{Joules, PowerError, SquareMicrons, Watts};
use crate::stats::AccessCounters;

/// Figures produced by one model evaluation, in the oracle's native units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModelOutput {
    /// Total cache area.
    pub area: SquareMicrons,
    /// Subthreshold leakage with standard devices.
    pub subthreshold_leakage: Watts,
    /// Subthreshold leakage with longer-channel devices.
    pub longer_channel_leakage: Watts,
    /// Gate leakage.
    pub gate_leakage: Watts,
    /// Dynamic energy of the evaluated activity.
    pub dynamic_energy: Joules,
}

impl ModelOutput {
    /// Total leakage power: the selected subthreshold figure plus gate leakage.
    ///
    /// # Arguments
    ///
    /// * `long_channel` - Static geometry flag selecting the longer-channel subthreshold figure.
    pub fn leakage_power(&self, long_channel: bool) -> Watts {
        let subthreshold = if long_channel {
            self.longer_channel_leakage
        } else {
            self.subthreshold_leakage
        };
        subthreshold + self.gate_leakage
    }
}

/// A power model parameterised for one cache at one operating point.
///
/// Evaluation must be deterministic: identical activity yields identical output.
pub trait CacheEnergyModel: Send + Sync {
    /// Evaluates the model for the activity of one interval.
    ///
    /// # Arguments
    ///
    /// * `activity` - Accesses and array events that happened during the interval.
    ///
    /// # Errors
    ///
    /// [`PowerError`] if the model cannot produce figures.
    fn compute(&self, activity: &AccessCounters) -> Result<ModelOutput, PowerError>;
}

/// Builds parameterised power models.
pub trait PowerModelFactory {
    /// Builds a model for `params`.
    ///
    /// # Errors
    ///
    /// [`PowerError::InvalidParameters`] if the parameters do not describe a buildable cache.
    fn build(&self, params: &CacheModelParams) -> Result<Box<dyn CacheEnergyModel>, PowerError>;
}
