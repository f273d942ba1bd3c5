//! Per-voltage power models, built once before simulation starts.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::common::{EnergyError, Voltage};
use crate::dvfs::{DvfsLevels, OperatingPoint, VoltageKey};
use crate::geometry::CacheGeometry;
use crate::power::{CacheEnergyModel, CacheModelParams, ModelOutput, PowerModelFactory};
use crate::stats::AccessCounters;

/// One operating point together with the model parameterised for it.
pub struct ModelEntry {
    point: OperatingPoint,
    params: CacheModelParams,
    model: Box<dyn CacheEnergyModel>,
}

impl ModelEntry {
    /// The registered operating point.
    pub const fn point(&self) -> OperatingPoint {
        self.point
    }

    /// The parameters the model was built from.
    pub const fn params(&self) -> &CacheModelParams {
        &self.params
    }

    /// Evaluates the model for one interval's activity.
    ///
    /// # Errors
    ///
    /// [`EnergyError::Oracle`] if the model fails.
    pub fn compute(&self, activity: &AccessCounters) -> Result<ModelOutput, EnergyError> {
        Ok(self.model.compute(activity)?)
    }
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("point", &self.point)
            .field("clock_mhz", &self.params.clock_mhz)
            .finish_non_exhaustive()
    }
}

/// Immutable map from supported voltage to its power model.
///
/// Every transition target exists before the first transition happens, so a
/// transition can never fail for want of a model. Shared read-only once built.
#[derive(Debug)]
pub struct ModelCache {
    geometry: CacheGeometry,
    models: BTreeMap<VoltageKey, ModelEntry>,
}

impl ModelCache {
    /// Builds one model per registered operating point.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Static cache geometry, shared by every model.
    /// * `levels` - The DVFS registry.
    /// * `factory` - The power oracle.
    ///
    /// # Errors
    ///
    /// [`EnergyError::Oracle`] if the oracle rejects any operating point. No
    /// partially built cache is returned.
    pub fn build<F>(
        geometry: &CacheGeometry,
        levels: &DvfsLevels,
        factory: &F,
    ) -> Result<Self, EnergyError>
    where
        F: PowerModelFactory + ?Sized,
    {
        let mut models = BTreeMap::new();
        for &point in levels.iter() {
            let params = CacheModelParams::new(geometry, point);
            let model = factory.build(&params)?;
            debug!(%point, clock_mhz = params.clock_mhz, "power model ready");
            let replaced = models.insert(
                point.key(),
                ModelEntry {
                    point,
                    params,
                    model,
                },
            );
            debug_assert!(replaced.is_none(), "registry levels are unique by voltage");
        }
        info!(
            levels = models.len(),
            size_bytes = geometry.size_bytes,
            long_channel = geometry.long_channel,
            "operating-point model cache built"
        );
        Ok(Self {
            geometry: geometry.clone(),
            models,
        })
    }

    /// The model for `voltage`, if it is a registered level.
    pub fn get(&self, voltage: Voltage) -> Option<&ModelEntry> {
        self.models.get(&VoltageKey::from(voltage))
    }

    /// Registered operating points, in ascending voltage order.
    pub fn points(&self) -> impl Iterator<Item = OperatingPoint> + '_ {
        self.models.values().map(ModelEntry::point)
    }

    /// The shared geometry.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Whether leakage is reported with the longer-channel subthreshold figure.
    pub const fn long_channel(&self) -> bool {
        self.geometry.long_channel
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// `true` only for a cache built from an empty registry, which `DvfsLevels` forbids.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
