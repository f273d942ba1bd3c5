//! Energy accountant for one cache.
//!
//! Leakage power is piecewise constant: it only changes when the model is
//! re-evaluated, which happens on an operating-point transition or an explicit
//! sample. Each re-evaluation first closes the open interval, adding
//! `leakage_power * elapsed` to the leakage total, so the total is always the
//! exact integral of leakage power since creation.
//!
//! Access counters arrive as cumulative snapshots. The accountant keeps the
//! snapshot taken when the open interval started and prices only the
//! difference, at the operating point that was active during the interval.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::model_cache::{ModelCache, ModelEntry};
use super::report::EnergySnapshot;
use crate::common::constants::FREQUENCY_MATCH_TOLERANCE_HZ;
use crate::common::{
    EnergyError, Frequency, Joules, SimDuration, SimTime, SquareMillimeters, Voltage, Watts,
};
use crate::dvfs::OperatingPoint;
use crate::stats::AccessCounters;

/// Running totals and the figures of the latest model evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyState {
    /// Cache area at the current operating point.
    pub area: SquareMillimeters,
    /// Leakage power at the current operating point.
    pub leakage_power: Watts,
    /// Leakage energy of all closed intervals.
    pub leakage_energy: Joules,
    /// Dynamic energy of all closed intervals.
    pub dynamic_energy: Joules,
    /// Dynamic energy of the most recently closed interval.
    pub last_dynamic_energy: Joules,
    /// Start of the open interval.
    pub interval_start: SimTime,
    /// When the accountant was created.
    pub created_at: SimTime,
    /// Cumulative counters at `interval_start`.
    pub baseline: AccessCounters,
}

/// Figures extracted from one model evaluation, in reporting units.
#[derive(Clone, Copy, Debug)]
struct Figures {
    area: SquareMillimeters,
    leakage_power: Watts,
    dynamic_energy: Joules,
}

/// Tracks leakage and dynamic energy of one cache across DVFS transitions.
#[derive(Debug)]
pub struct EnergyAccountant {
    models: Arc<ModelCache>,
    point: OperatingPoint,
    state: EnergyState,
}

impl EnergyAccountant {
    /// Creates an accountant at simulated time zero with zeroed counters.
    ///
    /// # Errors
    ///
    /// As [`EnergyAccountant::starting_at`].
    pub fn new(models: Arc<ModelCache>, initial: Voltage) -> Result<Self, EnergyError> {
        Self::starting_at(models, initial, SimTime::ZERO, AccessCounters::default())
    }

    /// Creates an accountant for a cache that comes into existence at `start`.
    ///
    /// The model for `initial` is evaluated once with no activity to seed area
    /// and leakage power; no time has elapsed yet.
    ///
    /// # Arguments
    ///
    /// * `models` - Shared per-voltage model cache.
    /// * `initial` - The cache's starting voltage.
    /// * `start` - Creation time; averages are taken over time since then.
    /// * `counters` - Cumulative counters at `start`.
    ///
    /// # Errors
    ///
    /// [`EnergyError::UnsupportedOperatingPoint`] if `initial` is not registered,
    /// [`EnergyError::Oracle`] if the seeding evaluation fails.
    pub fn starting_at(
        models: Arc<ModelCache>,
        initial: Voltage,
        start: SimTime,
        counters: AccessCounters,
    ) -> Result<Self, EnergyError> {
        let entry = models
            .get(initial)
            .ok_or(EnergyError::UnsupportedOperatingPoint { voltage: initial })?;
        let point = entry.point();
        let seed = recompute(entry, models.long_channel(), &AccessCounters::default())?;

        info!(
            %point,
            area_mm2 = seed.area.val(),
            leakage_w = seed.leakage_power.val(),
            "energy accountant initialized"
        );

        Ok(Self {
            point,
            state: EnergyState {
                area: seed.area,
                leakage_power: seed.leakage_power,
                leakage_energy: Joules::ZERO,
                dynamic_energy: Joules::ZERO,
                last_dynamic_energy: Joules::ZERO,
                interval_start: start,
                created_at: start,
                baseline: counters,
            },
            models,
        })
    }

    /// Handles a voltage/frequency transition at `now`.
    ///
    /// Closes the open interval at the old operating point (leakage integrated
    /// over the interval, accesses since the last sample priced by the old
    /// model), then switches to the model registered for `voltage` and
    /// refreshes area and leakage power from it.
    ///
    /// Nothing is modified unless every step succeeds.
    ///
    /// # Arguments
    ///
    /// * `voltage` - New supply voltage; must be a registered level.
    /// * `frequency` - New frequency; informational, the registered point is kept.
    /// * `now` - Transition time.
    /// * `counters` - Cumulative counters at `now`.
    ///
    /// # Errors
    ///
    /// [`EnergyError::NonMonotonicTime`], [`EnergyError::UnsupportedOperatingPoint`],
    /// [`EnergyError::CounterRegression`] or [`EnergyError::Oracle`].
    pub fn on_operating_point_change(
        &mut self,
        voltage: Voltage,
        frequency: Frequency,
        now: SimTime,
        counters: &AccessCounters,
    ) -> Result<(), EnergyError> {
        let elapsed = self.open_interval(now)?;
        let target = self
            .models
            .get(voltage)
            .ok_or(EnergyError::UnsupportedOperatingPoint { voltage })?;
        let activity = counters.since(&self.state.baseline)?;
        let long_channel = self.models.long_channel();

        let closing = recompute(self.current_entry()?, long_channel, &activity)?;
        let fresh = recompute(target, long_channel, &AccessCounters::default())?;

        let next = target.point();
        if (frequency.hz() - next.frequency.hz()).abs() > FREQUENCY_MATCH_TOLERANCE_HZ {
            warn!(
                requested = %frequency,
                registered = %next.frequency,
                %voltage,
                "frequency differs from the registered level; keeping the registered point"
            );
        }

        self.state.leakage_energy += self.state.leakage_power * elapsed;
        self.state.dynamic_energy += closing.dynamic_energy;
        self.state.last_dynamic_energy = closing.dynamic_energy;
        self.state.area = fresh.area;
        self.state.leakage_power = fresh.leakage_power;
        self.state.baseline = *counters;
        self.state.interval_start = now;

        debug!(
            from = %self.point,
            to = %next,
            at_ps = now.ps(),
            leakage_j = self.state.leakage_energy.val(),
            leakage_w = fresh.leakage_power.val(),
            "operating point changed"
        );
        self.point = next;
        Ok(())
    }

    /// Samples fresh counters at `now` without changing operating point.
    ///
    /// Closes the open interval at the current operating point and starts a
    /// new one at `now`.
    ///
    /// # Errors
    ///
    /// [`EnergyError::NonMonotonicTime`], [`EnergyError::CounterRegression`] or
    /// [`EnergyError::Oracle`].
    pub fn record_sample(
        &mut self,
        now: SimTime,
        counters: &AccessCounters,
    ) -> Result<(), EnergyError> {
        let elapsed = self.open_interval(now)?;
        let activity = counters.since(&self.state.baseline)?;
        let figures = recompute(self.current_entry()?, self.models.long_channel(), &activity)?;

        self.state.leakage_energy += self.state.leakage_power * elapsed;
        self.state.dynamic_energy += figures.dynamic_energy;
        self.state.last_dynamic_energy = figures.dynamic_energy;
        self.state.area = figures.area;
        self.state.leakage_power = figures.leakage_power;
        self.state.baseline = *counters;
        self.state.interval_start = now;

        if activity.is_idle() {
            debug!(at_ps = now.ps(), "idle interval sampled");
        } else {
            debug!(
                at_ps = now.ps(),
                accesses = activity.accesses(),
                miss_rate = activity.miss_rate(),
                dynamic_j = figures.dynamic_energy.val(),
                "counters sampled"
            );
        }
        Ok(())
    }

    /// Totals as of `now`, with the open interval's leakage included.
    ///
    /// Read-only: repeated calls return the same result and leave the
    /// accounted state untouched.
    ///
    /// # Errors
    ///
    /// [`EnergyError::NonMonotonicTime`] if `now` precedes the open interval.
    pub fn snapshot(&self, now: SimTime) -> Result<EnergySnapshot, EnergyError> {
        let open = self.open_interval(now)?;
        let leakage_energy = self.state.leakage_energy + self.state.leakage_power * open;
        let lifetime = now
            .checked_since(self.state.created_at)
            .unwrap_or(SimDuration::ZERO);

        Ok(EnergySnapshot {
            time: now,
            operating_point: self.point,
            area: self.state.area,
            leakage_power: self.state.leakage_power,
            average_static_power: leakage_energy.average_over(lifetime),
            average_dynamic_power: self.state.dynamic_energy.average_over(lifetime),
            leakage_energy,
            dynamic_energy: self.state.dynamic_energy,
            last_dynamic_energy: self.state.last_dynamic_energy,
        })
    }

    /// The current operating point.
    pub const fn operating_point(&self) -> OperatingPoint {
        self.point
    }

    /// Area at the current operating point.
    pub const fn area(&self) -> SquareMillimeters {
        self.state.area
    }

    /// Leakage power at the current operating point.
    pub const fn leakage_power(&self) -> Watts {
        self.state.leakage_power
    }

    /// Leakage energy of closed intervals only; see [`EnergyAccountant::snapshot`] for the running total.
    pub const fn leakage_energy(&self) -> Joules {
        self.state.leakage_energy
    }

    /// Dynamic energy of closed intervals.
    pub const fn dynamic_energy(&self) -> Joules {
        self.state.dynamic_energy
    }

    /// Dynamic energy of the most recently closed interval.
    pub const fn last_dynamic_energy(&self) -> Joules {
        self.state.last_dynamic_energy
    }

    /// Start of the open interval.
    pub const fn interval_start(&self) -> SimTime {
        self.state.interval_start
    }

    /// Creation time.
    pub const fn created_at(&self) -> SimTime {
        self.state.created_at
    }

    /// Cumulative counters at the start of the open interval.
    pub const fn baseline(&self) -> AccessCounters {
        self.state.baseline
    }

    /// The full accumulated state.
    pub const fn state(&self) -> &EnergyState {
        &self.state
    }

    /// The shared model cache.
    pub fn models(&self) -> &Arc<ModelCache> {
        &self.models
    }

    fn open_interval(&self, now: SimTime) -> Result<SimDuration, EnergyError> {
        now.checked_since(self.state.interval_start)
            .ok_or(EnergyError::NonMonotonicTime {
                last: self.state.interval_start,
                now,
            })
    }

    fn current_entry(&self) -> Result<&ModelEntry, EnergyError> {
        self.models
            .get(self.point.voltage)
            .ok_or(EnergyError::UnsupportedOperatingPoint {
                voltage: self.point.voltage,
            })
    }
}

/// Evaluates `entry` for `activity` and converts to reporting units.
///
/// Leakage energy is not touched here; only time integration advances it.
fn recompute(
    entry: &ModelEntry,
    long_channel: bool,
    activity: &AccessCounters,
) -> Result<Figures, EnergyError> {
    let output = entry.compute(activity)?;
    Ok(Figures {
        area: output.area.to_mm2(),
        leakage_power: output.leakage_power(long_channel),
        dynamic_energy: output.dynamic_energy,
    })
}
