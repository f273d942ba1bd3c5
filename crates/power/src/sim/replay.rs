//! Trace events and the replay loop.

use serde::Deserialize;
use tracing::trace;

use crate::accounting::{EnergyAccountant, EnergySnapshot};
use crate::common::{EnergyError, Frequency, SimTime, Voltage};
use crate::stats::AccessCounters;

/// One recorded event.
///
/// Counters are cumulative. When an event carries none, the counters of the
/// previous sample are reused, meaning no activity since then.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The cache switched operating point.
    Dvfs {
        /// Event time in nanoseconds.
        time_ns: u64,
        /// New voltage in volts.
        voltage: f64,
        /// New frequency in GHz.
        frequency_ghz: f64,
        /// Cumulative counters at the transition.
        #[serde(default)]
        counters: Option<AccessCounters>,
    },
    /// The cache simulation published fresh counters.
    Sample {
        /// Event time in nanoseconds.
        time_ns: u64,
        /// Cumulative counters.
        #[serde(default)]
        counters: Option<AccessCounters>,
    },
    /// A summary was requested.
    Summary {
        /// Event time in nanoseconds.
        time_ns: u64,
    },
}

impl TraceEvent {
    /// Event time in nanoseconds, as recorded.
    pub const fn time_ns(&self) -> u64 {
        match self {
            Self::Dvfs { time_ns, .. } | Self::Sample { time_ns, .. } | Self::Summary { time_ns } => {
                *time_ns
            }
        }
    }

    /// Event time.
    ///
    /// # Errors
    ///
    /// [`EnergyError::TimeOutOfRange`] if the recorded time overflows the picosecond axis.
    pub const fn time(&self) -> Result<SimTime, EnergyError> {
        let time_ns = self.time_ns();
        match SimTime::try_from_ns(time_ns) {
            Some(time) => Ok(time),
            None => Err(EnergyError::TimeOutOfRange { time_ns }),
        }
    }
}

/// A recorded event sequence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnergyTrace {
    /// Events in the order they are applied.
    pub events: Vec<TraceEvent>,
}

/// Applies `events` to `accountant` in order.
///
/// # Returns
///
/// One snapshot per `Summary` event, in trace order.
///
/// # Errors
///
/// The first error reported by the accountant; events after it are not applied.
pub fn replay(
    accountant: &mut EnergyAccountant,
    events: &[TraceEvent],
) -> Result<Vec<EnergySnapshot>, EnergyError> {
    let mut summaries = Vec::new();
    for event in events {
        trace!(?event, "replaying");
        let now = event.time()?;
        match event {
            TraceEvent::Dvfs {
                voltage,
                frequency_ghz,
                counters,
                ..
            } => {
                let counters = counters.unwrap_or_else(|| accountant.baseline());
                accountant.on_operating_point_change(
                    Voltage::new(*voltage),
                    Frequency::from_ghz(*frequency_ghz),
                    now,
                    &counters,
                )?;
            }
            TraceEvent::Sample { counters, .. } => {
                let counters = counters.unwrap_or_else(|| accountant.baseline());
                accountant.record_sample(now, &counters)?;
            }
            TraceEvent::Summary { .. } => summaries.push(accountant.snapshot(now)?),
        }
    }
    Ok(summaries)
}
