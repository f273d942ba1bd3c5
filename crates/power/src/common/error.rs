//! Error taxonomy for energy accounting.
//!
//! Every failure in this crate is fatal to the caller; the types here only
//! make the cause precise. It provides:
//! 1. **`EnergyError`:** The single error type returned by configuration, registry and accountant operations.
//! 2. **`ErrorKind`:** Coarse classification (configuration, invariant violation, oracle failure).
//! 3. **`PowerError`:** Failures reported by a power-model oracle.

use thiserror::Error;

use super::units::{SimTime, Voltage};

/// Coarse classification of an [`EnergyError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid geometry/registry values. Aborts simulator startup.
    Configuration,
    /// The driving simulator broke a contract (time went backwards, unknown
    /// operating point, counters decreased). Indicates a bug, not a runtime condition.
    InvariantViolation,
    /// The power oracle could not produce figures from its inputs.
    OracleComputation,
}

/// Failure reported by a power-model oracle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PowerError {
    /// The model parameters cannot describe a real cache.
    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),

    /// The model accepted its parameters but failed to evaluate them.
    #[error("energy computation failed: {0}")]
    Computation(String),
}

/// Error type for all energy accounting operations.
#[derive(Debug, Error)]
pub enum EnergyError {
    /// A required configuration key is absent.
    #[error("missing configuration key [{key}]")]
    MissingConfig {
        /// Full key path, e.g. `general/technology_node`.
        key: &'static str,
    },

    /// A configuration key is present but its value is unusable.
    #[error("invalid configuration key [{key}]: {reason}")]
    InvalidConfig {
        /// Full key path.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// The configuration document could not be parsed.
    #[error("malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Simulated time moved backwards relative to the open interval.
    #[error("non-monotonic simulated time: interval started at {last}, got {now}")]
    NonMonotonicTime {
        /// Start of the currently open interval.
        last: SimTime,
        /// The offending timestamp.
        now: SimTime,
    },

    /// An event timestamp does not fit on the picosecond time axis.
    #[error("event time {time_ns} ns is beyond the representable simulated time")]
    TimeOutOfRange {
        /// The offending timestamp, in nanoseconds.
        time_ns: u64,
    },

    /// A transition targeted a voltage that is not in the DVFS registry.
    #[error("operating point {voltage} is not a registered DVFS level")]
    UnsupportedOperatingPoint {
        /// The requested voltage.
        voltage: Voltage,
    },

    /// A cumulative access counter decreased between two samples.
    #[error("access counter `{counter}` went backwards: {previous} -> {current}")]
    CounterRegression {
        /// Counter name.
        counter: &'static str,
        /// Value at the previous sample.
        previous: u64,
        /// Value at this sample.
        current: u64,
    },

    /// The power oracle failed.
    #[error("power model failure: {0}")]
    Oracle(#[from] PowerError),
}

impl EnergyError {
    /// Classifies this error.
    ///
    /// # Returns
    ///
    /// The [`ErrorKind`] the variant belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfig { .. }
            | Self::InvalidConfig { .. }
            | Self::ConfigParse(_)
            | Self::ConfigIo(_) => ErrorKind::Configuration,
            Self::NonMonotonicTime { .. }
            | Self::TimeOutOfRange { .. }
            | Self::UnsupportedOperatingPoint { .. }
            | Self::CounterRegression { .. } => ErrorKind::InvariantViolation,
            Self::Oracle(_) => ErrorKind::OracleComputation,
        }
    }

    /// Shorthand for an [`EnergyError::InvalidConfig`].
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key,
            reason: reason.into(),
        }
    }
}
