//! Trace replay.
//!
//! Drives an accountant from a recorded sequence of DVFS transitions,
//! counter samples and summary requests, the same entry points a live cache
//! simulation uses.

/// Trace event types and the replay loop.
pub mod replay;

pub use replay::{EnergyTrace, TraceEvent, replay};
