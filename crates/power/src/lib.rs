//! DVFS-aware cache energy accounting.
//!
//! This crate integrates leakage and dynamic energy for one simulated cache
//! whose voltage and frequency change during a run:
//! 1. **Configuration:** Cache geometry, technology and DVFS levels loaded from JSON.
//! 2. **Power Models:** A seam for the external power oracle plus a reference coefficient model.
//! 3. **Accounting:** A per-voltage model cache and an accountant that splits the leakage integral at every transition.
//! 4. **Reporting:** Read-only snapshots and the labelled summary block.
//! 5. **Replay:** Driving an accountant from a recorded event trace.

/// Units, constants and errors.
pub mod common;
/// Configuration document (JSON).
pub mod config;
/// DVFS operating points and registry.
pub mod dvfs;
/// Validated cache geometry.
pub mod geometry;
/// Power-model oracle seam and the reference model.
pub mod power;
/// Model cache, accountant and snapshots.
pub mod accounting;
/// Trace replay.
pub mod sim;
/// Cache access counters.
pub mod stats;

/// Main accountant type; construct with `EnergyAccountant::new`.
pub use crate::accounting::EnergyAccountant;
/// Per-voltage model cache; build with `ModelCache::build`.
pub use crate::accounting::ModelCache;
/// Crate error type.
pub use crate::common::EnergyError;
/// Root configuration type; parse with `Config::from_json_str` or `Config::from_file`.
pub use crate::config::Config;
