//! DVFS-aware energy accounting.
//!
//! This module turns power-model figures into energy totals. It provides:
//! 1. **Model Cache:** One power model per registered operating point, built eagerly.
//! 2. **Accountant:** Leakage integration across transitions and interval dynamic energy.
//! 3. **Snapshots:** Read-only totals as of an arbitrary query time, and their text summary.

/// Energy accountant for one cache.
pub mod accountant;

/// Per-voltage power models.
pub mod model_cache;

/// Snapshot and summary rendering.
pub mod report;

pub use accountant::{EnergyAccountant, EnergyState};
pub use model_cache::{ModelCache, ModelEntry};
pub use report::EnergySnapshot;
