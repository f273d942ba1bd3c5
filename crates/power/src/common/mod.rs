//! Common types used throughout the energy accounting crate.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Units:** Strong types for voltage, frequency, time, power, energy and area.
//! 2. **Constants:** Conversion factors and fixed oracle parameters.
//! 3. **Error Handling:** The `EnergyError` taxonomy and oracle `PowerError`.

/// Unit conversion factors and fixed oracle parameters.
pub mod constants;

/// Error types and their classification.
pub mod error;

/// Unit-carrying quantities.
pub mod units;

pub use error::{EnergyError, ErrorKind, PowerError};
pub use units::{
    Frequency, Joules, SimDuration, SimTime, SquareMicrons, SquareMillimeters, Voltage, Watts,
};
