//! Cache access counters consumed by the power model.
//!
//! The cache simulation keeps cumulative counters; this module holds them and
//! turns two cumulative snapshots into the activity of the interval between them.
//! It provides:
//! 1. **Access counters:** Read/write accesses and misses, tag- and data-array reads and writes.
//! 2. **Derived figures:** Access and miss totals, miss rate.
//! 3. **Intervals:** Checked differences between snapshots.

use serde::{Deserialize, Serialize};

use crate::common::EnergyError;

/// Access counters for one cache.
///
/// Used both for cumulative snapshots (as supplied by the simulation) and for
/// per-interval activity (as handed to the power model).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessCounters {
    /// Read accesses.
    pub read_accesses: u64,
    /// Write accesses.
    pub write_accesses: u64,
    /// Read misses.
    pub read_misses: u64,
    /// Write misses.
    pub write_misses: u64,
    /// Tag-array reads.
    pub tag_array_reads: u64,
    /// Tag-array writes.
    pub tag_array_writes: u64,
    /// Data-array reads.
    pub data_array_reads: u64,
    /// Data-array writes.
    pub data_array_writes: u64,
}

impl AccessCounters {
    /// Total read and write accesses.
    pub const fn accesses(&self) -> u64 {
        self.read_accesses.saturating_add(self.write_accesses)
    }

    /// Total read and write misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses.saturating_add(self.write_misses)
    }

    /// Miss ratio over all accesses, or zero when there were none.
    pub fn miss_rate(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.misses() as f64 / accesses as f64
        }
    }

    /// Returns `true` if no event has been counted.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Activity between an earlier cumulative snapshot and this one.
    ///
    /// # Arguments
    ///
    /// * `earlier` - The snapshot the interval starts at.
    ///
    /// # Returns
    ///
    /// Field-wise `self - earlier`.
    ///
    /// # Errors
    ///
    /// [`EnergyError::CounterRegression`] naming the first counter that is
    /// smaller than in `earlier`.
    pub fn since(&self, earlier: &Self) -> Result<Self, EnergyError> {
        Ok(Self {
            read_accesses: delta("read_accesses", earlier.read_accesses, self.read_accesses)?,
            write_accesses: delta("write_accesses", earlier.write_accesses, self.write_accesses)?,
            read_misses: delta("read_misses", earlier.read_misses, self.read_misses)?,
            write_misses: delta("write_misses", earlier.write_misses, self.write_misses)?,
            tag_array_reads: delta("tag_array_reads", earlier.tag_array_reads, self.tag_array_reads)?,
            tag_array_writes: delta(
                "tag_array_writes",
                earlier.tag_array_writes,
                self.tag_array_writes,
            )?,
            data_array_reads: delta(
                "data_array_reads",
                earlier.data_array_reads,
                self.data_array_reads,
            )?,
            data_array_writes: delta(
                "data_array_writes",
                earlier.data_array_writes,
                self.data_array_writes,
            )?,
        })
    }
}

fn delta(counter: &'static str, previous: u64, current: u64) -> Result<u64, EnergyError> {
    match current.checked_sub(previous) {
        Some(d) => Ok(d),
        None => Err(EnergyError::CounterRegression {
            counter,
            previous,
            current,
        }),
    }
}
