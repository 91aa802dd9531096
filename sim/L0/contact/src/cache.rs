//! Lazily evaluated, stage-gated cache cells.
//!
//! A [`StagedCache`] holds a value that can only be computed once the state
//! has reached some minimum [`Stage`]. It is filled on demand by
//! [`StagedCache::ensure_valid`] and stays valid for as long as the version
//! token it was computed under is current. Whoever owns the state bumps the
//! token when upstream data changes; the cell itself never decides it is
//! stale.

use sim_types::Stage;

use crate::{ContactError, Result};

/// A cache cell: minimum stage, payload, and the version it was realized at.
#[derive(Debug, Clone)]
pub struct StagedCache<T> {
    name: &'static str,
    min_stage: Stage,
    slot: Option<(u64, T)>,
}

impl<T> StagedCache<T> {
    /// An empty cell that can be computed from `min_stage` onward.
    #[must_use]
    pub const fn new(name: &'static str, min_stage: Stage) -> Self {
        Self {
            name,
            min_stage,
            slot: None,
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Earliest stage at which the value can be computed.
    #[must_use]
    pub fn min_stage(&self) -> Stage {
        self.min_stage
    }

    /// Whether the cell holds a value computed under `version`.
    #[must_use]
    pub fn is_valid(&self, version: u64) -> bool {
        matches!(self.slot, Some((v, _)) if v == version)
    }

    /// The cached value, if it is current for `version`.
    #[must_use]
    pub fn get(&self, version: u64) -> Option<&T> {
        match &self.slot {
            Some((v, value)) if *v == version => Some(value),
            _ => None,
        }
    }

    /// Drop the cached value.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Fail with a stage violation unless `current` is at least the minimum.
    pub fn check_stage(&self, current: Stage) -> Result<()> {
        if current < self.min_stage {
            return Err(ContactError::StageViolation {
                operation: self.name,
                required: self.min_stage,
                current,
            });
        }
        Ok(())
    }

    /// Make sure the cell holds a value for `version`, computing it if needed.
    ///
    /// If the cell is already valid this is a no-op and `compute` is not
    /// called. Otherwise `current` must be at least the cell's minimum stage
    /// (a stage violation is returned if not), `compute` runs, and its
    /// result is stored and marked valid. A failing `compute` leaves the
    /// cell empty.
    pub fn ensure_valid<F>(&mut self, current: Stage, version: u64, compute: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        let slot = match self.slot.take() {
            Some((v, value)) if v == version => (v, value),
            _ => {
                self.check_stage(current)?;
                (version, compute()?)
            }
        };
        Ok(&self.slot.insert(slot).1)
    }
}
