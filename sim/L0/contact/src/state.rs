//! Per-state storage for the contact subsystem.

use sim_types::Stage;

use crate::{ContactForce, StagedCache};

/// Everything the contact subsystem stores in one simulation state.
///
/// Created by [`crate::CompliantContactSubsystem::realize_topology`] and
/// owned by the caller. Holds:
///
/// - the stage the state has been realized to,
/// - one version token per stage, bumped by [`ContactState::invalidate`],
/// - the subsystem configuration version its caches were computed under,
/// - the force cache (computable from `Velocity`),
/// - the potential energy cache (computable from `Position`),
/// - the dissipated energy integration slot and its derivative.
///
/// Each cache cell is keyed on the version of its own minimum stage, so a
/// change of velocities leaves the potential energy cache alone while a
/// change of positions invalidates both.
#[derive(Debug, Clone)]
pub struct ContactState {
    topology: u64,
    configuration: u64,
    stage: Stage,
    versions: [u64; Stage::COUNT],
    pub(crate) forces: StagedCache<Vec<ContactForce>>,
    pub(crate) potential_energy: StagedCache<f64>,
    pub(crate) dissipation_rate: StagedCache<f64>,
    dissipated_energy: f64,
}

impl ContactState {
    pub(crate) fn new(topology: u64, configuration: u64) -> Self {
        Self {
            topology,
            configuration,
            stage: Stage::Topology,
            versions: [0; Stage::COUNT],
            forces: StagedCache::new("contact force cache", Stage::Velocity),
            potential_energy: StagedCache::new("contact potential energy", Stage::Position),
            dissipation_rate: StagedCache::new("dissipated energy rate", Stage::Dynamics),
            dissipated_energy: 0.0,
        }
    }

    /// Topology version this state's slots were allocated under.
    #[must_use]
    pub fn topology(&self) -> u64 {
        self.topology
    }

    /// Subsystem configuration version the caches belong to.
    #[must_use]
    pub fn configuration(&self) -> u64 {
        self.configuration
    }

    /// Adopt the subsystem's configuration version.
    ///
    /// On a change every cache from `Position` on goes stale. The realized
    /// stage and the dissipated energy are kept: configuration only feeds
    /// the lazily computed caches.
    pub(crate) fn sync_configuration(&mut self, configuration: u64) -> bool {
        if self.configuration == configuration {
            return false;
        }
        self.configuration = configuration;
        for later in &Stage::ALL[Stage::Position.index()..] {
            self.versions[later.index()] += 1;
        }
        true
    }

    /// Highest stage realized so far.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current version token of `stage`.
    #[must_use]
    pub fn version(&self, stage: Stage) -> u64 {
        self.versions[stage.index()]
    }

    /// Record that the state has been realized through `stage`.
    ///
    /// Never lowers the stage; use [`ContactState::invalidate`] for that.
    pub fn advance_to(&mut self, stage: Stage) {
        self.stage = self.stage.max(stage);
    }

    /// Upstream data belonging to `stage` changed.
    ///
    /// Drops the realized stage to just below `stage` and bumps the version
    /// of `stage` and of every later stage, which makes any cache computed
    /// from them stale. Call with `Position` after moving bodies or
    /// replacing the tracker's contacts, with `Velocity` after changing
    /// velocities only.
    pub fn invalidate(&mut self, stage: Stage) {
        for later in &Stage::ALL[stage.index()..] {
            self.versions[later.index()] += 1;
        }
        if self.stage >= stage {
            self.stage = stage.prev().unwrap_or(Stage::Topology);
        }
    }

    /// Current value of the dissipated energy state variable (J).
    #[must_use]
    pub fn dissipated_energy(&self) -> f64 {
        self.dissipated_energy
    }

    pub(crate) fn set_dissipated_energy(&mut self, energy: f64) {
        self.dissipated_energy = energy;
    }

    /// Time derivative of the dissipated energy, once published by
    /// acceleration-stage realization.
    #[must_use]
    pub fn dissipated_energy_rate(&self) -> Option<f64> {
        self.dissipation_rate
            .get(self.version(self.dissipation_rate.min_stage()))
            .copied()
    }

    /// The cached contact forces, if the force cache is current.
    #[must_use]
    pub fn cached_forces(&self) -> Option<&[ContactForce]> {
        self.forces
            .get(self.version(self.forces.min_stage()))
            .map(Vec::as_slice)
    }

    /// The cached potential energy, if current.
    #[must_use]
    pub fn cached_potential_energy(&self) -> Option<f64> {
        self.potential_energy
            .get(self.version(self.potential_energy.min_stage()))
            .copied()
    }
}
