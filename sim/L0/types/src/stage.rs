//! Realization stages.
//!
//! A simulation state is filled in stage by stage: first the topology is
//! fixed, then parameters, then time, positions, velocities, forces and
//! finally accelerations. Anything computed from the state may only use
//! data that belongs to the stage the state has reached or an earlier one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered readiness level of a simulation state.
///
/// The derive order of the variants is the realization order, so the usual
/// comparison operators answer "has this state reached stage X yet".
///
/// ```
/// use sim_types::Stage;
///
/// assert!(Stage::Velocity > Stage::Position);
/// assert_eq!(Stage::Position.next(), Some(Stage::Velocity));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stage {
    /// Structure allocated: bodies, surfaces, cache slots.
    Topology,
    /// Modeling choices fixed.
    Model,
    /// Instance parameters (masses, materials) fixed.
    Instance,
    /// Time known.
    Time,
    /// Body positions known.
    Position,
    /// Body velocities known.
    Velocity,
    /// Forces known.
    Dynamics,
    /// Accelerations and state derivatives known.
    Acceleration,
    /// Reporting quantities available.
    Report,
}

impl Stage {
    /// Number of stages.
    pub const COUNT: usize = 9;

    /// Every stage in realization order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Topology,
        Self::Model,
        Self::Instance,
        Self::Time,
        Self::Position,
        Self::Velocity,
        Self::Dynamics,
        Self::Acceleration,
        Self::Report,
    ];

    /// Position of this stage in [`Stage::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The stage realized after this one.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The stage realized before this one.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Human readable stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Topology => "Topology",
            Self::Model => "Model",
            Self::Instance => "Instance",
            Self::Time => "Time",
            Self::Position => "Position",
            Self::Velocity => "Velocity",
            Self::Dynamics => "Dynamics",
            Self::Acceleration => "Acceleration",
            Self::Report => "Report",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
