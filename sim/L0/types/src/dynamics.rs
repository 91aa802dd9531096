//! Force accumulation across force-producing subsystems.

use hashbrown::HashMap;

use crate::{BodyId, SpatialForce};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-body spatial forces, each referred to its body's origin.
///
/// Owned by the multibody system. Every force subsystem adds its
/// contribution during dynamics-stage realization; nothing overwrites an
/// entry, so the order in which subsystems contribute does not matter.
///
/// ```
/// use sim_types::{BodyForces, BodyId, SpatialForce};
/// use nalgebra::Vector3;
///
/// let mut forces = BodyForces::new();
/// forces.apply(BodyId::new(1), SpatialForce::from_force(Vector3::z()));
/// forces.apply(BodyId::new(1), SpatialForce::from_force(Vector3::z()));
/// assert_eq!(forces.get(BodyId::new(1)).force.z, 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyForces {
    forces: HashMap<BodyId, SpatialForce>,
}

impl BodyForces {
    /// An empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `force` to whatever `body` has accumulated so far.
    pub fn apply(&mut self, body: BodyId, force: SpatialForce) {
        *self.forces.entry(body).or_default() += force;
    }

    /// Accumulated force on `body` (zero if nothing was applied).
    #[must_use]
    pub fn get(&self, body: BodyId) -> SpatialForce {
        self.forces.get(&body).copied().unwrap_or_default()
    }

    /// Iterate over bodies that received a contribution.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &SpatialForce)> {
        self.forces.iter().map(|(id, f)| (*id, f))
    }

    /// Number of bodies that received a contribution.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Whether nothing has been applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Sum of the force parts over all bodies.
    ///
    /// Torques are referred to different origins and are not summed.
    #[must_use]
    pub fn net_force(&self) -> nalgebra::Vector3<f64> {
        self.forces.values().map(|f| f.force).sum()
    }

    /// Forget all contributions, ready for the next evaluation.
    pub fn clear(&mut self) {
        self.forces.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_apply_accumulates() {
        let mut forces = BodyForces::new();
        let a = BodyId::new(1);
        let b = BodyId::new(2);

        forces.apply(a, SpatialForce::new(Vector3::x(), Vector3::y()));
        forces.apply(b, SpatialForce::from_force(-Vector3::y()));
        forces.apply(a, SpatialForce::new(Vector3::x(), Vector3::zeros()));

        assert_eq!(forces.len(), 2);
        assert_eq!(forces.get(a).torque, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(forces.get(a).force, Vector3::y());
        assert!(forces.net_force().norm() < 1e-12);
    }

    #[test]
    fn test_untouched_body_is_zero() {
        let forces = BodyForces::new();
        assert!(forces.is_empty());
        assert!(forces.get(BodyId::new(7)).is_zero(0.0));
    }

    #[test]
    fn test_clear() {
        let mut forces = BodyForces::new();
        forces.apply(BodyId::new(1), SpatialForce::from_force(Vector3::z()));
        forces.clear();
        assert!(forces.is_empty());
    }
}
