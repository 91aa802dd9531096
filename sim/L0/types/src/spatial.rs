//! Spatial force vectors.

use std::ops::{Add, AddAssign, Neg, Sub};

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A force/torque pair acting on a body, in ground coordinates.
///
/// The torque is the moment about some reference point that the owner of
/// the value keeps track of (a center of pressure, a body origin, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialForce {
    /// Moment about the reference point (N·m).
    pub torque: Vector3<f64>,
    /// Resultant force (N).
    pub force: Vector3<f64>,
}

impl Default for SpatialForce {
    fn default() -> Self {
        Self::zero()
    }
}

impl SpatialForce {
    /// Create a spatial force from its torque and force parts.
    #[must_use]
    pub const fn new(torque: Vector3<f64>, force: Vector3<f64>) -> Self {
        Self { torque, force }
    }

    /// No force, no torque.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            torque: Vector3::zeros(),
            force: Vector3::zeros(),
        }
    }

    /// A pure force with no moment about its point of application.
    #[must_use]
    pub fn from_force(force: Vector3<f64>) -> Self {
        Self {
            torque: Vector3::zeros(),
            force,
        }
    }

    /// Refer this force to a different reference point.
    ///
    /// `r` is the vector from the new reference point to the current one.
    /// The force part is unchanged and the torque gains the lever-arm
    /// moment `r × F`.
    ///
    /// ```
    /// use sim_types::SpatialForce;
    /// use nalgebra::Vector3;
    ///
    /// // 1 N along +Y applied 1 m out along +X from the body origin.
    /// let at_point = SpatialForce::from_force(Vector3::y());
    /// let at_origin = at_point.shift_reference(&Vector3::x());
    /// assert_eq!(at_origin.torque, Vector3::z());
    /// ```
    #[must_use]
    pub fn shift_reference(&self, r: &Vector3<f64>) -> Self {
        Self {
            torque: self.torque + r.cross(&self.force),
            force: self.force,
        }
    }

    /// Whether both parts are within `tolerance` of zero.
    #[must_use]
    pub fn is_zero(&self, tolerance: f64) -> bool {
        self.torque.norm() <= tolerance && self.force.norm() <= tolerance
    }

    /// Check for `NaN` or `Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.torque.iter().all(|x| x.is_finite()) && self.force.iter().all(|x| x.is_finite())
    }
}

impl Neg for SpatialForce {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            torque: -self.torque,
            force: -self.force,
        }
    }
}

impl Add for SpatialForce {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            torque: self.torque + rhs.torque,
            force: self.force + rhs.force,
        }
    }
}

impl Sub for SpatialForce {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl AddAssign for SpatialForce {
    fn add_assign(&mut self, rhs: Self) {
        self.torque += rhs.torque;
        self.force += rhs.force;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shift_keeps_force() {
        let f = SpatialForce::new(Vector3::new(0.1, 0.0, 0.0), Vector3::new(0.0, 0.0, 5.0));
        let shifted = f.shift_reference(&Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(shifted.force, f.force);
        // (2,0,0) × (0,0,5) = (0,-10,0)
        assert_relative_eq!(
            shifted.torque,
            Vector3::new(0.1, -10.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_shift_along_force_adds_no_torque() {
        let f = SpatialForce::from_force(Vector3::new(0.0, 0.0, 3.0));
        let shifted = f.shift_reference(&Vector3::new(0.0, 0.0, -4.0));
        assert!(shifted.torque.norm() < 1e-12);
    }

    #[test]
    fn test_equal_and_opposite_sum_to_zero() {
        let f = SpatialForce::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 5.0, 6.0));
        assert!((f + (-f)).is_zero(1e-12));
        assert!((f - f).is_zero(1e-12));
    }

    #[test]
    fn test_add_assign() {
        let mut acc = SpatialForce::zero();
        acc += SpatialForce::from_force(Vector3::x());
        acc += SpatialForce::from_force(Vector3::x());
        assert_eq!(acc.force, Vector3::new(2.0, 0.0, 0.0));
    }
}
