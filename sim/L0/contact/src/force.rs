//! Per-contact force records.

use nalgebra::{Point3, Vector3};
use sim_types::SpatialForce;

use crate::ContactId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Force, energy and power produced by one contact at one instant.
///
/// The spatial force is the one applied to surface 2's body, with its
/// torque measured about the center of pressure. Surface 1's body receives
/// the equal and opposite force at the same point.
///
/// A contact that produces no record at all (for example because the
/// surfaces are separated) is simply absent from the force cache.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactForce {
    /// Contact that generated this force.
    pub contact: ContactId,
    /// Point the force is applied at, in ground.
    pub center_of_pressure: Point3<f64>,
    /// Force on surface 2, referred to the center of pressure.
    pub force_on_surface2: SpatialForce,
    /// Elastic energy stored in the deformation (J).
    pub potential_energy: f64,
    /// Rate of energy loss to dissipation and friction (W, never negative).
    pub power_loss: f64,
}

impl ContactForce {
    /// Create a contact force record.
    #[must_use]
    pub fn new(
        contact: ContactId,
        center_of_pressure: Point3<f64>,
        force_on_surface2: SpatialForce,
        potential_energy: f64,
        power_loss: f64,
    ) -> Self {
        Self {
            contact,
            center_of_pressure,
            force_on_surface2,
            potential_energy,
            power_loss,
        }
    }

    /// A contact that exists geometrically but transmits nothing.
    #[must_use]
    pub fn zero_at(contact: ContactId, center_of_pressure: Point3<f64>) -> Self {
        Self::new(contact, center_of_pressure, SpatialForce::zero(), 0.0, 0.0)
    }

    /// Shift the force from the center of pressure to the two body origins.
    ///
    /// Returns `(force on body 1, force on body 2)`, each referred to its
    /// own body origin. The pair is equal and opposite at the center of
    /// pressure.
    #[must_use]
    pub fn body_forces(
        &self,
        origin1: &Point3<f64>,
        origin2: &Point3<f64>,
    ) -> (SpatialForce, SpatialForce) {
        let r1 = self.center_of_pressure - origin1;
        let r2 = self.center_of_pressure - origin2;
        let on2 = self.force_on_surface2.shift_reference(&r2);
        let on1 = (-self.force_on_surface2).shift_reference(&r1);
        (on1, on2)
    }
}

/// One sample point of a distributed contact patch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactDetail {
    /// Sample location in ground.
    pub location: Point3<f64>,
    /// Local material deformation (m).
    pub deformation: f64,
    /// Force on surface 2 at this point.
    pub force_on_surface2: Vector3<f64>,
    /// Slip velocity of surface 2 relative to surface 1.
    pub slip_velocity: Vector3<f64>,
    /// Power dissipated at this point.
    pub power_loss: f64,
}

/// Detailed, distributed description of a contact.
///
/// None of the built-in generators produce patches; asking them for one
/// fails with [`crate::ContactError::PatchNotImplemented`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPatch {
    /// Net effect of the whole patch.
    pub resultant: ContactForce,
    /// Individual sample points.
    pub details: Vec<ContactDetail>,
}
