//! Interface to the contact tracker.
//!
//! Geometric overlap detection is somebody else's job. This crate only
//! needs to read the tracker's current snapshot and find out which body
//! and material each surface belongs to.

use sim_types::{BodyId, Pose};

use crate::{Contact, ContactError, ContactMaterial, ContactSnapshot, ContactSurfaceIndex, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A contact surface attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactSurface {
    /// Body the surface is fixed to.
    pub body: BodyId,
    /// Surface frame measured in the body frame.
    pub transform: Pose,
    /// Surface material.
    pub material: ContactMaterial,
}

impl ContactSurface {
    /// Surface whose frame coincides with its body frame.
    #[must_use]
    pub fn new(body: BodyId, material: ContactMaterial) -> Self {
        Self {
            body,
            transform: Pose::identity(),
            material,
        }
    }

    /// Set the surface frame relative to the body.
    #[must_use]
    pub fn with_transform(mut self, transform: Pose) -> Self {
        self.transform = transform;
        self
    }
}

/// Read-only view of a contact tracker for one state.
pub trait ContactTracker {
    /// Contacts active in the current state.
    fn active_contacts(&self) -> &ContactSnapshot;

    /// Look up a registered surface.
    fn surface(&self, index: ContactSurfaceIndex) -> Result<&ContactSurface>;

    /// Body a surface is fixed to.
    fn body_for(&self, index: ContactSurfaceIndex) -> Result<BodyId> {
        self.surface(index).map(|s| s.body)
    }

    /// Surface frame measured in its body frame.
    fn surface_transform(&self, index: ContactSurfaceIndex) -> Result<Pose> {
        self.surface(index).map(|s| s.transform)
    }
}

/// A tracker whose surfaces and active contacts are supplied directly.
///
/// Useful for headless tools and tests that already know their contacts,
/// or for bridging a collision pipeline that produces contacts elsewhere.
///
/// ```
/// use sim_contact::{
///     CircularPointContact, ContactId, ContactMaterial, ContactSurface, ContactTracker,
///     ManualContactTracker,
/// };
/// use sim_types::BodyId;
/// use nalgebra::{Point3, Vector3};
///
/// let mut tracker = ManualContactTracker::new();
/// let ground = tracker.add_surface(ContactSurface::new(BodyId::GROUND, ContactMaterial::steel()));
/// let ball = tracker.add_surface(ContactSurface::new(BodyId::new(1), ContactMaterial::rubber()));
///
/// tracker.set_contacts([CircularPointContact::new(
///     ContactId::new(0), ground, ball, 0.1, 1e-3, Point3::origin(), Vector3::z_axis(),
/// )
/// .into()])
/// .unwrap();
/// assert_eq!(tracker.active_contacts().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualContactTracker {
    surfaces: Vec<ContactSurface>,
    snapshot: ContactSnapshot,
}

impl ManualContactTracker {
    /// A tracker with no surfaces and no contacts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface and return its index.
    pub fn add_surface(&mut self, surface: ContactSurface) -> ContactSurfaceIndex {
        self.surfaces.push(surface);
        ContactSurfaceIndex::new(self.surfaces.len() - 1)
    }

    /// Mutable access to a registered surface, e.g. to change its material.
    pub fn surface_mut(&mut self, index: ContactSurfaceIndex) -> Result<&mut ContactSurface> {
        self.surfaces
            .get_mut(index.0)
            .ok_or(ContactError::UnknownSurface(index))
    }

    /// Number of registered surfaces.
    #[must_use]
    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Replace the active contacts.
    ///
    /// Contact ids must be distinct; on a duplicate the previous contacts
    /// stay active.
    pub fn set_contacts(&mut self, contacts: impl IntoIterator<Item = Contact>) -> Result<()> {
        self.snapshot = ContactSnapshot::from_contacts(contacts)?;
        Ok(())
    }

    /// Drop all active contacts.
    pub fn clear_contacts(&mut self) {
        self.snapshot = ContactSnapshot::new();
    }
}

impl ContactTracker for ManualContactTracker {
    fn active_contacts(&self) -> &ContactSnapshot {
        &self.snapshot
    }

    fn surface(&self, index: ContactSurfaceIndex) -> Result<&ContactSurface> {
        self.surfaces
            .get(index.0)
            .ok_or(ContactError::UnknownSurface(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{CircularPointContact, ContactId};
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_surface_lookup() {
        let mut tracker = ManualContactTracker::new();
        let offset = Pose::from_position(Point3::new(0.0, 0.0, 0.5));
        let idx = tracker.add_surface(
            ContactSurface::new(BodyId::new(4), ContactMaterial::nylon()).with_transform(offset),
        );

        assert_eq!(tracker.num_surfaces(), 1);
        assert_eq!(tracker.body_for(idx).unwrap(), BodyId::new(4));
        assert_eq!(tracker.surface_transform(idx).unwrap(), offset);
        assert_eq!(
            tracker.surface(ContactSurfaceIndex::new(9)).unwrap_err(),
            ContactError::UnknownSurface(ContactSurfaceIndex::new(9))
        );
    }

    #[test]
    fn test_replace_contacts() {
        let mut tracker = ManualContactTracker::new();
        let a = tracker.add_surface(ContactSurface::new(BodyId::GROUND, ContactMaterial::default()));
        let b = tracker.add_surface(ContactSurface::new(BodyId::new(1), ContactMaterial::default()));
        let make = |id| {
            Contact::from(CircularPointContact::new(
                ContactId::new(id),
                a,
                b,
                1.0,
                0.01,
                Point3::origin(),
                Vector3::z_axis(),
            ))
        };

        tracker.set_contacts([make(1), make(2)]).unwrap();
        assert_eq!(tracker.active_contacts().len(), 2);

        assert_eq!(
            tracker.set_contacts([make(4), make(4)]).unwrap_err(),
            ContactError::DuplicateContact(ContactId::new(4))
        );
        assert_eq!(tracker.active_contacts().len(), 2);

        tracker.set_contacts([make(3)]).unwrap();
        assert_eq!(tracker.active_contacts().len(), 1);
        assert!(tracker.active_contacts().contact_by_id(ContactId::new(1)).is_none());

        tracker.clear_contacts();
        assert!(tracker.active_contacts().is_empty());
    }

    #[test]
    fn test_surface_mut() {
        let mut tracker = ManualContactTracker::new();
        let idx = tracker.add_surface(ContactSurface::new(BodyId::new(1), ContactMaterial::ice()));
        tracker.surface_mut(idx).unwrap().material = ContactMaterial::rubber();
        assert_eq!(tracker.surface(idx).unwrap().material, ContactMaterial::rubber());
    }
}
