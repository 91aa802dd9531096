//! Contact geometry reported by the contact tracker.
//!
//! A [`Contact`] is one active overlap between two tracked surfaces. The
//! geometry carried depends on the kind of overlap, so contacts are an
//! exhaustive enum; force generators `match` on the variant they accept
//! instead of downcasting.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ContactError, Result};

/// Stable identity of a contact across the lifetime of the overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactId(pub u64);

impl ContactId {
    /// Create a new contact ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Contact({})", self.0)
    }
}

/// Index of a contact surface registered with the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactSurfaceIndex(pub usize);

impl ContactSurfaceIndex {
    /// Create a new surface index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for ContactSurfaceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Surface({})", self.0)
    }
}

/// Tag identifying a contact geometry variant; the key force generators are
/// registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactTypeId(pub u16);

impl ContactTypeId {
    /// Not a geometry; used by generators that are not tied to one type.
    pub const UNASSIGNED: Self = Self(0);
    /// [`Contact::CircularPoint`].
    pub const CIRCULAR_POINT: Self = Self(1);
    /// [`Contact::EllipticalPoint`].
    pub const ELLIPTICAL_POINT: Self = Self(2);
    /// [`Contact::TriangleMesh`].
    pub const TRIANGLE_MESH: Self = Self(3);

    /// Name of the geometry this tag stands for, if it is a known one.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("CircularPoint"),
            2 => Some("EllipticalPoint"),
            3 => Some("TriangleMesh"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContactTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "ContactType({})", self.0),
        }
    }
}

/// Two surfaces touching at (nearly) a point, with a circular contact region.
///
/// Produced for sphere/sphere, sphere/plane and similar pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircularPointContact {
    /// Contact identity.
    pub id: ContactId,
    /// First surface.
    pub surface1: ContactSurfaceIndex,
    /// Second surface.
    pub surface2: ContactSurfaceIndex,
    /// Penetration depth (positive when overlapping).
    pub depth: f64,
    /// Unit normal pointing from surface 1 toward surface 2.
    pub normal: UnitVector3<f64>,
    /// Point half way between the two undeformed surfaces, in ground.
    pub origin: Point3<f64>,
    /// Effective radius of curvature `R = r1·r2 / (r1 + r2)`.
    pub effective_radius: f64,
}

impl CircularPointContact {
    /// Create a circular point contact.
    #[must_use]
    pub fn new(
        id: ContactId,
        surface1: ContactSurfaceIndex,
        surface2: ContactSurfaceIndex,
        effective_radius: f64,
        depth: f64,
        origin: Point3<f64>,
        normal: UnitVector3<f64>,
    ) -> Self {
        Self {
            id,
            surface1,
            surface2,
            depth,
            normal,
            origin,
            effective_radius,
        }
    }
}

/// Two curved surfaces touching at a point with an elliptical contact region.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EllipticalPointContact {
    /// Contact identity.
    pub id: ContactId,
    /// First surface.
    pub surface1: ContactSurfaceIndex,
    /// Second surface.
    pub surface2: ContactSurfaceIndex,
    /// Penetration depth (positive when overlapping).
    pub depth: f64,
    /// Point half way between the two undeformed surfaces, in ground.
    pub origin: Point3<f64>,
    /// Contact frame orientation: local Z is the normal (surface 1 toward
    /// surface 2), local X and Y are the principal curvature directions.
    pub frame: UnitQuaternion<f64>,
    /// Effective principal curvatures along local X and Y.
    pub curvatures: (f64, f64),
}

impl EllipticalPointContact {
    /// Contact normal in ground (local Z of the contact frame).
    #[must_use]
    pub fn normal(&self) -> UnitVector3<f64> {
        UnitVector3::new_unchecked(self.frame * Vector3::z())
    }
}

/// Overlap between two triangle meshes, described by the faces involved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMeshContact {
    /// Contact identity.
    pub id: ContactId,
    /// First surface.
    pub surface1: ContactSurfaceIndex,
    /// Second surface.
    pub surface2: ContactSurfaceIndex,
    /// Faces of surface 1 that lie inside surface 2.
    pub faces1: Vec<usize>,
    /// Faces of surface 2 that lie inside surface 1.
    pub faces2: Vec<usize>,
}

/// One active overlap between two contact surfaces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Contact {
    /// Point contact with a circular region.
    CircularPoint(CircularPointContact),
    /// Point contact with an elliptical region.
    EllipticalPoint(EllipticalPointContact),
    /// Mesh/mesh overlap.
    TriangleMesh(TriangleMeshContact),
}

impl Contact {
    /// Dispatch tag of this contact's geometry.
    #[must_use]
    pub fn type_id(&self) -> ContactTypeId {
        match self {
            Self::CircularPoint(_) => ContactTypeId::CIRCULAR_POINT,
            Self::EllipticalPoint(_) => ContactTypeId::ELLIPTICAL_POINT,
            Self::TriangleMesh(_) => ContactTypeId::TRIANGLE_MESH,
        }
    }

    /// Contact identity.
    #[must_use]
    pub fn id(&self) -> ContactId {
        match self {
            Self::CircularPoint(c) => c.id,
            Self::EllipticalPoint(c) => c.id,
            Self::TriangleMesh(c) => c.id,
        }
    }

    /// The two surfaces in contact, in order.
    #[must_use]
    pub fn surfaces(&self) -> (ContactSurfaceIndex, ContactSurfaceIndex) {
        match self {
            Self::CircularPoint(c) => (c.surface1, c.surface2),
            Self::EllipticalPoint(c) => (c.surface1, c.surface2),
            Self::TriangleMesh(c) => (c.surface1, c.surface2),
        }
    }

    /// First surface.
    #[must_use]
    pub fn surface1(&self) -> ContactSurfaceIndex {
        self.surfaces().0
    }

    /// Second surface.
    #[must_use]
    pub fn surface2(&self) -> ContactSurfaceIndex {
        self.surfaces().1
    }
}

impl From<CircularPointContact> for Contact {
    fn from(c: CircularPointContact) -> Self {
        Self::CircularPoint(c)
    }
}

impl From<EllipticalPointContact> for Contact {
    fn from(c: EllipticalPointContact) -> Self {
        Self::EllipticalPoint(c)
    }
}

impl From<TriangleMeshContact> for Contact {
    fn from(c: TriangleMeshContact) -> Self {
        Self::TriangleMesh(c)
    }
}

/// The set of contacts active in one state.
///
/// Order is the tracker's order and is the order in which forces are
/// generated and cached.
#[derive(Debug, Clone, Default)]
pub struct ContactSnapshot {
    contacts: Vec<Contact>,
    by_id: HashMap<ContactId, usize>,
}

impl ContactSnapshot {
    /// An empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a list of contacts with distinct ids.
    pub fn from_contacts(contacts: impl IntoIterator<Item = Contact>) -> Result<Self> {
        let mut snapshot = Self::new();
        for contact in contacts {
            snapshot.push(contact)?;
        }
        Ok(snapshot)
    }

    /// Append a contact. Fails if its id is already in the snapshot.
    pub fn push(&mut self, contact: Contact) -> Result<()> {
        match self.by_id.entry(contact.id()) {
            Entry::Occupied(_) => Err(ContactError::DuplicateContact(contact.id())),
            Entry::Vacant(slot) => {
                slot.insert(self.contacts.len());
                self.contacts.push(contact);
                Ok(())
            }
        }
    }

    /// Number of active contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether there are no active contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Contact by position in the snapshot.
    #[must_use]
    pub fn contact(&self, index: usize) -> Option<&Contact> {
        self.contacts.get(index)
    }

    /// Contact by identity.
    #[must_use]
    pub fn contact_by_id(&self, id: ContactId) -> Option<&Contact> {
        self.by_id.get(&id).and_then(|&i| self.contacts.get(i))
    }

    /// Iterate over the active contacts in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }
}

impl<'a> IntoIterator for &'a ContactSnapshot {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
