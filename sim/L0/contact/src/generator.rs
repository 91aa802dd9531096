//! Contact force generators.
//!
//! A generator turns one [`Contact`] plus the velocities of its two surfaces
//! into a [`ContactForce`]. Generators are registered per
//! [`ContactTypeId`] in a [`crate::GeneratorRegistry`]; the subsystem looks
//! up the right one for each active contact.
//!
//! # Implementing a generator
//!
//! ```
//! use sim_contact::{
//!     Contact, ContactForce, ContactForceGenerator, ContactTypeId, GeneratorContext,
//!     Result, SurfaceVelocity,
//! };
//!
//! /// Reports every mesh contact as touching but force-free.
//! #[derive(Debug)]
//! struct Touching;
//!
//! impl ContactForceGenerator for Touching {
//!     fn name(&self) -> &str {
//!         "Touching"
//!     }
//!
//!     fn contact_type(&self) -> ContactTypeId {
//!         ContactTypeId::TRIANGLE_MESH
//!     }
//!
//!     fn calc_contact_force(
//!         &self,
//!         _ctx: &GeneratorContext<'_>,
//!         contact: &Contact,
//!         v1: &SurfaceVelocity,
//!         _v2: &SurfaceVelocity,
//!     ) -> Result<Option<ContactForce>> {
//!         Ok(Some(ContactForce::zero_at(contact.id(), v1.origin)))
//!     }
//! }
//! ```

use sim_types::Stage;

use crate::{
    BodyKinematics, Contact, ContactError, ContactForce, ContactMaterial, ContactPatch,
    ContactSurfaceIndex, ContactTracker, ContactTypeId, FrictionCurve, Result, SurfaceVelocity,
};

/// Everything a generator may read while evaluating one contact.
#[derive(Clone, Copy)]
pub struct GeneratorContext<'a> {
    tracker: &'a dyn ContactTracker,
    matter: &'a dyn BodyKinematics,
    stage: Stage,
    transition_velocity: f64,
    inv_transition_velocity: f64,
    friction_curve: FrictionCurve,
}

impl std::fmt::Debug for GeneratorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorContext")
            .field("stage", &self.stage)
            .field("transition_velocity", &self.transition_velocity)
            .field("friction_curve", &self.friction_curve)
            .finish_non_exhaustive()
    }
}

impl<'a> GeneratorContext<'a> {
    /// Build a context.
    ///
    /// `transition_velocity` must already have been validated as positive;
    /// its reciprocal is computed here once.
    #[must_use]
    pub fn new(
        tracker: &'a dyn ContactTracker,
        matter: &'a dyn BodyKinematics,
        stage: Stage,
        transition_velocity: f64,
        friction_curve: FrictionCurve,
    ) -> Self {
        Self {
            tracker,
            matter,
            stage,
            transition_velocity,
            inv_transition_velocity: transition_velocity.recip(),
            friction_curve,
        }
    }

    /// The contact tracker.
    #[must_use]
    pub fn tracker(&self) -> &'a dyn ContactTracker {
        self.tracker
    }

    /// Body kinematics for the state being evaluated.
    #[must_use]
    pub fn matter(&self) -> &'a dyn BodyKinematics {
        self.matter
    }

    /// Stage the state has been realized to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Friction transition velocity `vt` (m/s).
    #[must_use]
    pub fn transition_velocity(&self) -> f64 {
        self.transition_velocity
    }

    /// `1 / vt`.
    #[must_use]
    pub fn inv_transition_velocity(&self) -> f64 {
        self.inv_transition_velocity
    }

    /// Friction curve generators should evaluate.
    #[must_use]
    pub fn friction_curve(&self) -> FrictionCurve {
        self.friction_curve
    }

    /// Material of a tracked surface.
    pub fn material(&self, surface: ContactSurfaceIndex) -> Result<&'a ContactMaterial> {
        self.tracker.surface(surface).map(|s| &s.material)
    }
}

/// Computes the force produced by one kind of contact.
///
/// Implementations must be pure functions of their inputs: the same contact
/// and velocities always give the same result, and nothing is cached inside
/// the generator.
///
/// The potential energy reported in a [`ContactForce`] must not depend on
/// `v1` or `v2`. The subsystem relies on this to evaluate potential energy
/// with both surfaces held at rest when velocities are not yet known.
pub trait ContactForceGenerator: Send + Sync + std::fmt::Debug {
    /// Human-readable generator name used in diagnostics.
    fn name(&self) -> &str;

    /// Contact type this generator handles.
    fn contact_type(&self) -> ContactTypeId;

    /// Compute the force for one contact.
    ///
    /// `v1` and `v2` are the ground-frame spatial velocities of the two
    /// surface frames. `Ok(None)` means the contact produces no force record
    /// at all (e.g. the surfaces are not actually overlapping); such
    /// contacts are left out of the force cache.
    fn calc_contact_force(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &Contact,
        v1: &SurfaceVelocity,
        v2: &SurfaceVelocity,
    ) -> Result<Option<ContactForce>>;

    /// Detailed distributed analysis of one contact.
    ///
    /// Not supported unless a generator overrides it.
    fn calc_contact_patch(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &Contact,
        v1: &SurfaceVelocity,
        v2: &SurfaceVelocity,
    ) -> Result<ContactPatch> {
        let _ = (ctx, contact, v1, v2);
        Err(ContactError::patch_not_implemented(self.name()))
    }
}

/// Produces no force for any contact.
///
/// Installed as the default generator so that contact types nobody has a
/// model for are ignored rather than fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoNothing {
    type_id: ContactTypeId,
}

impl Default for DoNothing {
    fn default() -> Self {
        Self::new()
    }
}

impl DoNothing {
    /// A catch-all instance, suitable as the default generator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            type_id: ContactTypeId::UNASSIGNED,
        }
    }

    /// An instance registered for one specific contact type, to silence it.
    #[must_use]
    pub const fn for_type(type_id: ContactTypeId) -> Self {
        Self { type_id }
    }
}

impl ContactForceGenerator for DoNothing {
    fn name(&self) -> &str {
        "DoNothing"
    }

    fn contact_type(&self) -> ContactTypeId {
        self.type_id
    }

    fn calc_contact_force(
        &self,
        _ctx: &GeneratorContext<'_>,
        _contact: &Contact,
        _v1: &SurfaceVelocity,
        _v2: &SurfaceVelocity,
    ) -> Result<Option<ContactForce>> {
        Ok(None)
    }
}

/// Fails on every contact it is asked about.
///
/// Install as the default generator when an unmodeled contact type should
/// stop the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reject {
    type_id: ContactTypeId,
}

impl Default for Reject {
    fn default() -> Self {
        Self::new()
    }
}

impl Reject {
    /// A catch-all instance, suitable as the default generator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            type_id: ContactTypeId::UNASSIGNED,
        }
    }

    /// An instance registered for one specific contact type, to forbid it.
    #[must_use]
    pub const fn for_type(type_id: ContactTypeId) -> Self {
        Self { type_id }
    }
}

impl ContactForceGenerator for Reject {
    fn name(&self) -> &str {
        "Reject"
    }

    fn contact_type(&self) -> ContactTypeId {
        self.type_id
    }

    fn calc_contact_force(
        &self,
        _ctx: &GeneratorContext<'_>,
        contact: &Contact,
        _v1: &SurfaceVelocity,
        _v2: &SurfaceVelocity,
    ) -> Result<Option<ContactForce>> {
        Err(ContactError::GeneratorRejected {
            contact: contact.id(),
            type_id: contact.type_id(),
        })
    }
}
