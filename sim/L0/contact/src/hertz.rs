//! Hertz contact with Hunt–Crossley dissipation and Stribeck friction.
//!
//! # Model
//!
//! Two locally spherical surfaces with effective radius `R` overlapping by
//! depth `x` press apart with the Hertz force
//!
//! ```text
//! fH = 4/3 · k · x · √(R·k·x)
//! ```
//!
//! where `k` is the series combination of the two materials' `stiffness^(2/3)`.
//! Dissipation follows Hunt and Crossley, proportional to both the elastic
//! force and the penetration rate `ẋ`:
//!
//! ```text
//! fHC = fH · 3/2 · c · ẋ
//! ```
//!
//! Friction acts along the tangential slip, with a coefficient from the
//! configured [`crate::FrictionCurve`] scaled by the total normal force.

use nalgebra::Vector3;
use sim_types::SpatialForce;
use tracing::debug;

use crate::{
    Contact, ContactError, ContactForce, ContactForceGenerator, ContactTypeId, GeneratorContext,
    Result, SurfaceVelocity, combine_friction,
};

/// Slip speeds at or below this are treated as no slip at all.
pub const SIGNIFICANT_SLIP: f64 = 1e-14;

/// Built-in generator for [`Contact::CircularPoint`] contacts.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use sim_contact::{
///     BodySet, CircularPointContact, Contact, ContactForceGenerator, ContactId,
///     ContactMaterial, ContactSurface, FrictionCurve, GeneratorContext, HertzCircular,
///     ManualContactTracker, SurfaceVelocity,
/// };
/// use sim_types::{BodyId, Stage};
///
/// let mut tracker = ManualContactTracker::new();
/// let floor = tracker.add_surface(ContactSurface::new(BodyId::GROUND, ContactMaterial::steel()));
/// let ball = tracker.add_surface(ContactSurface::new(BodyId::new(1), ContactMaterial::rubber()));
/// let contact = Contact::from(CircularPointContact::new(
///     ContactId::new(0), floor, ball, 0.05, 1e-4, Point3::origin(), Vector3::z_axis(),
/// ));
///
/// let bodies = BodySet::new();
/// let ctx = GeneratorContext::new(&tracker, &bodies, Stage::Velocity, 0.01, FrictionCurve::Stribeck);
/// let rest = SurfaceVelocity::at_rest(Point3::origin());
///
/// let force = HertzCircular
///     .calc_contact_force(&ctx, &contact, &rest, &rest)
///     .unwrap()
///     .unwrap();
/// assert!(force.force_on_surface2.force.z > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HertzCircular;

impl ContactForceGenerator for HertzCircular {
    fn name(&self) -> &str {
        "HertzCircular"
    }

    fn contact_type(&self) -> ContactTypeId {
        ContactTypeId::CIRCULAR_POINT
    }

    fn calc_contact_force(
        &self,
        ctx: &GeneratorContext<'_>,
        contact: &Contact,
        v1: &SurfaceVelocity,
        v2: &SurfaceVelocity,
    ) -> Result<Option<ContactForce>> {
        let Contact::CircularPoint(contact) = contact else {
            return Err(ContactError::UnexpectedGeometry {
                generator: self.name().to_owned(),
                expected: ContactTypeId::CIRCULAR_POINT,
                actual: contact.type_id(),
            });
        };

        let x = contact.depth;
        if x <= 0.0 {
            return Ok(None);
        }

        let mat1 = ctx.material(contact.surface1)?;
        let mat2 = ctx.material(contact.surface2)?;

        let (k1, k2) = (mat1.stiffness23(), mat2.stiffness23());
        let (c1, c2) = (mat1.dissipation(), mat2.dissipation());
        if k1 + k2 <= 0.0 {
            return Ok(None);
        }

        // Fraction of the deformation taken by surface 1; the softer surface
        // squashes more and the contact point moves toward the stiffer one.
        let s1 = k2 / (k1 + k2);
        let s2 = 1.0 - s1;
        let normal = contact.normal.into_inner();
        let contact_point = contact.origin + normal * (x * (0.5 - s1));

        let k = k1 * s1;
        let c = c1 * s1 + c2 * s2;
        let r = contact.effective_radius;
        let f_hertz = (4.0 / 3.0) * k * x * (r * k * x).sqrt();

        let vel = v1.velocity_at(&contact_point) - v2.velocity_at(&contact_point);
        let xdot = vel.dot(&normal);
        let vel_tangent = vel - normal * xdot;

        let f_hc = f_hertz * 1.5 * c * xdot;
        let f_normal = f_hertz + f_hc;

        if f_normal <= 0.0 {
            debug!(
                contact = %contact.id,
                f_hertz,
                f_hc,
                "surfaces separating faster than the material recovers; no contact force"
            );
            return Ok(Some(ContactForce::zero_at(contact.id, contact_point)));
        }

        let potential_energy = 0.4 * f_hertz * x;
        let power_hc = f_hc * xdot;

        let mut force_friction = Vector3::zeros();
        let mut power_friction = 0.0;
        let slip_sq = vel_tangent.norm_squared();
        if slip_sq > SIGNIFICANT_SLIP * SIGNIFICANT_SLIP {
            let slip = slip_sq.sqrt();
            let us = combine_friction(mat1.static_friction(), mat2.static_friction());
            let ud = combine_friction(mat1.dynamic_friction(), mat2.dynamic_friction());
            let uv = combine_friction(mat1.viscous_friction(), mat2.viscous_friction());
            debug_assert!(us >= ud, "static friction {us} below dynamic {ud}");

            let v = slip * ctx.inv_transition_velocity();
            let mu = ctx
                .friction_curve()
                .coefficient(us, ud, uv * ctx.transition_velocity(), v);
            let f_friction = f_normal * mu;
            force_friction = vel_tangent * (f_friction / slip);
            power_friction = f_friction * slip;
        }

        let total = normal * (f_hertz + f_hc) + force_friction;

        // The conservative power fH·ẋ is left out: it is already accounted
        // for by the potential energy.
        Ok(Some(ContactForce::new(
            contact.id,
            contact_point,
            SpatialForce::from_force(total),
            potential_energy,
            power_hc + power_friction,
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        BodySet, CircularPointContact, ContactId, ContactMaterial, ContactSurface,
        ContactSurfaceIndex, FrictionCurve, ManualContactTracker, TriangleMeshContact,
    };
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use sim_types::{BodyId, Stage, Twist};

    /// Stiffness whose 2/3 power is `k23`.
    fn stiffness_for(k23: f64) -> f64 {
        k23.powf(1.5)
    }

    struct Fixture {
        tracker: ManualContactTracker,
        bodies: BodySet,
        s1: ContactSurfaceIndex,
        s2: ContactSurfaceIndex,
    }

    impl Fixture {
        fn new(mat1: ContactMaterial, mat2: ContactMaterial) -> Self {
            let mut tracker = ManualContactTracker::new();
            let s1 = tracker.add_surface(ContactSurface::new(BodyId::GROUND, mat1));
            let s2 = tracker.add_surface(ContactSurface::new(BodyId::new(1), mat2));
            Self {
                tracker,
                bodies: BodySet::new(),
                s1,
                s2,
            }
        }

        fn ctx(&self) -> GeneratorContext<'_> {
            GeneratorContext::new(
                &self.tracker,
                &self.bodies,
                Stage::Velocity,
                0.01,
                FrictionCurve::Stribeck,
            )
        }

        fn contact(&self, depth: f64) -> Contact {
            CircularPointContact::new(
                ContactId::new(1),
                self.s1,
                self.s2,
                1.0,
                depth,
                Point3::origin(),
                Vector3::z_axis(),
            )
            .into()
        }
    }

    fn rest() -> SurfaceVelocity {
        SurfaceVelocity::at_rest(Point3::origin())
    }

    fn moving(linear: Vector3<f64>) -> SurfaceVelocity {
        SurfaceVelocity::new(Point3::origin(), Twist::new(linear, Vector3::zeros()))
    }

    #[test]
    fn test_hertz_force_at_rest() {
        // k23 = 200 on both sides gives k = 100; R = 1, x = 0.01:
        // fH = 4/3 · 100 · 0.01 · √(1 · 100 · 0.01) = 4/3.
        let mat = ContactMaterial::frictionless(stiffness_for(200.0), 0.0);
        let fx = Fixture::new(mat, mat);
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(0.01), &rest(), &rest())
            .unwrap()
            .unwrap();

        assert_relative_eq!(force.force_on_surface2.force, Vector3::new(0.0, 0.0, 4.0 / 3.0), epsilon = 1e-9);
        assert_relative_eq!(force.force_on_surface2.torque, Vector3::zeros());
        assert_relative_eq!(force.potential_energy, 0.4 * (4.0 / 3.0) * 0.01, epsilon = 1e-12);
        assert_eq!(force.power_loss, 0.0);
        assert_relative_eq!(force.center_of_pressure, Point3::origin(), epsilon = 1e-15);
    }

    #[test]
    fn test_no_overlap_gives_no_record() {
        let fx = Fixture::new(ContactMaterial::default(), ContactMaterial::default());
        for depth in [0.0, -0.001] {
            let force = HertzCircular
                .calc_contact_force(&fx.ctx(), &fx.contact(depth), &rest(), &rest())
                .unwrap();
            assert!(force.is_none());
        }
    }

    #[test]
    fn test_contact_point_moves_toward_stiffer_surface() {
        // Surface 2 much stiffer: surface 1 does most of the deforming, so
        // s1 → 1 and the point shifts by x·(0.5 − s1) along the normal.
        let soft = ContactMaterial::frictionless(stiffness_for(100.0), 0.0);
        let hard = ContactMaterial::frictionless(stiffness_for(300.0), 0.0);
        let fx = Fixture::new(soft, hard);
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(0.02), &rest(), &rest())
            .unwrap()
            .unwrap();
        let s1 = 300.0 / 400.0;
        assert_relative_eq!(force.center_of_pressure.z, 0.02 * (0.5 - s1), epsilon = 1e-12);
        assert!(force.center_of_pressure.z < 0.0);
    }

    #[test]
    fn test_uses_both_materials() {
        let soft = ContactMaterial::frictionless(stiffness_for(100.0), 0.0);
        let hard = ContactMaterial::frictionless(stiffness_for(300.0), 0.0);
        let fx_mixed = Fixture::new(soft, hard);
        let fx_soft = Fixture::new(soft, soft);

        let mixed = HertzCircular
            .calc_contact_force(&fx_mixed.ctx(), &fx_mixed.contact(0.01), &rest(), &rest())
            .unwrap()
            .unwrap();
        let same = HertzCircular
            .calc_contact_force(&fx_soft.ctx(), &fx_soft.contact(0.01), &rest(), &rest())
            .unwrap()
            .unwrap();

        // k = k1·k2/(k1+k2) = 75 vs. 50 for two soft surfaces.
        let expected = |k: f64| 4.0 / 3.0 * k * 0.01 * (k * 0.01).sqrt();
        assert_relative_eq!(mixed.force_on_surface2.force.z, expected(75.0), epsilon = 1e-9);
        assert_relative_eq!(same.force_on_surface2.force.z, expected(50.0), epsilon = 1e-9);
    }

    #[test]
    fn test_hunt_crossley_dissipation() {
        let mat = ContactMaterial::frictionless(stiffness_for(200.0), 0.5);
        let fx = Fixture::new(mat, mat);
        // Surface 1 moving up into surface 2 at 0.1 m/s: ẋ = 0.1.
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(0.01), &moving(Vector3::new(0.0, 0.0, 0.1)), &rest())
            .unwrap()
            .unwrap();

        let f_hertz = 4.0 / 3.0;
        let f_hc = f_hertz * 1.5 * 0.5 * 0.1;
        assert_relative_eq!(force.force_on_surface2.force.z, f_hertz + f_hc, epsilon = 1e-9);
        assert_relative_eq!(force.power_loss, f_hc * 0.1, epsilon = 1e-12);
        assert!(force.power_loss >= 0.0);
    }

    #[test]
    fn test_potential_energy_ignores_velocity() {
        let mat = ContactMaterial::default();
        let fx = Fixture::new(mat, mat);
        let contact = fx.contact(0.002);
        let at_rest = HertzCircular
            .calc_contact_force(&fx.ctx(), &contact, &rest(), &rest())
            .unwrap()
            .unwrap();
        let sliding = HertzCircular
            .calc_contact_force(&fx.ctx(), &contact, &moving(Vector3::new(0.3, -0.1, 0.05)), &rest())
            .unwrap()
            .unwrap();
        assert_eq!(at_rest.potential_energy, sliding.potential_energy);
    }

    #[test]
    fn test_yanking_gives_zero_record() {
        let mat = ContactMaterial::frictionless(stiffness_for(200.0), 1.0);
        let fx = Fixture::new(mat, mat);
        // ẋ = −1 m/s: fHC = −1.5·fH, so the total normal force is negative.
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(0.01), &moving(Vector3::new(0.0, 0.0, -1.0)), &rest())
            .unwrap()
            .unwrap();

        assert_eq!(force.contact, ContactId::new(1));
        assert_eq!(force.force_on_surface2, SpatialForce::zero());
        assert_eq!(force.potential_energy, 0.0);
        assert_eq!(force.power_loss, 0.0);
    }

    #[test]
    fn test_two_zero_stiffness_surfaces_produce_no_record() {
        // Both stiffnesses zero: no way to split the deformation.
        let mat = ContactMaterial::frictionless(0.0, 0.0);
        let fx = Fixture::new(mat, mat);
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(1e-3), &rest(), &rest())
            .unwrap();
        assert!(force.is_none());
    }

    #[test]
    fn test_one_zero_stiffness_surface_stays_finite() {
        let fx = Fixture::new(
            ContactMaterial::frictionless(0.0, 0.0),
            ContactMaterial::frictionless(stiffness_for(200.0), 0.0),
        );
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(1e-3), &rest(), &rest())
            .unwrap()
            .unwrap();
        assert!(force.force_on_surface2.force.iter().all(|v| v.is_finite()));
        assert!(force.potential_energy.is_finite());
    }

    #[test]
    fn test_friction_opposes_slip_of_surface2() {
        let mat = ContactMaterial::new(stiffness_for(200.0), 0.0, 0.8, 0.6, 0.0);
        let fx = Fixture::new(mat, mat);
        // Surface 2 slides along +X over a fixed surface 1 far above vt.
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(0.01), &rest(), &moving(Vector3::new(1.0, 0.0, 0.0)))
            .unwrap()
            .unwrap();

        let f = force.force_on_surface2.force;
        let f_hertz = 4.0 / 3.0;
        assert!(f.x < 0.0);
        assert_relative_eq!(f.y, 0.0);
        // v = 100 vt: deep in the sliding regime with no viscous term, mu = ud.
        assert_relative_eq!(f.x, -0.6 * f_hertz, epsilon = 1e-9);
        assert_relative_eq!(force.power_loss, 0.6 * f_hertz * 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frictionless_pair_has_no_tangential_force() {
        let mat = ContactMaterial::frictionless(stiffness_for(200.0), 0.0);
        let fx = Fixture::new(mat, mat);
        let force = HertzCircular
            .calc_contact_force(&fx.ctx(), &fx.contact(0.01), &rest(), &moving(Vector3::new(0.5, 0.5, 0.0)))
            .unwrap()
            .unwrap();
        assert_relative_eq!(force.force_on_surface2.force.x, 0.0);
        assert_relative_eq!(force.force_on_surface2.force.y, 0.0);
        assert_eq!(force.power_loss, 0.0);
    }

    #[test]
    fn test_rejects_other_geometry() {
        let fx = Fixture::new(ContactMaterial::default(), ContactMaterial::default());
        let mesh = Contact::from(TriangleMeshContact {
            id: ContactId::new(2),
            surface1: fx.s1,
            surface2: fx.s2,
            faces1: vec![],
            faces2: vec![],
        });
        let err = HertzCircular
            .calc_contact_force(&fx.ctx(), &mesh, &rest(), &rest())
            .unwrap_err();
        assert_eq!(
            err,
            ContactError::UnexpectedGeometry {
                generator: "HertzCircular".to_owned(),
                expected: ContactTypeId::CIRCULAR_POINT,
                actual: ContactTypeId::TRIANGLE_MESH,
            }
        );
    }

    #[test]
    fn test_patch_not_implemented() {
        let fx = Fixture::new(ContactMaterial::default(), ContactMaterial::default());
        let err = HertzCircular
            .calc_contact_patch(&fx.ctx(), &fx.contact(0.01), &rest(), &rest())
            .unwrap_err();
        assert!(matches!(err, ContactError::PatchNotImplemented { .. }));
    }
}
