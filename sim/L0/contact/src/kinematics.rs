//! Interface to the rigid-body kinematics provider.
//!
//! The matter subsystem owns body positions and velocities; the contact
//! subsystem only asks where a body is, how a frame fixed to it moves, and
//! how fast a point fixed to it is travelling.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use sim_types::{BodyId, Pose, RigidBodyState, SimError, Twist};

/// Velocity of a frame fixed to a body: where its origin is and how it moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVelocity {
    /// Frame origin in ground.
    pub origin: Point3<f64>,
    /// Spatial velocity of the frame, referred to `origin`.
    pub twist: Twist,
}

impl SurfaceVelocity {
    /// Create a surface velocity.
    #[must_use]
    pub const fn new(origin: Point3<f64>, twist: Twist) -> Self {
        Self { origin, twist }
    }

    /// A frame at `origin` that is not moving.
    #[must_use]
    pub fn at_rest(origin: Point3<f64>) -> Self {
        Self {
            origin,
            twist: Twist::zero(),
        }
    }

    /// Ground-frame velocity of the material point currently at `point`.
    #[must_use]
    pub fn velocity_at(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.twist.velocity_at_point(&(point - self.origin))
    }
}

/// Read-only access to body placement and motion for one state.
pub trait BodyKinematics {
    /// Pose and velocity of a body, both in ground.
    fn body_state(&self, body: BodyId) -> sim_types::Result<RigidBodyState>;

    /// Location of the body origin in ground.
    fn body_origin(&self, body: BodyId) -> sim_types::Result<Point3<f64>> {
        Ok(self.body_state(body)?.pose.position)
    }

    /// Ground-frame velocity of a frame fixed to `body` at `frame_in_body`.
    fn frame_velocity_in_ground(
        &self,
        body: BodyId,
        frame_in_body: &Pose,
    ) -> sim_types::Result<SurfaceVelocity> {
        let state = self.body_state(body)?;
        let origin = state.pose.transform_point(&frame_in_body.position);
        let twist = state.twist.shift(&(origin - state.pose.position));
        Ok(SurfaceVelocity::new(origin, twist))
    }

    /// Ground-frame velocity of the point of `body` currently at `point`.
    fn station_velocity_in_ground(
        &self,
        body: BodyId,
        point: &Point3<f64>,
    ) -> sim_types::Result<Vector3<f64>> {
        let state = self.body_state(body)?;
        Ok(state.twist.velocity_at_point(&(point - state.pose.position)))
    }
}

/// A flat map of body states.
///
/// Ground ([`BodyId::GROUND`]) is always present, at the origin and at rest,
/// unless explicitly overwritten.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    bodies: HashMap<BodyId, RigidBodyState>,
}

impl BodySet {
    /// A set holding only ground.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a body's state.
    pub fn insert(&mut self, body: BodyId, state: RigidBodyState) {
        self.bodies.insert(body, state);
    }

    /// Builder form of [`BodySet::insert`].
    #[must_use]
    pub fn with_body(mut self, body: BodyId, state: RigidBodyState) -> Self {
        self.insert(body, state);
        self
    }

    /// Change only a body's velocity.
    pub fn set_twist(&mut self, body: BodyId, twist: Twist) -> sim_types::Result<()> {
        let state = self
            .bodies
            .get_mut(&body)
            .ok_or(SimError::InvalidBodyId(body.raw()))?;
        state.twist = twist;
        Ok(())
    }

    /// Change only a body's pose.
    pub fn set_pose(&mut self, body: BodyId, pose: Pose) -> sim_types::Result<()> {
        let state = self
            .bodies
            .get_mut(&body)
            .ok_or(SimError::InvalidBodyId(body.raw()))?;
        state.pose = pose;
        Ok(())
    }

    /// Number of explicitly inserted bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no bodies were inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl BodyKinematics for BodySet {
    fn body_state(&self, body: BodyId) -> sim_types::Result<RigidBodyState> {
        match self.bodies.get(&body) {
            Some(state) => Ok(*state),
            None if body.is_ground() => Ok(RigidBodyState::default()),
            None => Err(SimError::InvalidBodyId(body.raw())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spinning_body() -> BodySet {
        // Body at (1,0,0) translating along +X at 1 m/s and spinning about +Z at 2 rad/s.
        BodySet::new().with_body(
            BodyId::new(1),
            RigidBodyState::new(
                Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
                Twist::new(Vector3::x(), Vector3::new(0.0, 0.0, 2.0)),
            ),
        )
    }

    #[test]
    fn test_ground_is_implicit() {
        let bodies = BodySet::new();
        let ground = bodies.body_state(BodyId::GROUND).unwrap();
        assert_eq!(ground.twist, Twist::zero());
        assert_eq!(
            bodies.body_state(BodyId::new(5)).unwrap_err(),
            SimError::InvalidBodyId(5)
        );
    }

    #[test]
    fn test_station_velocity() {
        let bodies = spinning_body();
        // Point 1m along +Y from the origin: v = (1,0,0) + (0,0,2) × (0,1,0) = (-1,0,0)
        let v = bodies
            .station_velocity_in_ground(BodyId::new(1), &Point3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert_relative_eq!(v, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_frame_velocity_matches_station_velocity() {
        let bodies = spinning_body();
        let frame = Pose::from_position(Point3::new(0.0, 0.5, 0.0));
        let sv = bodies
            .frame_velocity_in_ground(BodyId::new(1), &frame)
            .unwrap();
        assert_relative_eq!(sv.origin, Point3::new(1.0, 0.5, 0.0), epsilon = 1e-12);

        let p = Point3::new(1.3, -0.2, 0.4);
        let direct = bodies
            .station_velocity_in_ground(BodyId::new(1), &p)
            .unwrap();
        assert_relative_eq!(sv.velocity_at(&p), direct, epsilon = 1e-12);
    }

    #[test]
    fn test_setters() {
        let mut bodies = spinning_body();
        bodies.set_twist(BodyId::new(1), Twist::zero()).unwrap();
        assert_eq!(bodies.body_state(BodyId::new(1)).unwrap().twist, Twist::zero());
        assert!(bodies.set_pose(BodyId::new(2), Pose::identity()).is_err());
        assert_eq!(bodies.len(), 1);
    }
}
