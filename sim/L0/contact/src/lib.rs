//! Compliant contact force subsystem.
//!
//! Turns the overlaps reported by a contact tracker into forces on the
//! bodies involved. Surfaces are modeled as elastic, dissipative and
//! frictional materials, so contact is a smooth force law rather than a
//! constraint:
//!
//! - **Hertz elasticity**: `fH = 4/3 · k · x · √(R·k·x)` for penetration `x`
//!   and effective radius `R`
//! - **Hunt–Crossley dissipation**: `fHC = fH · 3/2 · c · ẋ`
//! - **Stribeck friction**: a smooth coefficient curve with a small
//!   transition velocity standing in for stiction
//!
//! # Architecture
//!
//! - [`ContactTracker`] supplies the active [`Contact`]s and surface
//!   [`ContactMaterial`]s; [`BodyKinematics`] supplies body motion
//! - [`ContactForceGenerator`]s compute one [`ContactForce`] per contact and
//!   are looked up by [`ContactTypeId`] in a [`GeneratorRegistry`]
//! - [`CompliantContactSubsystem`] drives the generators and caches results
//!   in a caller-owned [`ContactState`], gated by simulation [`Stage`]
//!
//! Forces are computed lazily: the force cache fills the first time it is
//! needed after velocities are known, and potential energy can be queried
//! as soon as positions are known.
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use sim_contact::{
//!     BodySet, CircularPointContact, CompliantContactConfig, CompliantContactSubsystem,
//!     ContactId, ContactMaterial, ContactSurface, ManualContactTracker, SystemView,
//! };
//! use sim_types::{BodyForces, BodyId, Pose, RigidBodyState, Stage, Twist};
//!
//! // A rubber ball resting 1 mm deep in a steel floor, sliding along +X.
//! let mut tracker = ManualContactTracker::new();
//! let floor = tracker.add_surface(ContactSurface::new(BodyId::GROUND, ContactMaterial::steel()));
//! let ball = tracker.add_surface(ContactSurface::new(BodyId::new(1), ContactMaterial::rubber()));
//! tracker.set_contacts([CircularPointContact::new(
//!     ContactId::new(0), floor, ball, 0.1, 1e-3, Point3::origin(), Vector3::z_axis(),
//! )
//! .into()])
//! .unwrap();
//!
//! let bodies = BodySet::new().with_body(
//!     BodyId::new(1),
//!     RigidBodyState::new(
//!         Pose::from_position(Point3::new(0.0, 0.0, 0.1)),
//!         Twist::new(Vector3::new(0.5, 0.0, 0.0), Vector3::zeros()),
//!     ),
//! );
//!
//! let contacts = CompliantContactSubsystem::new(CompliantContactConfig::default()).unwrap();
//! let view = SystemView::new(&tracker, &bodies);
//! let mut state = contacts.realize_topology();
//! let mut forces = BodyForces::new();
//! contacts.realize_to(Stage::Dynamics, &mut state, &view, &mut forces).unwrap();
//!
//! let on_ball = forces.get(BodyId::new(1));
//! assert!(on_ball.force.z > 0.0); // pushed out of the floor
//! assert!(on_ball.force.x < 0.0); // friction opposes the slide
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//!
//! - Headless training loops
//! - Energy audits of multibody models
//! - Analysis tools
//! - Other physics engines

#![doc(html_root_url = "https://docs.rs/sim-contact/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::suboptimal_flops,
    clippy::many_single_char_names
)]

mod cache;
mod config;
mod contact;
mod error;
mod force;
pub mod friction;
mod generator;
mod hertz;
mod kinematics;
mod material;
mod registry;
mod state;
mod subsystem;
mod tracker;

pub use cache::StagedCache;
pub use config::{CompliantContactConfig, DEFAULT_TRANSITION_VELOCITY};
pub use contact::{
    CircularPointContact, Contact, ContactId, ContactSnapshot, ContactSurfaceIndex, ContactTypeId,
    EllipticalPointContact, TriangleMeshContact,
};
pub use error::ContactError;
pub use force::{ContactDetail, ContactForce, ContactPatch};
pub use friction::{FrictionCurve, hollars, stribeck};
pub use generator::{ContactForceGenerator, DoNothing, GeneratorContext, Reject};
pub use hertz::{HertzCircular, SIGNIFICANT_SLIP};
pub use kinematics::{BodyKinematics, BodySet, SurfaceVelocity};
pub use material::{ContactMaterial, combine_friction};
pub use registry::GeneratorRegistry;
pub use state::ContactState;
pub use subsystem::{CompliantContactSubsystem, SystemView};
pub use tracker::{ContactSurface, ContactTracker, ManualContactTracker};

// Re-export commonly used types from sim-types
pub use sim_types::{BodyForces, BodyId, Pose, RigidBodyState, SpatialForce, Stage, Twist};

/// Result type for contact operations.
pub type Result<T> = std::result::Result<T, ContactError>;
