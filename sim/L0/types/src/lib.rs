//! Core value types shared by the simulation crates.
//!
//! - [`BodyId`], [`Pose`], [`Twist`], [`RigidBodyState`] - where bodies are and how they move
//! - [`SpatialForce`] - force/torque pairs and the lever-arm shift between reference points
//! - [`BodyForces`] - the system-wide accumulator force subsystems add into
//! - [`Stage`] - ordered realization stages of a simulation state
//!
//! These types are **pure data** with a little rigid-body algebra. Force
//! models, caches and integration live in the crates that use them.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in
//! headless training loops, analysis tools or other engines.
//!
//! # Coordinate System
//!
//! Right-handed, Z up. All spatial quantities handed between crates are
//! expressed in the ground frame.

#![doc(html_root_url = "https://docs.rs/sim-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod dynamics;
mod error;
mod spatial;
mod stage;

pub use body::{BodyId, Pose, RigidBodyState, Twist};
pub use dynamics::BodyForces;
pub use error::SimError;
pub use spatial::SpatialForce;
pub use stage::Stage;

// Re-export math types for convenience
pub use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
