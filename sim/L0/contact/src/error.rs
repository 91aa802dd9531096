//! Error types for contact force evaluation.
//!
//! Every variant here is a contract violation: the caller asked for
//! something that cannot be answered (stage too low, bad configuration,
//! missing generator). Physically empty outcomes such as a separated
//! contact or a "yanking" contact are not errors and never show up here.

use sim_types::{SimError, Stage};
use thiserror::Error;

use crate::{ContactId, ContactSurfaceIndex, ContactTypeId};

/// Errors raised by the compliant contact subsystem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContactError {
    /// A lazily evaluated cache was requested before its inputs exist.
    #[error("{operation} requires stage {required} but the state is only at {current}")]
    StageViolation {
        /// The cache or query that was requested.
        operation: &'static str,
        /// Minimum stage the cache needs.
        required: Stage,
        /// Stage the state had reached.
        current: Stage,
    },

    /// The force cache was not evaluated for the current velocities and
    /// configuration.
    #[error("contact forces have not been evaluated for the current state")]
    ForcesNotEvaluated,

    /// Friction transition velocity must be positive and finite.
    #[error("friction transition velocity {0} is illegal (must be positive and finite)")]
    InvalidTransitionVelocity(f64),

    /// Dissipated energy is a running total and can't go below zero.
    #[error("dissipated energy must be nonnegative but an attempt was made to set it to {0}")]
    NegativeDissipatedEnergy(f64),

    /// Contact patch analysis is not available from this generator.
    #[error("contact patch analysis is not implemented by generator `{generator}`")]
    PatchNotImplemented {
        /// Name of the generator that was asked.
        generator: String,
    },

    /// Neither a generator for this contact type nor a default is registered.
    #[error("no force generator registered for {0} and no default generator")]
    NoGenerator(ContactTypeId),

    /// A generator was handed a contact geometry it does not handle.
    #[error("generator `{generator}` expected {expected} contact but got {actual}")]
    UnexpectedGeometry {
        /// Name of the generator.
        generator: String,
        /// Contact type the generator accepts.
        expected: ContactTypeId,
        /// Contact type it was given.
        actual: ContactTypeId,
    },

    /// The fallback generator refuses unrecognized contacts.
    #[error("contact {contact} of type {type_id} has no registered force generator")]
    GeneratorRejected {
        /// The offending contact.
        contact: ContactId,
        /// Its type tag.
        type_id: ContactTypeId,
    },

    /// Surface index unknown to the contact tracker.
    #[error("unknown contact surface {0}")]
    UnknownSurface(ContactSurfaceIndex),

    /// Two active contacts share an id.
    #[error("contact {0} appears more than once in the active contact snapshot")]
    DuplicateContact(ContactId),

    /// Contact id not present in the active snapshot.
    #[error("contact {0} is not in the active contact snapshot")]
    UnknownContact(ContactId),

    /// The state's cache slots were allocated for a different generator set.
    #[error(
        "contact state was realized for topology {state} but the subsystem is at topology {subsystem}; realize topology again"
    )]
    StaleTopology {
        /// Topology version recorded in the state.
        state: u64,
        /// Current topology version of the subsystem.
        subsystem: u64,
    },

    /// Material parameters are not physically meaningful.
    #[error("invalid contact material: {reason}")]
    InvalidMaterial {
        /// What is wrong with the material.
        reason: String,
    },

    /// Error from the shared simulation types (e.g. unknown body).
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl ContactError {
    /// Create an invalid material error.
    #[must_use]
    pub fn invalid_material(reason: impl Into<String>) -> Self {
        Self::InvalidMaterial {
            reason: reason.into(),
        }
    }

    /// Create a patch-not-implemented error for the named generator.
    #[must_use]
    pub fn patch_not_implemented(generator: impl Into<String>) -> Self {
        Self::PatchNotImplemented {
            generator: generator.into(),
        }
    }

    /// Check if this is a stage ordering error.
    #[must_use]
    pub fn is_stage_violation(&self) -> bool {
        matches!(self, Self::StageViolation { .. })
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransitionVelocity(_) | Self::InvalidMaterial { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContactError::StageViolation {
            operation: "force cache",
            required: Stage::Velocity,
            current: Stage::Position,
        };
        assert!(err.to_string().contains("Velocity"));

        let err = ContactError::InvalidTransitionVelocity(-1.0);
        assert!(err.to_string().contains("-1"));

        let err = ContactError::NoGenerator(ContactTypeId::CIRCULAR_POINT);
        assert!(err.to_string().contains("CircularPoint"));
    }

    #[test]
    fn test_error_predicates() {
        let err = ContactError::StageViolation {
            operation: "potential energy",
            required: Stage::Position,
            current: Stage::Time,
        };
        assert!(err.is_stage_violation());
        assert!(!err.is_config_error());

        assert!(ContactError::InvalidTransitionVelocity(0.0).is_config_error());
        assert!(ContactError::invalid_material("negative stiffness").is_config_error());

        let wrapped: ContactError = SimError::InvalidBodyId(3).into();
        assert!(!wrapped.is_config_error());
        assert!(!wrapped.is_stage_violation());
        assert!(wrapped.to_string().contains('3'));
    }
}
