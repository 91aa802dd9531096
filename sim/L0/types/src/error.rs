//! Error types shared by the simulation crates.

use thiserror::Error;

/// Errors raised by the shared simulation types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A body ID that the kinematics provider does not know about.
    #[error("invalid body ID: {0}")]
    InvalidBodyId(u64),
}

impl SimError {
    /// Check if this is an unknown body error.
    #[must_use]
    pub fn is_invalid_body(&self) -> bool {
        matches!(self, Self::InvalidBodyId(_))
    }
}
