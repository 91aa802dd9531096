//! Subsystem-wide contact settings.

use crate::{ContactError, FrictionCurve, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default friction transition velocity (m/s).
pub const DEFAULT_TRANSITION_VELOCITY: f64 = 0.01;

/// Settings shared by every generator in one subsystem.
///
/// # Example
///
/// ```
/// use sim_contact::{CompliantContactConfig, FrictionCurve};
///
/// let config = CompliantContactConfig::default()
///     .with_transition_velocity(0.05)
///     .with_friction_curve(FrictionCurve::Hollars);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompliantContactConfig {
    /// Slip speed below which friction ramps down toward zero (m/s).
    ///
    /// Smaller values imitate true stiction more closely but make the
    /// equations stiffer.
    pub transition_velocity: f64,
    /// Friction curve evaluated by the built-in generators.
    pub friction_curve: FrictionCurve,
}

impl Default for CompliantContactConfig {
    fn default() -> Self {
        Self {
            transition_velocity: DEFAULT_TRANSITION_VELOCITY,
            friction_curve: FrictionCurve::default(),
        }
    }
}

impl CompliantContactConfig {
    /// Settings for fast-moving, loosely resolved scenes.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            transition_velocity: 0.1,
            friction_curve: FrictionCurve::Hollars,
        }
    }

    /// Settings that hold resting contacts close to true stiction.
    #[must_use]
    pub fn precise() -> Self {
        Self {
            transition_velocity: 1e-3,
            friction_curve: FrictionCurve::Stribeck,
        }
    }

    /// Set the transition velocity.
    #[must_use]
    pub fn with_transition_velocity(mut self, transition_velocity: f64) -> Self {
        self.transition_velocity = transition_velocity;
        self
    }

    /// Set the friction curve.
    #[must_use]
    pub fn with_friction_curve(mut self, friction_curve: FrictionCurve) -> Self {
        self.friction_curve = friction_curve;
        self
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        check_transition_velocity(self.transition_velocity)
    }
}

pub(crate) fn check_transition_velocity(vt: f64) -> Result<()> {
    if vt > 0.0 && vt.is_finite() {
        Ok(())
    } else {
        Err(ContactError::InvalidTransitionVelocity(vt))
    }
}
