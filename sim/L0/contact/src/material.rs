//! Surface material parameters.
//!
//! Each contact surface carries one [`ContactMaterial`]. When two surfaces
//! touch, the force generator combines the two materials; how it combines
//! them is part of the contact model (see [`crate::HertzCircular`]).

use crate::{ContactError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elastic, dissipative and frictional properties of a contact surface.
///
/// # Units
///
/// - `stiffness`: Young's-modulus-like plane-strain stiffness (Pa). The
///   Hertz model combines materials through `stiffness^(2/3)`, which is
///   computed once here.
/// - `dissipation`: Hunt–Crossley coefficient (s/m).
/// - friction coefficients: dimensionless; the viscous one multiplies slip
///   speed (s/m).
///
/// # Example
///
/// ```
/// use sim_contact::ContactMaterial;
///
/// let rubber = ContactMaterial::rubber();
/// assert!(rubber.static_friction() >= rubber.dynamic_friction());
///
/// let custom = ContactMaterial::frictionless(1e6, 0.5).with_friction(0.9, 0.7, 0.0);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "MaterialRecord", into = "MaterialRecord")
)]
pub struct ContactMaterial {
    stiffness: f64,
    stiffness23: f64,
    dissipation: f64,
    static_friction: f64,
    dynamic_friction: f64,
    viscous_friction: f64,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self::new(1e6, 0.5, 0.5, 0.4, 0.0)
    }
}

impl ContactMaterial {
    /// Create a material from all five parameters.
    #[must_use]
    pub fn new(
        stiffness: f64,
        dissipation: f64,
        static_friction: f64,
        dynamic_friction: f64,
        viscous_friction: f64,
    ) -> Self {
        Self {
            stiffness,
            stiffness23: stiffness.powf(2.0 / 3.0),
            dissipation,
            static_friction,
            dynamic_friction,
            viscous_friction,
        }
    }

    /// A material with no friction at all.
    #[must_use]
    pub fn frictionless(stiffness: f64, dissipation: f64) -> Self {
        Self::new(stiffness, dissipation, 0.0, 0.0, 0.0)
    }

    /// Soft rubber.
    #[must_use]
    pub fn rubber() -> Self {
        Self::new(1e7, 0.5, 0.9, 0.8, 0.0)
    }

    /// Structural steel.
    #[must_use]
    pub fn steel() -> Self {
        Self::new(2e11, 0.01, 0.74, 0.57, 0.0)
    }

    /// Nylon.
    #[must_use]
    pub fn nylon() -> Self {
        Self::new(2.5e9, 0.1, 0.4, 0.3, 0.0)
    }

    /// Ice (very low friction).
    #[must_use]
    pub fn ice() -> Self {
        Self::new(9e9, 0.05, 0.1, 0.03, 0.0)
    }

    /// Replace the three friction coefficients.
    #[must_use]
    pub fn with_friction(mut self, static_: f64, dynamic: f64, viscous: f64) -> Self {
        self.static_friction = static_;
        self.dynamic_friction = dynamic;
        self.viscous_friction = viscous;
        self
    }

    /// Replace the dissipation coefficient.
    #[must_use]
    pub fn with_dissipation(mut self, dissipation: f64) -> Self {
        self.dissipation = dissipation;
        self
    }

    /// Replace the stiffness (keeps the 2/3 power in sync).
    pub fn set_stiffness(&mut self, stiffness: f64) {
        self.stiffness = stiffness;
        self.stiffness23 = stiffness.powf(2.0 / 3.0);
    }

    /// Stiffness (Pa).
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// `stiffness^(2/3)`, the quantity the Hertz model combines.
    #[must_use]
    pub fn stiffness23(&self) -> f64 {
        self.stiffness23
    }

    /// Hunt–Crossley dissipation coefficient (s/m).
    #[must_use]
    pub fn dissipation(&self) -> f64 {
        self.dissipation
    }

    /// Static friction coefficient.
    #[must_use]
    pub fn static_friction(&self) -> f64 {
        self.static_friction
    }

    /// Dynamic (sliding) friction coefficient.
    #[must_use]
    pub fn dynamic_friction(&self) -> f64 {
        self.dynamic_friction
    }

    /// Viscous friction coefficient (s/m).
    #[must_use]
    pub fn viscous_friction(&self) -> f64 {
        self.viscous_friction
    }

    /// Validate the parameters are physically reasonable.
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.stiffness,
            self.dissipation,
            self.static_friction,
            self.dynamic_friction,
            self.viscous_friction,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(ContactError::invalid_material("parameters must be finite"));
        }
        if self.stiffness <= 0.0 {
            return Err(ContactError::invalid_material("stiffness must be positive"));
        }
        if self.dissipation < 0.0 {
            return Err(ContactError::invalid_material(
                "dissipation cannot be negative",
            ));
        }
        if self.dynamic_friction < 0.0 || self.viscous_friction < 0.0 {
            return Err(ContactError::invalid_material(
                "friction coefficients cannot be negative",
            ));
        }
        if self.static_friction < self.dynamic_friction {
            return Err(ContactError::invalid_material(format!(
                "static friction {} is less than dynamic friction {}",
                self.static_friction, self.dynamic_friction
            )));
        }
        Ok(())
    }
}

/// Combine one friction coefficient from two surfaces: `2ab/(a+b)`.
///
/// Two frictionless surfaces give zero rather than `0/0`.
#[must_use]
pub fn combine_friction(a: f64, b: f64) -> f64 {
    let product = 2.0 * a * b;
    if product == 0.0 {
        0.0
    } else {
        product / (a + b)
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct MaterialRecord {
    stiffness: f64,
    dissipation: f64,
    static_friction: f64,
    dynamic_friction: f64,
    viscous_friction: f64,
}

#[cfg(feature = "serde")]
impl From<MaterialRecord> for ContactMaterial {
    fn from(r: MaterialRecord) -> Self {
        Self::new(
            r.stiffness,
            r.dissipation,
            r.static_friction,
            r.dynamic_friction,
            r.viscous_friction,
        )
    }
}

#[cfg(feature = "serde")]
impl From<ContactMaterial> for MaterialRecord {
    fn from(m: ContactMaterial) -> Self {
        Self {
            stiffness: m.stiffness,
            dissipation: m.dissipation,
            static_friction: m.static_friction,
            dynamic_friction: m.dynamic_friction,
            viscous_friction: m.viscous_friction,
        }
    }
}
