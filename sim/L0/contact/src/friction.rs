//! Friction coefficient curves.
//!
//! A compliant contact has no "sticking" constraint, so static friction is
//! modeled by letting the friction coefficient rise steeply from zero over
//! a small *transition velocity* `vt`. All curves here take slip speed as a
//! dimensionless multiple `v = |v_slip| / vt`, and the viscous coefficient
//! must be scaled to match (`uv · vt`).
//!
//! The default [`stribeck`] curve is a quintic spline in four segments with
//! continuous value and slope everywhere:
//!
//! ```text
//!  us     ***
//!        *    *                    *
//!        *     *              *____| slope = uv
//!        *      *        *
//!  ud    *       * * *
//!        *
//!   0  **
//!      |   |       |   |
//!    v=0   1       3   4
//! ```
//!
//! 1. `v ∈ [0, 1]`: stiction ramp from 0 to `us`
//! 2. `v ∈ (1, 3]`: Stribeck decay from `us` to `ud`
//! 3. `v ∈ (3, 4]`: blend in the viscous slope
//! 4. `v > 4`: `ud + uv·(v − 3)`, pure viscous sliding

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quintic S-curve from 0 at `x = 0` to 1 at `x = 1`.
///
/// `10x³ − 15x⁴ + 6x⁵`: first and second derivatives vanish at both ends.
#[must_use]
pub fn step5(x: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&x), "step5 argument {x} outside [0, 1]");
    let x3 = x * x * x;
    x3 * (10.0 + x * (6.0 * x - 15.0))
}

/// Quintic ramp from 0 to `y` over `x ∈ [0, 1]`.
///
/// Zero slope at `x = 0`, slope `yd` at `x = 1`, zero second derivative at
/// both ends.
#[must_use]
pub fn step5d(y: f64, yd: f64, x: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&x), "step5d argument {x} outside [0, 1]");
    let a = 6.0 * y - 3.0 * yd;
    let b = -15.0 * y + 7.0 * yd;
    let c = 10.0 * y - 4.0 * yd;
    let x3 = x * x * x;
    x3 * (c + x * (b + x * a))
}

/// Composite friction coefficient on the four-segment Stribeck spline.
///
/// `uv` and `v` must be dimensionless multiples of the transition velocity.
/// Scale the normal force by the result to get the friction force.
#[must_use]
pub fn stribeck(us: f64, ud: f64, uv: f64, v: f64) -> f64 {
    if v <= 1.0 {
        us * step5(v)
    } else if v <= 3.0 {
        us - (us - ud) * step5((v - 1.0) / 2.0)
    } else if v <= 4.0 {
        ud + step5d(uv, uv, v - 3.0)
    } else {
        ud + uv * (v - 3.0)
    }
}

/// Single-formula alternative to [`stribeck`].
///
/// `min(v, 1)·(ud + 2(us − ud)/(1 + v²)) + uv·v`. Cheaper, but its slope
/// jumps at `v = 1`, which upsets error-controlled integrators.
#[must_use]
pub fn hollars(us: f64, ud: f64, uv: f64, v: f64) -> f64 {
    v.min(1.0) * (ud + 2.0 * (us - ud) / (1.0 + v * v)) + uv * v
}

/// Which friction curve a generator evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrictionCurve {
    /// Four-segment C¹ quintic spline ([`stribeck`]).
    #[default]
    Stribeck,
    /// Rational curve with a slope discontinuity at the transition velocity
    /// ([`hollars`]).
    Hollars,
}

impl FrictionCurve {
    /// Evaluate the curve. `uv` and `v` are dimensionless, as for [`stribeck`].
    #[must_use]
    pub fn coefficient(self, us: f64, ud: f64, uv: f64, v: f64) -> f64 {
        match self {
            Self::Stribeck => stribeck(us, ud, uv, v),
            Self::Hollars => hollars(us, ud, uv, v),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const H: f64 = 1e-5;

    #[test]
    fn test_step5_endpoints() {
        assert_eq!(step5(0.0), 0.0);
        assert_relative_eq!(step5(1.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(step5(0.5), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_step5_flat_at_ends() {
        let d0 = (step5(H) - step5(0.0)) / H;
        let d1 = (step5(1.0) - step5(1.0 - H)) / H;
        assert!(d0.abs() < 1e-6, "slope at 0: {d0}");
        assert!(d1.abs() < 1e-6, "slope at 1: {d1}");
    }

    #[test]
    fn test_step5_monotone() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let y = step5(f64::from(i) / 100.0);
            assert!(y >= prev);
            prev = y;
        }
    }

    #[test]
    fn test_step5d_endpoints_and_slopes() {
        let (y, yd) = (2.0, 3.0);
        assert_eq!(step5d(y, yd, 0.0), 0.0);
        assert_relative_eq!(step5d(y, yd, 1.0), y, epsilon = 1e-12);

        let d0 = (step5d(y, yd, H) - step5d(y, yd, 0.0)) / H;
        let d1 = (step5d(y, yd, 1.0) - step5d(y, yd, 1.0 - H)) / H;
        assert!(d0.abs() < 1e-6);
        assert_relative_eq!(d1, yd, epsilon = 1e-3);
    }

    #[test]
    fn test_stribeck_segment_joints() {
        let (us, ud, uv) = (1.0, 0.5, 0.0);
        assert_relative_eq!(stribeck(us, ud, uv, 1.0 - 1e-9), 1.0, epsilon = 1e-6);
        assert_relative_eq!(stribeck(us, ud, uv, 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(stribeck(us, ud, uv, 1.0 + 1e-9), 1.0, epsilon = 1e-6);
        assert_relative_eq!(stribeck(us, ud, uv, 3.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(stribeck(us, ud, uv, 4.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(stribeck(us, ud, uv, 10.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_stribeck_viscous_slope_is_continuous() {
        let (us, ud, uv) = (0.8, 0.6, 0.2);
        for joint in [1.0, 3.0, 4.0] {
            let left = stribeck(us, ud, uv, joint - H);
            let mid = stribeck(us, ud, uv, joint);
            let right = stribeck(us, ud, uv, joint + H);
            assert_relative_eq!(left, mid, epsilon = 1e-4);
            assert_relative_eq!(right, mid, epsilon = 1e-4);
            let slope_left = (mid - left) / H;
            let slope_right = (right - mid) / H;
            assert_relative_eq!(slope_left, slope_right, epsilon = 1e-3);
        }
        // Pure sliding regime is linear with slope uv.
        let slope = stribeck(us, ud, uv, 8.0) - stribeck(us, ud, uv, 7.0);
        assert_relative_eq!(slope, uv, epsilon = 1e-12);
    }

    #[test]
    fn test_hollars_peaks_at_transition() {
        let (us, ud) = (1.0, 0.5);
        assert_relative_eq!(hollars(us, ud, 0.0, 1.0), us, epsilon = 1e-12);
        assert_eq!(hollars(us, ud, 0.0, 0.0), 0.0);
        // Decays toward ud far from the transition.
        assert!((hollars(us, ud, 0.0, 100.0) - ud).abs() < 1e-3);
    }

    #[test]
    fn test_curve_selection() {
        let v = 0.5;
        assert_eq!(
            FrictionCurve::Stribeck.coefficient(1.0, 0.5, 0.0, v),
            stribeck(1.0, 0.5, 0.0, v)
        );
        assert_eq!(
            FrictionCurve::Hollars.coefficient(1.0, 0.5, 0.0, v),
            hollars(1.0, 0.5, 0.0, v)
        );
        assert_eq!(FrictionCurve::default(), FrictionCurve::Stribeck);
    }
}
