//! Interpolation of orientation axes and translations for move animation.
//!
//! Antipodal inputs have no unique great-circle path in 2D; `slerp_eps`
//! rotates counter-clockwise in that case.

use nalgebra::{Rotation2, Vector2};

use crate::cfg::SLERP_EPS;

/// Spherical interpolation of two unit vectors by angle, with the default
/// degeneracy threshold.
#[inline]
pub fn slerp(a: Vector2<f64>, b: Vector2<f64>, t: f64) -> Vector2<f64> {
    slerp_eps(a, b, t, SLERP_EPS)
}

/// Spherical interpolation with an explicit threshold for the antipodal and
/// coincident branches.
pub fn slerp_eps(a: Vector2<f64>, b: Vector2<f64>, t: f64, eps: f64) -> Vector2<f64> {
    let dot = a.dot(&b);
    if (dot + 1.0).abs() < eps {
        return Rotation2::new(std::f64::consts::PI * t) * a;
    }
    if (dot - 1.0).abs() < eps {
        return b;
    }
    let theta = dot.clamp(-1.0, 1.0).acos();
    let s = theta.sin();
    (a * ((1.0 - t) * theta).sin() + b * (t * theta).sin()) / s
}

#[inline]
pub fn lerp(a: Vector2<f64>, b: Vector2<f64>, t: f64) -> Vector2<f64> {
    a + (b - a) * t
}
