//! Rigid 2D transforms used for symmetries and fragment placement.
//!
//! - `Affine2`: `x ↦ M x + t` with explicit linear part and translation.
//! - The flat 9-element column-major layout only appears at the renderer
//!   boundary (`to_column_major`).

use nalgebra::{Matrix2, Matrix3, Rotation2, Vector2};

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    /// Build from the images of the basis axes plus a translation.
    #[inline]
    pub fn from_axes(x_axis: Vector2<f64>, y_axis: Vector2<f64>, t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::from_columns(&[x_axis, y_axis]),
            t,
        }
    }

    /// Counter-clockwise rotation by `angle` radians about `center`.
    pub fn rotation_about(center: Vector2<f64>, angle: f64) -> Self {
        let m = *Rotation2::new(angle).matrix();
        Self {
            m,
            t: center - m * center,
        }
    }

    /// Reflection across the line through `center` with direction `dir`.
    /// Returns `None` for a zero direction.
    pub fn reflection_about(center: Vector2<f64>, dir: Vector2<f64>) -> Option<Self> {
        let d = dir.try_normalize(1e-12)?;
        let m = d * d.transpose() * 2.0 - Matrix2::identity();
        Some(Self {
            m,
            t: center - m * center,
        })
    }

    #[inline]
    pub fn x_axis(&self) -> Vector2<f64> {
        self.m.column(0).into_owned()
    }

    #[inline]
    pub fn y_axis(&self) -> Vector2<f64> {
        self.m.column(1).into_owned()
    }

    #[inline]
    pub fn translation(&self) -> Vector2<f64> {
        self.t
    }

    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }

    /// `self ∘ rhs`: apply `rhs` first, then `self`.
    #[inline]
    pub fn compose(&self, rhs: &Affine2) -> Affine2 {
        Affine2 {
            m: self.m * rhs.m,
            t: self.m * rhs.t + self.t,
        }
    }

    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }

    #[inline]
    pub fn is_orientation_preserving(&self) -> bool {
        self.m.determinant() > 0.0
    }

    /// Linear part is orthonormal (`MᵀM ≈ I`, max-abs metric).
    pub fn is_rigid_eps(&self, eps: f64) -> bool {
        (self.m.transpose() * self.m - Matrix2::identity()).amax() <= eps
    }

    /// Homogeneous 3×3 form `[M t; 0 1]`.
    pub fn to_homogeneous(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.m[(0, 0)],
            self.m[(0, 1)],
            self.t.x,
            self.m[(1, 0)],
            self.m[(1, 1)],
            self.t.y,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Column-major homogeneous matrix, the layout shader uniforms expect.
    pub fn to_column_major(&self) -> [f32; 9] {
        let h = self.to_homogeneous();
        let mut out = [0.0f32; 9];
        for (dst, src) in out.iter_mut().zip(h.iter()) {
            *dst = *src as f32;
        }
        out
    }

    /// Largest absolute difference over the 9 homogeneous components.
    pub fn max_abs_diff(&self, other: &Affine2) -> f64 {
        (self.to_homogeneous() - other.to_homogeneous()).amax()
    }

    #[inline]
    pub fn approx_eq(&self, other: &Affine2, eps: f64) -> bool {
        self.max_abs_diff(other) < eps
    }
}

impl std::ops::Mul for Affine2 {
    type Output = Affine2;
    #[inline]
    fn mul(self, rhs: Affine2) -> Self::Output {
        self.compose(&rhs)
    }
}
