//! Embedding on the unit 3-sphere.
//!
//! Points live in R⁴ and are pulled back onto the sphere with
//! [`SphericalEmbedding::reproject`] after every unconstrained gradient step.
//! A 4×4 rotation is kept for display only: it never affects the energy, which
//! always reads the unrotated coordinates.

use std::ops::{Deref, DerefMut};

use nalgebra::{Matrix4, Point3, Vector4};

use super::Embedding;
use crate::error::{Result, TensileError};

/// Points pinned to the unit sphere S³ ⊂ R⁴, plus a display rotation.
#[derive(Debug, Clone)]
pub struct SphericalEmbedding {
    inner: Embedding<4>,
    rotation: Matrix4<f64>,
}

impl SphericalEmbedding {
    /// Create an embedding of `num_vertices` zero vectors.
    ///
    /// Positions must be set before use; [`reproject`](Self::reproject) leaves
    /// zero vectors untouched.
    pub fn new(num_vertices: usize) -> Self {
        Self::from_embedding(Embedding::new(num_vertices))
    }

    /// Wrap an existing four-dimensional embedding with an identity rotation.
    pub fn from_embedding(inner: Embedding<4>) -> Self {
        Self {
            inner,
            rotation: Matrix4::identity(),
        }
    }

    /// Unwrap into the plain embedding.
    pub fn into_inner(self) -> Embedding<4> {
        self.inner
    }

    /// Renormalize every position to unit length.
    pub fn reproject(&mut self) {
        for p in self.inner.as_mut_slice().chunks_exact_mut(4) {
            let norm = p.iter().map(|c| c * c).sum::<f64>().sqrt();
            if norm > f64::EPSILON {
                for c in p.iter_mut() {
                    *c /= norm;
                }
            }
        }
    }

    /// The current display rotation.
    #[inline]
    pub fn rotation(&self) -> &Matrix4<f64> {
        &self.rotation
    }

    /// Replace the display rotation.
    pub fn set_rotation(&mut self, rotation: Matrix4<f64>) {
        self.rotation = rotation;
    }

    /// Reset the display rotation to the identity.
    pub fn reset_rotation(&mut self) {
        self.rotation = Matrix4::identity();
    }

    /// Compose a rotation by `angle` radians in the plane spanned by axes `a`
    /// and `b` onto the display rotation.
    ///
    /// # Errors
    ///
    /// Fails if `a == b` or either axis is not in `0..4`.
    pub fn rotate_plane(&mut self, a: usize, b: usize, angle: f64) -> Result<()> {
        if a >= 4 || b >= 4 || a == b {
            return Err(TensileError::invalid_param(
                "plane",
                format!("({}, {})", a, b),
                "axes must be two distinct indices below 4",
            ));
        }

        let (s, c) = angle.sin_cos();
        let mut givens = Matrix4::identity();
        givens[(a, a)] = c;
        givens[(b, b)] = c;
        givens[(a, b)] = -s;
        givens[(b, a)] = s;

        self.rotation = givens * self.rotation;
        Ok(())
    }

    /// Position of vertex `i` after the display rotation.
    #[inline]
    pub fn display_position(&self, i: usize) -> Vector4<f64> {
        self.rotation * self.inner.position(i)
    }

    /// Stereographic projection of the rotated vertex `i` from the pole
    /// `w = 1` into R³.
    ///
    /// Returns `None` for a point at the pole.
    pub fn stereographic(&self, i: usize) -> Option<Point3<f64>> {
        let p = self.display_position(i);
        let denom = 1.0 - p.w;
        if denom.abs() < 1e-12 {
            return None;
        }
        Some(Point3::new(p.x / denom, p.y / denom, p.z / denom))
    }
}

impl Deref for SphericalEmbedding {
    type Target = Embedding<4>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SphericalEmbedding {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
