//! Vertex positions.
//!
//! An [`Embedding`] stores `D` coordinates per vertex in one flat buffer. The
//! external integrator steps the whole buffer at once with
//! [`Embedding::add_scaled_vector`]; the energy terms read individual vertices with
//! [`Embedding::position`], which returns a stack-allocated `SVector` so that
//! no hot-path accessor touches the heap.
//!
//! `D = 3` is the ordinary Euclidean case. `D = 4` is used by
//! [`SphericalEmbedding`], which keeps points on the unit 3-sphere.
//!
//! # Example
//!
//! ```
//! use tensile::embedding::Embedding;
//! use nalgebra::Vector3;
//!
//! let mut emb = Embedding::from_points(&[
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(3.0, 4.0, 0.0),
//! ]);
//! assert_eq!(emb.distance(0, 1), 5.0);
//!
//! // Take a step along a flat direction buffer
//! let step = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
//! emb.add_scaled_vector(&step, 0.5).unwrap();
//! assert_eq!(emb.position(0), Vector3::new(0.5, 0.0, 0.0));
//! ```

mod spherical;

pub use spherical::SphericalEmbedding;

use nalgebra::SVector;

use crate::error::{Result, TensileError};

/// Positions of `N` vertices in `D` dimensions, stored as a flat buffer of
/// length `D * N`.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding<const D: usize> {
    coords: Vec<f64>,
}

/// A three-dimensional Euclidean embedding.
pub type Embedding3 = Embedding<3>;

impl<const D: usize> Embedding<D> {
    /// Create an embedding with `num_vertices` vertices at the origin.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            coords: vec![0.0; D * num_vertices],
        }
    }

    /// Create an embedding from a list of points.
    pub fn from_points(points: &[SVector<f64, D>]) -> Self {
        let mut coords = Vec::with_capacity(D * points.len());
        for p in points {
            coords.extend_from_slice(p.as_slice());
        }
        Self { coords }
    }

    /// Create an embedding that takes ownership of a flat coordinate buffer.
    ///
    /// # Errors
    ///
    /// Fails if the buffer length is not a multiple of `D`.
    pub fn from_flat(coords: Vec<f64>) -> Result<Self> {
        if coords.len() % D != 0 {
            return Err(TensileError::invalid_param(
                "coords.len()",
                coords.len(),
                "must be a multiple of the embedding dimension",
            ));
        }
        Ok(Self { coords })
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coords.len() / D
    }

    /// True if the embedding holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates per vertex.
    #[inline]
    pub fn dim(&self) -> usize {
        D
    }

    /// The flat coordinate buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// The flat coordinate buffer, mutably. Constraints operate on this.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.coords
    }

    /// Position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> SVector<f64, D> {
        SVector::from_column_slice(&self.coords[i * D..(i + 1) * D])
    }

    /// Iterate over all positions.
    pub fn positions(&self) -> impl Iterator<Item = SVector<f64, D>> + '_ {
        self.coords.chunks_exact(D).map(SVector::from_column_slice)
    }

    /// Overwrite the position of vertex `i`.
    #[inline]
    pub fn set_position_at(&mut self, i: usize, p: &SVector<f64, D>) {
        self.coords[i * D..(i + 1) * D].copy_from_slice(p.as_slice());
    }

    /// Overwrite all positions from a flat buffer.
    ///
    /// # Errors
    ///
    /// Fails with [`TensileError::DimensionMismatch`] unless `coords` has exactly
    /// `D * num_vertices()` entries.
    pub fn set_positions(&mut self, coords: &[f64]) -> Result<()> {
        if coords.len() != self.coords.len() {
            return Err(TensileError::mismatch(self.coords.len(), coords.len()));
        }
        self.coords.copy_from_slice(coords);
        Ok(())
    }

    /// Overwrite all positions from a list of points.
    ///
    /// # Errors
    ///
    /// Fails with [`TensileError::DimensionMismatch`] unless there is exactly one
    /// point per vertex.
    pub fn set_points(&mut self, points: &[SVector<f64, D>]) -> Result<()> {
        if points.len() != self.num_vertices() {
            return Err(TensileError::mismatch(self.num_vertices(), points.len()));
        }
        for (i, p) in points.iter().enumerate() {
            self.set_position_at(i, p);
        }
        Ok(())
    }

    /// Add `s * v` to the position of vertex `i`.
    #[inline]
    pub fn add_scaled_vector_at(&mut self, i: usize, v: &SVector<f64, D>, s: f64) {
        for (c, x) in self.coords[i * D..(i + 1) * D].iter_mut().zip(v.iter()) {
            *c += s * x;
        }
    }

    /// Add `scale * v` to the whole buffer, where `v` is laid out like the
    /// embedding (e.g. a gradient).
    ///
    /// # Errors
    ///
    /// Fails with [`TensileError::DimensionMismatch`] if the lengths differ.
    pub fn add_scaled_vector(&mut self, v: &[f64], scale: f64) -> Result<()> {
        if v.len() != self.coords.len() {
            return Err(TensileError::mismatch(self.coords.len(), v.len()));
        }
        for (c, x) in self.coords.iter_mut().zip(v) {
            *c += scale * x;
        }
        Ok(())
    }

    /// Vector from vertex `i` to vertex `j`.
    #[inline]
    pub fn difference(&self, i: usize, j: usize) -> SVector<f64, D> {
        self.position(j) - self.position(i)
    }

    /// Squared distance between vertices `i` and `j`.
    #[inline]
    pub fn distance2(&self, i: usize, j: usize) -> f64 {
        let a = &self.coords[i * D..(i + 1) * D];
        let b = &self.coords[j * D..(j + 1) * D];
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    /// Distance between vertices `i` and `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance2(i, j).sqrt()
    }
}
