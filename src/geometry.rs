//! Reference geometry for term builders.
//!
//! A [`Geometry`] pairs a [`Topology`] with a frozen set of reference
//! coordinates and a pluggable [`Metric`]. Builders use it to read rest lengths
//! and cell areas once, at construction time; the deforming embedding is never
//! consulted again.
//!
//! The distance and area queries are intrinsic *local* quantities: they are only
//! meaningful for topologically adjacent pairs (edges, quad diagonals, bend
//! pairs). A non-Euclidean metric may return arbitrary values for distant pairs.

use crate::embedding::Embedding;
use crate::error::{Result, TensileError};
use crate::mesh::Topology;

/// Local distance and area measure on the reference coordinates.
pub trait Metric {
    /// Distance between two nearby points.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Area of the parameter cell `du × dv` located at `coords`.
    fn local_area(&self, coords: &[f64], du: f64, dv: f64) -> f64;
}

/// Flat Euclidean metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }

    #[inline]
    fn local_area(&self, _coords: &[f64], du: f64, dv: f64) -> f64 {
        du * dv
    }
}

/// Topology plus reference coordinates under a metric.
#[derive(Debug, Clone)]
pub struct Geometry<'a, M: Metric = Euclidean> {
    topology: &'a Topology,
    coords: Vec<f64>,
    dim: usize,
    metric: M,
}

impl<'a> Geometry<'a, Euclidean> {
    /// Snapshot the current positions of `embedding` as flat Euclidean
    /// reference coordinates.
    ///
    /// # Errors
    ///
    /// Fails with [`TensileError::DimensionMismatch`] if the embedding does not
    /// have one position per topology vertex.
    pub fn euclidean<const D: usize>(topology: &'a Topology, embedding: &Embedding<D>) -> Result<Self> {
        Self::with_metric(topology, embedding.as_slice().to_vec(), D, Euclidean)
    }
}

impl<'a, M: Metric> Geometry<'a, M> {
    /// Create a geometry from flat reference coordinates (`dim` per vertex)
    /// and a custom metric.
    ///
    /// # Errors
    ///
    /// Fails if `dim` is zero or `coords` does not hold `dim` values per
    /// topology vertex.
    pub fn with_metric(topology: &'a Topology, coords: Vec<f64>, dim: usize, metric: M) -> Result<Self> {
        if dim == 0 {
            return Err(TensileError::invalid_param("dim", dim, "must be positive"));
        }
        let expected = dim * topology.num_vertices();
        if coords.len() != expected {
            return Err(TensileError::mismatch(expected, coords.len()));
        }
        Ok(Self {
            topology,
            coords,
            dim,
            metric,
        })
    }

    /// The underlying topology.
    #[inline]
    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    /// The metric.
    #[inline]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Coordinates per vertex.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Reference coordinates of vertex `i`.
    #[inline]
    pub fn coords(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    /// Intrinsic distance between adjacent vertices `i` and `j`.
    #[inline]
    pub fn local_distance(&self, i: usize, j: usize) -> f64 {
        self.metric.distance(self.coords(i), self.coords(j))
    }

    /// Area of the `du × dv` cell at vertex `i`.
    #[inline]
    pub fn local_area(&self, i: usize, du: f64, dv: f64) -> f64 {
        self.metric.local_area(self.coords(i), du, dv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    /// Uniformly scaled metric: lengths ×2, areas ×4.
    struct Doubled;

    impl Metric for Doubled {
        fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
            2.0 * Euclidean.distance(a, b)
        }

        fn local_area(&self, _coords: &[f64], du: f64, dv: f64) -> f64 {
            4.0 * du * dv
        }
    }

    #[test]
    fn test_euclidean_snapshot() {
        let (topology, mut emb) = fixtures::quad_grid(2, 1);
        let geometry = Geometry::euclidean(&topology, &emb).unwrap();

        assert_eq!(geometry.dim(), 3);
        assert_eq!(geometry.local_distance(0, 1), 1.0);
        assert!((geometry.local_distance(0, 4) - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(geometry.local_area(0, 0.5, 0.25), 0.125);

        // Later deformation does not leak into the snapshot
        emb.add_scaled_vector(&vec![1.0; emb.as_slice().len()], 3.0).unwrap();
        emb.set_position_at(1, &nalgebra::Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(geometry.local_distance(0, 1), 1.0);
    }

    #[test]
    fn test_custom_metric() {
        let (topology, emb) = fixtures::quad_grid(1, 1);
        let geometry = Geometry::with_metric(&topology, emb.as_slice().to_vec(), 3, Doubled).unwrap();

        assert_eq!(geometry.local_distance(0, 1), 2.0);
        assert_eq!(geometry.local_area(3, 1.0, 0.5), 2.0);
    }

    #[test]
    fn test_rejects_mismatched_coords() {
        let topology = fixtures::quad_grid_topology(1, 1);
        assert!(Geometry::with_metric(&topology, vec![0.0; 11], 3, Euclidean).is_err());
        assert!(Geometry::with_metric(&topology, vec![0.0; 12], 0, Euclidean).is_err());

        let short = crate::embedding::Embedding3::new(3);
        assert!(Geometry::euclidean(&topology, &short).is_err());
    }
}
