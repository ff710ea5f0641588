//! Pairwise inverse-square repulsion between charged vertices.
//!
//! Every unordered pair of charges is one term:
//!
//! ```text
//! E = k_C qₐ q_b / r²,    r = |xₐ - x_b|
//! ∂E/∂xₐ = -2 k_C qₐ q_b (xₐ - x_b) / r⁴ = -∂E/∂x_b
//! ```
//!
//! Pairs closer than [`MIN_SEPARATION`] or farther than the cutoff contribute
//! nothing. The pair list is quadratic in the number of charges and is built
//! once, at construction.

use super::{accumulate, TermEnergy, TermSet};
use crate::embedding::Embedding;
use crate::error::{Result, TensileError};

/// Pairs closer than this are treated as coincident and skipped.
pub const MIN_SEPARATION: f64 = 1e-6;

/// Point charges attached to vertices.
#[derive(Debug, Clone)]
pub struct Charges {
    vertices: Vec<usize>,
    magnitudes: Vec<f64>,
    // Parallel arrays: pair `k` joins charges `pairs[k]`, sitting on `pair_vertices[k]`.
    pairs: Vec<[usize; 2]>,
    pair_vertices: Vec<[usize; 2]>,
    coulomb: f64,
    cutoff: f64,
}

impl Charges {
    /// Create charges `magnitudes[i]` on `vertices[i]`.
    ///
    /// The Coulomb constant defaults to `1.0` and the cutoff to infinity.
    ///
    /// # Errors
    ///
    /// Fails with [`TensileError::DimensionMismatch`] if the two lists differ in
    /// length.
    pub fn new(vertices: Vec<usize>, magnitudes: Vec<f64>) -> Result<Self> {
        if vertices.len() != magnitudes.len() {
            return Err(TensileError::mismatch(vertices.len(), magnitudes.len()));
        }
        Ok(Self::build(vertices, magnitudes))
    }

    /// Create charges of equal magnitude `q` on `vertices`.
    pub fn uniform(vertices: Vec<usize>, q: f64) -> Self {
        let magnitudes = vec![q; vertices.len()];
        Self::build(vertices, magnitudes)
    }

    fn build(vertices: Vec<usize>, magnitudes: Vec<f64>) -> Self {
        let n = vertices.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push([a, b]);
            }
        }
        let pair_vertices = pairs.iter().map(|&[a, b]| [vertices[a], vertices[b]]).collect();

        Self {
            vertices,
            magnitudes,
            pairs,
            pair_vertices,
            coulomb: 1.0,
            cutoff: f64::INFINITY,
        }
    }

    /// Set the Coulomb constant `k_C`.
    pub fn with_coulomb_constant(mut self, coulomb: f64) -> Self {
        self.coulomb = coulomb;
        self
    }

    /// Ignore pairs farther apart than `cutoff`.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Number of charges.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if there are no charges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of interacting pairs, `n (n - 1) / 2`.
    #[inline]
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// Charged vertices.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Charge magnitudes, parallel to [`vertices`](Self::vertices).
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// The Coulomb constant.
    pub fn coulomb_constant(&self) -> f64 {
        self.coulomb
    }

    /// The interaction cutoff.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    fn strength(&self, k: usize) -> f64 {
        let [a, b] = self.pairs[k];
        self.coulomb * self.magnitudes[a] * self.magnitudes[b]
    }

    #[inline]
    fn interacts(&self, r: f64) -> bool {
        r >= MIN_SEPARATION && r <= self.cutoff
    }
}

/// Collect `(vertex, magnitude)` pairs.
impl FromIterator<(usize, f64)> for Charges {
    fn from_iter<It: IntoIterator<Item = (usize, f64)>>(iter: It) -> Self {
        let (vertices, magnitudes) = iter.into_iter().unzip();
        Self::build(vertices, magnitudes)
    }
}

impl TermSet for Charges {
    #[inline]
    fn term_count(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    fn term_vertices(&self, k: usize) -> &[usize] {
        &self.pair_vertices[k]
    }
}

impl<const D: usize> TermEnergy<D> for Charges {
    fn term_value(&self, k: usize, emb: &Embedding<D>) -> f64 {
        let [i, j] = self.pair_vertices[k];
        let r2 = emb.distance2(i, j);
        if !self.interacts(r2.sqrt()) {
            return 0.0;
        }
        self.strength(k) / r2
    }

    fn term_grad_accumulate(&self, k: usize, emb: &Embedding<D>, grad: &mut [f64]) {
        let [i, j] = self.pair_vertices[k];
        let delta = emb.position(i) - emb.position(j);
        let r2 = delta.norm_squared();
        if !self.interacts(r2.sqrt()) {
            return;
        }

        let g = delta * (-2.0 * self.strength(k) / (r2 * r2));
        accumulate(grad, i, &g);
        accumulate(grad, j, &(-g));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedding3;
    use crate::energy::{Energy, Objective};
    use nalgebra::Vector3;

    #[test]
    fn test_pairs_enumerated_once() {
        let charges = Charges::uniform(vec![3, 5, 7, 9], 1.0);
        assert_eq!(charges.len(), 4);
        assert_eq!(charges.num_pairs(), 6);
        assert_eq!(charges.term_vertices(0), &[3, 5]);
        assert_eq!(charges.term_vertices(5), &[7, 9]);
    }

    #[test]
    fn test_collect_from_pairs() {
        let charges: Charges = vec![(4, 1.0), (2, -0.5)].into_iter().collect();
        assert_eq!(charges.vertices(), &[4, 2]);
        assert_eq!(charges.magnitudes(), &[1.0, -0.5]);
        assert_eq!(charges.num_pairs(), 1);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        assert!(Charges::new(vec![0, 1], vec![1.0]).is_err());
    }

    #[test]
    fn test_inverse_square_value() {
        let emb = Embedding3::from_points(&[Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)]);
        let charges = Charges::uniform(vec![0, 1], 1.0);
        assert_eq!(charges.term_value(0, &emb), 0.25);

        let scaled = Charges::new(vec![0, 1], vec![2.0, 3.0])
            .unwrap()
            .with_coulomb_constant(0.5);
        assert_eq!(scaled.term_value(0, &emb), 0.75);
    }

    #[test]
    fn test_repulsive_gradient() {
        let emb = Embedding3::from_points(&[Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)]);
        let charges = Charges::uniform(vec![0, 1], 1.0);

        let mut grad = vec![0.0; 6];
        charges.term_grad_accumulate(0, &emb, &mut grad);

        // -2 (x0 - x1) / r⁴ = -2 (-2) / 16
        assert_eq!(grad, vec![0.25, 0.0, 0.0, -0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_cutoff_and_coincident_pairs_are_skipped() {
        let emb = Embedding3::from_points(&[
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(5.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        ]);
        let energy = Energy::new(Charges::uniform(vec![0, 1, 2], 1.0).with_cutoff(3.0));

        assert_eq!(energy.value(&emb), 0.0);

        let mut grad = vec![1.0; 9];
        energy.gradient(&emb, &mut grad);
        assert!(grad.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_gradient_matches_central_difference() {
        let emb = Embedding3::from_points(&[
            Vector3::new(0.0, 0.1, -0.2),
            Vector3::new(1.2, -0.4, 0.3),
            Vector3::new(0.3, 0.9, 0.8),
            Vector3::new(-0.6, 0.2, 1.1),
        ]);
        let energy = Energy::new(Charges::new(vec![0, 1, 2, 3], vec![1.0, 0.5, 2.0, 1.5]).unwrap());

        let mut grad = vec![0.0; 12];
        energy.gradient(&emb, &mut grad);

        let h = 1e-6;
        for c in 0..12 {
            let mut plus = emb.clone();
            plus.as_mut_slice()[c] += h;
            let mut minus = emb.clone();
            minus.as_mut_slice()[c] -= h;
            let numeric = (energy.value(&plus) - energy.value(&minus)) / (2.0 * h);

            assert!(
                (grad[c] - numeric).abs() <= 1e-4 * numeric.abs() + 1e-6,
                "component {}: analytic {} vs numeric {}",
                c,
                grad[c],
                numeric
            );
        }
    }
}
