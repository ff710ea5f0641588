//! Linear springs.
//!
//! ```text
//! E = ½ k (L - rest)²,    L = |xᵢ - xⱼ|
//! ∂E/∂xᵢ = k (1 - rest / L) (xᵢ - xⱼ) = -∂E/∂xⱼ
//! ```
//!
//! A spring of zero current length has no defined direction; it keeps its value
//! `½ k rest²` but contributes no gradient.

use super::{accumulate, TermEnergy, TermSet};
use crate::embedding::Embedding;

/// A spring between two vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// The two endpoints.
    pub vertices: [usize; 2],
    /// Stiffness `k`.
    pub stiffness: f64,
    /// Rest length.
    pub rest: f64,
}

impl Spring {
    /// Create a spring between `i` and `j`.
    pub fn new(i: usize, j: usize, stiffness: f64, rest: f64) -> Self {
        Self {
            vertices: [i, j],
            stiffness,
            rest,
        }
    }

    /// Energy at current length `length`.
    #[inline]
    pub fn energy_at(&self, length: f64) -> f64 {
        let stretch = length - self.rest;
        0.5 * self.stiffness * stretch * stretch
    }
}

/// A list of springs, one term each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Springs {
    springs: Vec<Spring>,
}

impl Springs {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spring.
    pub fn push(&mut self, spring: Spring) {
        self.springs.push(spring);
    }

    /// Number of springs.
    #[inline]
    pub fn len(&self) -> usize {
        self.springs.len()
    }

    /// True if there are no springs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// The springs as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Spring] {
        &self.springs
    }

    /// Iterate over the springs.
    pub fn iter(&self) -> std::slice::Iter<'_, Spring> {
        self.springs.iter()
    }
}

impl From<Vec<Spring>> for Springs {
    fn from(springs: Vec<Spring>) -> Self {
        Self { springs }
    }
}

impl FromIterator<Spring> for Springs {
    fn from_iter<It: IntoIterator<Item = Spring>>(iter: It) -> Self {
        Self {
            springs: iter.into_iter().collect(),
        }
    }
}

impl Extend<Spring> for Springs {
    fn extend<It: IntoIterator<Item = Spring>>(&mut self, iter: It) {
        self.springs.extend(iter);
    }
}

impl TermSet for Springs {
    #[inline]
    fn term_count(&self) -> usize {
        self.springs.len()
    }

    #[inline]
    fn term_vertices(&self, k: usize) -> &[usize] {
        &self.springs[k].vertices
    }
}

impl<const D: usize> TermEnergy<D> for Springs {
    #[inline]
    fn term_value(&self, k: usize, emb: &Embedding<D>) -> f64 {
        let spring = &self.springs[k];
        let [i, j] = spring.vertices;
        spring.energy_at(emb.distance(i, j))
    }

    fn term_grad_accumulate(&self, k: usize, emb: &Embedding<D>, grad: &mut [f64]) {
        let spring = &self.springs[k];
        let [i, j] = spring.vertices;

        let delta = emb.position(i) - emb.position(j);
        let length = delta.norm();
        if length == 0.0 {
            return;
        }

        let g = delta * (spring.stiffness * (1.0 - spring.rest / length));
        accumulate(grad, i, &g);
        accumulate(grad, j, &(-g));
    }
}
