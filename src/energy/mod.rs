//! Term-decomposed energy functionals.
//!
//! Every energy in this crate is a sum of independent *terms*, each touching a
//! small fixed set of vertices:
//!
//! ```text
//! E(x) = Σₖ Eₖ(x_{vₖ₁}, …, x_{vₖₘ})
//! ```
//!
//! A term set only has to say how many terms it has, which vertices each term
//! reads ([`TermSet`]), and how to evaluate and differentiate a single term
//! ([`TermEnergy`]). Wrapping it in an [`Energy`] derives the rest:
//!
//! - [`value`](Objective::value) and [`gradient`](Objective::gradient) over all terms
//! - [`local_value`](Objective::local_value): only the terms touching one vertex,
//!   through a cached vertex → terms index
//! - [`stochastic_gradient`](Objective::stochastic_gradient): an unbiased estimate
//!   from a uniform random subset of terms
//!
//! [`TotalEnergy`] combines several energies with weights.
//!
//! # Gradient buffers
//!
//! Gradients are written into caller-owned flat buffers laid out like the
//! [`Embedding`] (`D` values per vertex). [`TermEnergy::term_grad_accumulate`]
//! only ever adds into the buffer; [`Objective::gradient`] and
//! [`Objective::stochastic_gradient`] zero it first. No method resizes it.
//!
//! # Example
//!
//! ```
//! use tensile::prelude::*;
//! use nalgebra::Vector3;
//!
//! let emb = Embedding3::from_points(&[
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(2.0, 0.0, 0.0),
//! ]);
//! let energy = Energy::new(Springs::from(vec![Spring::new(0, 1, 1.0, 1.0)]));
//!
//! assert_eq!(energy.value(&emb), 0.5);
//!
//! let mut grad = vec![0.0; 6];
//! energy.gradient(&emb, &mut grad);
//! assert_eq!(grad, vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
//! ```

mod charge;
mod hinge;
mod spring;
mod total;

pub use charge::{Charges, MIN_SEPARATION};
pub use hinge::{Hinge, Hinges, DEGENERATE_NORMAL};
pub use spring::{Spring, Springs};
pub use total::TotalEnergy;

use std::cell::{OnceCell, RefCell};

use nalgebra::SVector;

use crate::embedding::Embedding;

/// A list of energy terms and the vertices each one reads.
pub trait TermSet {
    /// Number of terms.
    fn term_count(&self) -> usize;

    /// Vertices read by term `k`.
    fn term_vertices(&self, k: usize) -> &[usize];
}

/// Evaluation of individual terms on a `D`-dimensional embedding.
pub trait TermEnergy<const D: usize>: TermSet {
    /// Value of term `k`.
    fn term_value(&self, k: usize, emb: &Embedding<D>) -> f64;

    /// Add the gradient of term `k` into `grad`.
    ///
    /// Implementations must only add to the entries of the term's vertices.
    fn term_grad_accumulate(&self, k: usize, emb: &Embedding<D>, grad: &mut [f64]);
}

/// A scalar functional with a gradient, as seen by an integrator.
pub trait Objective<const D: usize> {
    /// Total value.
    fn value(&self, emb: &Embedding<D>) -> f64;

    /// Sum of the contributions that involve vertex `v`.
    fn local_value(&self, emb: &Embedding<D>, v: usize) -> f64;

    /// Write the full gradient into `grad`, overwriting its contents.
    fn gradient(&self, emb: &Embedding<D>, grad: &mut [f64]);

    /// Write an unbiased gradient estimate into `grad`, overwriting its
    /// contents, using roughly `fraction` of the work of [`gradient`](Self::gradient).
    ///
    /// The default computes the exact gradient.
    fn stochastic_gradient(
        &self,
        emb: &Embedding<D>,
        grad: &mut [f64],
        fraction: f64,
        rng: &mut fastrand::Rng,
    ) {
        let _ = (fraction, rng);
        self.gradient(emb, grad);
    }
}

/// Add `v` into the `D` gradient entries of vertex `i`.
#[inline]
pub(crate) fn accumulate<const D: usize>(grad: &mut [f64], i: usize, v: &SVector<f64, D>) {
    for (g, x) in grad[i * D..(i + 1) * D].iter_mut().zip(v.iter()) {
        *g += x;
    }
}

/// Number of terms drawn by a stochastic gradient: `floor(fraction * count)`,
/// clamped to `1..=count`.
#[inline]
fn sample_count(count: usize, fraction: f64) -> usize {
    let m = (fraction * count as f64).floor();
    if m.is_nan() || m < 1.0 {
        1
    } else {
        (m as usize).min(count)
    }
}

/// Compressed vertex → terms adjacency.
#[derive(Debug, Clone)]
struct VertexTermIndex {
    offsets: Vec<usize>,
    terms: Vec<usize>,
}

impl VertexTermIndex {
    fn build<T: TermSet + ?Sized>(set: &T) -> Self {
        let count = set.term_count();

        let num_vertices = (0..count)
            .flat_map(|k| set.term_vertices(k).iter().copied())
            .max()
            .map_or(0, |v| v + 1);

        // Distinct vertices of a term; a term listing a vertex twice is indexed once.
        let distinct = move |k: usize| {
            let vertices = set.term_vertices(k);
            vertices
                .iter()
                .enumerate()
                .filter(move |&(n, v)| !vertices[..n].contains(v))
                .map(|(_, &v)| v)
        };

        let mut offsets = vec![0usize; num_vertices + 1];
        for k in 0..count {
            for v in distinct(k) {
                offsets[v + 1] += 1;
            }
        }
        for v in 0..num_vertices {
            offsets[v + 1] += offsets[v];
        }

        let mut cursor = offsets.clone();
        let mut terms = vec![0usize; offsets[num_vertices]];
        for k in 0..count {
            for v in distinct(k) {
                terms[cursor[v]] = k;
                cursor[v] += 1;
            }
        }

        log::trace!(
            "built vertex-term index: {} vertices, {} incidences",
            num_vertices,
            terms.len()
        );

        Self { offsets, terms }
    }

    #[inline]
    fn terms_of(&self, v: usize) -> &[usize] {
        if v + 1 >= self.offsets.len() {
            return &[];
        }
        &self.terms[self.offsets[v]..self.offsets[v + 1]]
    }
}

/// An energy functional over a fixed term set.
///
/// The vertex → terms index used by [`local_value`](Objective::local_value) is
/// built on first use (or eagerly with [`build_index`](Self::build_index)) and
/// then reused. It is only valid while the term list stays fixed: go through
/// [`replace_terms`](Self::replace_terms) or call
/// [`invalidate_index`](Self::invalidate_index) after changing the terms.
#[derive(Debug)]
pub struct Energy<T> {
    terms: T,
    index: OnceCell<VertexTermIndex>,
    // Permutation of 0..term_count reused by the partial shuffle.
    order: RefCell<Vec<usize>>,
}

impl<T: TermSet> Energy<T> {
    /// Wrap a term set.
    pub fn new(terms: T) -> Self {
        Self {
            terms,
            index: OnceCell::new(),
            order: RefCell::new(Vec::new()),
        }
    }

    /// The wrapped term set.
    #[inline]
    pub fn terms(&self) -> &T {
        &self.terms
    }

    /// Number of terms.
    #[inline]
    pub fn term_count(&self) -> usize {
        self.terms.term_count()
    }

    /// Swap in a new term set, dropping the cached index. Returns the old set.
    pub fn replace_terms(&mut self, terms: T) -> T {
        self.invalidate_index();
        self.order.get_mut().clear();
        std::mem::replace(&mut self.terms, terms)
    }

    /// Build the vertex → terms index now instead of on first use.
    pub fn build_index(&self) {
        self.term_index();
    }

    /// Drop the cached vertex → terms index.
    pub fn invalidate_index(&mut self) {
        self.index.take();
    }

    /// True if the vertex → terms index has been built.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }

    /// Indices of the terms that read vertex `v`.
    pub fn vertex_terms(&self, v: usize) -> &[usize] {
        self.term_index().terms_of(v)
    }

    fn term_index(&self) -> &VertexTermIndex {
        self.index.get_or_init(|| VertexTermIndex::build(&self.terms))
    }
}

impl<T: Default + TermSet> Default for Energy<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + TermSet> Clone for Energy<T> {
    fn clone(&self) -> Self {
        Self::new(self.terms.clone())
    }
}

impl<T> From<T> for Energy<T>
where
    T: TermSet,
{
    fn from(terms: T) -> Self {
        Self::new(terms)
    }
}

impl<const D: usize, T: TermEnergy<D>> Objective<D> for Energy<T> {
    fn value(&self, emb: &Embedding<D>) -> f64 {
        (0..self.terms.term_count())
            .map(|k| self.terms.term_value(k, emb))
            .sum()
    }

    fn local_value(&self, emb: &Embedding<D>, v: usize) -> f64 {
        self.vertex_terms(v)
            .iter()
            .map(|&k| self.terms.term_value(k, emb))
            .sum()
    }

    fn gradient(&self, emb: &Embedding<D>, grad: &mut [f64]) {
        grad.fill(0.0);
        for k in 0..self.terms.term_count() {
            self.terms.term_grad_accumulate(k, emb, grad);
        }
    }

    /// Accumulates `m = clamp(floor(fraction * S), 1, S)` distinct terms drawn
    /// uniformly at random and scales the sum by `S / m`.
    fn stochastic_gradient(
        &self,
        emb: &Embedding<D>,
        grad: &mut [f64],
        fraction: f64,
        rng: &mut fastrand::Rng,
    ) {
        grad.fill(0.0);

        let count = self.terms.term_count();
        if count == 0 {
            return;
        }
        let m = sample_count(count, fraction);

        let mut order = self.order.borrow_mut();
        if order.len() != count {
            *order = (0..count).collect();
        }

        // Partial Fisher-Yates: the first m slots become a uniform m-subset.
        // Any permutation is a valid starting point, so the buffer is not reset.
        for t in 0..m {
            let r = rng.usize(t..count);
            order.swap(t, r);
        }

        for &k in &order[..m] {
            self.terms.term_grad_accumulate(k, emb, grad);
        }

        if m < count {
            let scale = count as f64 / m as f64;
            for g in grad.iter_mut() {
                *g *= scale;
            }
        }
    }
}
