//! Weighted sums of objectives.

use std::cell::RefCell;
use std::fmt;

use super::Objective;
use crate::embedding::Embedding;

/// A weighted sum `Σ wᵢ Eᵢ` of objectives.
///
/// Each part keeps its own gradient strategy: parts that implement
/// [`stochastic_gradient`](Objective::stochastic_gradient) are sampled, the
/// rest fall back to their exact gradient. Parts with zero weight are skipped.
/// A `TotalEnergy` is itself an [`Objective`] and can be nested.
///
/// ```
/// use tensile::prelude::*;
/// use nalgebra::Vector3;
///
/// let emb = Embedding3::from_points(&[Vector3::zeros(), Vector3::new(2.0, 0.0, 0.0)]);
///
/// let total: TotalEnergy<3> = TotalEnergy::new()
///     .with(Energy::new(Springs::from(vec![Spring::new(0, 1, 1.0, 1.0)])), 2.0)
///     .with(Energy::new(Charges::uniform(vec![0, 1], 1.0)), 4.0);
///
/// // 2 * 0.5 + 4 * 0.25
/// assert_eq!(total.value(&emb), 2.0);
/// ```
pub struct TotalEnergy<const D: usize> {
    parts: Vec<(Box<dyn Objective<D>>, f64)>,
    scratch: RefCell<Vec<f64>>,
}

impl<const D: usize> TotalEnergy<D> {
    /// Create an empty sum.
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            scratch: RefCell::new(Vec::new()),
        }
    }

    /// Add `objective` with `weight` (builder style).
    pub fn with(mut self, objective: impl Objective<D> + 'static, weight: f64) -> Self {
        self.push(objective, weight);
        self
    }

    /// Add `objective` with `weight`.
    pub fn push(&mut self, objective: impl Objective<D> + 'static, weight: f64) {
        self.parts.push((Box::new(objective), weight));
    }

    /// Number of parts.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True if there are no parts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Weight of part `i`, or `None` if out of range.
    pub fn weight(&self, i: usize) -> Option<f64> {
        self.parts.get(i).map(|(_, w)| *w)
    }

    /// Change the weight of part `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn set_weight(&mut self, i: usize, weight: f64) {
        self.parts[i].1 = weight;
    }

    fn active(&self) -> impl Iterator<Item = (&dyn Objective<D>, f64)> + '_ {
        self.parts
            .iter()
            .filter(|(_, w)| *w != 0.0)
            .map(|(obj, w)| (&**obj, *w))
    }

    /// Run `fill` for every active part into the shared scratch buffer and add
    /// the weighted result into `grad`.
    fn combine(&self, grad: &mut [f64], mut fill: impl FnMut(&dyn Objective<D>, &mut [f64])) {
        grad.fill(0.0);

        let mut scratch = self.scratch.borrow_mut();
        scratch.resize(grad.len(), 0.0);

        for (obj, w) in self.active() {
            fill(obj, &mut scratch);
            for (g, s) in grad.iter_mut().zip(scratch.iter()) {
                *g += w * s;
            }
        }
    }
}

impl<const D: usize> Default for TotalEnergy<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> fmt::Debug for TotalEnergy<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weights: Vec<f64> = self.parts.iter().map(|(_, w)| *w).collect();
        f.debug_struct("TotalEnergy").field("weights", &weights).finish()
    }
}

impl<const D: usize> Objective<D> for TotalEnergy<D> {
    fn value(&self, emb: &Embedding<D>) -> f64 {
        self.active().map(|(obj, w)| w * obj.value(emb)).sum()
    }

    fn local_value(&self, emb: &Embedding<D>, v: usize) -> f64 {
        self.active().map(|(obj, w)| w * obj.local_value(emb, v)).sum()
    }

    fn gradient(&self, emb: &Embedding<D>, grad: &mut [f64]) {
        self.combine(grad, |obj, scratch| obj.gradient(emb, scratch));
    }

    fn stochastic_gradient(
        &self,
        emb: &Embedding<D>,
        grad: &mut [f64],
        fraction: f64,
        rng: &mut fastrand::Rng,
    ) {
        self.combine(grad, |obj, scratch| {
            obj.stochastic_gradient(emb, scratch, fraction, rng)
        });
    }
}
