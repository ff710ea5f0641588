//! Pinned vertices.

use nalgebra::SVector;

use super::{read, write, Constraint};
use crate::error::{Result, TensileError};

/// Holds a set of vertices at fixed targets and zeroes their velocity.
///
/// A pin added without a target captures the vertex position on the next
/// [`enforce`](Constraint::enforce) and keeps it from then on.
#[derive(Debug, Clone, Default)]
pub struct PinConstraint<const D: usize> {
    indices: Vec<usize>,
    targets: Vec<Option<SVector<f64, D>>>,
}

impl<const D: usize> PinConstraint<D> {
    /// Pin `indices` wherever they are on the first enforcement.
    pub fn new(indices: Vec<usize>) -> Self {
        let targets = vec![None; indices.len()];
        Self { indices, targets }
    }

    /// Pin `indices[i]` to `positions[i]`.
    ///
    /// # Errors
    ///
    /// Fails with [`TensileError::DimensionMismatch`] if the lists differ in length.
    pub fn with_positions(indices: Vec<usize>, positions: Vec<SVector<f64, D>>) -> Result<Self> {
        if indices.len() != positions.len() {
            return Err(TensileError::mismatch(indices.len(), positions.len()));
        }
        Ok(Self {
            indices,
            targets: positions.into_iter().map(Some).collect(),
        })
    }

    fn slot(&self, index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    /// Pin `index` at its position on the next enforcement. An existing pin is
    /// left as it is.
    pub fn add_vertex(&mut self, index: usize) {
        if self.slot(index).is_none() {
            self.indices.push(index);
            self.targets.push(None);
        }
    }

    /// Pin `index` to `target`, replacing any existing target.
    pub fn add_vertex_at(&mut self, index: usize, target: SVector<f64, D>) {
        match self.slot(index) {
            Some(s) => self.targets[s] = Some(target),
            None => {
                self.indices.push(index);
                self.targets.push(Some(target));
            }
        }
    }

    /// Unpin `index`. Does nothing if it is not pinned.
    pub fn remove_vertex(&mut self, index: usize) {
        if let Some(s) = self.slot(index) {
            self.indices.remove(s);
            self.targets.remove(s);
        }
    }

    /// True if `index` is pinned.
    pub fn is_pinned(&self, index: usize) -> bool {
        self.slot(index).is_some()
    }

    /// Pinned vertex indices.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Target of `index`, if pinned and already captured.
    pub fn target(&self, index: usize) -> Option<SVector<f64, D>> {
        self.slot(index).and_then(|s| self.targets[s])
    }
}

impl<const D: usize> Constraint<D> for PinConstraint<D> {
    fn enforce(&mut self, positions: &mut [f64], velocities: &mut [f64], n: usize) {
        let has_velocity = !velocities.is_empty();

        for (&i, target) in self.indices.iter().zip(self.targets.iter_mut()) {
            if i >= n {
                continue;
            }

            let p = *target.get_or_insert_with(|| read::<D>(positions, i));
            write(positions, i, &p);
            if has_velocity {
                write(velocities, i, &SVector::<f64, D>::zeros());
            }
        }
    }
}
