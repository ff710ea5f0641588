//! Position constraints.
//!
//! An integrator steps positions freely, then hands the flat position and
//! velocity buffers to every [`Constraint`], which projects them back onto the
//! feasible set in place. Constraints are not part of the energy and have no
//! gradient.
//!
//! Buffers hold `D` values per vertex. A velocity buffer may be empty, in which
//! case only positions are corrected.
//!
//! ```
//! use tensile::constraint::{Constraint, PinConstraint, PlaneConstraint};
//!
//! let mut positions = vec![0.0, -1.0, 0.0, 2.0, 3.0, 4.0];
//! let mut velocities = vec![0.0, -1.0, 0.0, 1.0, 1.0, 1.0];
//!
//! let mut floor = PlaneConstraint::floor(0.0, 0.5);
//! let mut pin = PinConstraint::<3>::new(vec![1]);
//!
//! floor.enforce(&mut positions, &mut velocities, 2);
//! pin.enforce(&mut positions, &mut velocities, 2);
//!
//! assert_eq!(positions, vec![0.0, 0.0, 0.0, 2.0, 3.0, 4.0]);
//! assert_eq!(velocities, vec![0.0, 0.5, 0.0, 0.0, 0.0, 0.0]);
//! ```

mod pin;
mod plane;

pub use pin::PinConstraint;
pub use plane::{PlaneConstraint, WallSide};

use nalgebra::SVector;

/// In-place correction of positions and velocities.
pub trait Constraint<const D: usize> {
    /// Correct the first `n` vertices of `positions` and, if non-empty,
    /// `velocities`.
    fn enforce(&mut self, positions: &mut [f64], velocities: &mut [f64], n: usize);
}

#[inline]
fn read<const D: usize>(buf: &[f64], i: usize) -> SVector<f64, D> {
    SVector::from_column_slice(&buf[i * D..(i + 1) * D])
}

#[inline]
fn write<const D: usize>(buf: &mut [f64], i: usize, v: &SVector<f64, D>) {
    buf[i * D..(i + 1) * D].copy_from_slice(v.as_slice());
}
