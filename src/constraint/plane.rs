//! Half-space constraint with bounce.

use nalgebra::{SVector, Vector3};

use super::{read, write, Constraint};
use crate::error::{Result, TensileError};

/// Keeps vertices on the positive side of the plane `n·p = offset`.
///
/// A vertex found behind the plane is projected onto it. If it is also moving
/// into the plane, the normal part of its velocity is reflected and scaled by
/// `restitution` (`0` sticks, `1` bounces elastically).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneConstraint<const D: usize> {
    normal: SVector<f64, D>,
    offset: f64,
    restitution: f64,
}

/// Which wall of an axis-aligned box a [`PlaneConstraint::wall`] forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    /// `x >= position`
    Left,
    /// `x <= position`
    Right,
    /// `z >= position`
    Back,
    /// `z <= position`
    Front,
}

impl<const D: usize> PlaneConstraint<D> {
    /// Create a plane from a (not necessarily unit) normal.
    ///
    /// # Errors
    ///
    /// Fails if `normal` has zero or non-finite length.
    pub fn new(normal: SVector<f64, D>, offset: f64, restitution: f64) -> Result<Self> {
        let length = normal.norm();
        if !(length.is_finite() && length > 0.0) {
            return Err(TensileError::invalid_param(
                "normal",
                format!("{:?}", normal.as_slice()),
                "must be non-zero and finite",
            ));
        }
        Ok(Self {
            normal: normal / length,
            offset,
            restitution,
        })
    }

    /// Unit normal.
    pub fn normal(&self) -> &SVector<f64, D> {
        &self.normal
    }

    /// Plane offset along the normal.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Restitution coefficient.
    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Signed distance of `p` from the plane, positive on the feasible side.
    #[inline]
    pub fn signed_distance(&self, p: &SVector<f64, D>) -> f64 {
        self.normal.dot(p) - self.offset
    }
}

impl PlaneConstraint<3> {
    fn axis(normal: Vector3<f64>, offset: f64, restitution: f64) -> Self {
        Self {
            normal,
            offset,
            restitution,
        }
    }

    /// Keep `y >= height`.
    pub fn floor(height: f64, restitution: f64) -> Self {
        Self::axis(Vector3::y(), height, restitution)
    }

    /// Keep `y <= height`.
    pub fn ceiling(height: f64, restitution: f64) -> Self {
        Self::axis(-Vector3::y(), -height, restitution)
    }

    /// A vertical wall at `position` along x or z.
    pub fn wall(side: WallSide, position: f64, restitution: f64) -> Self {
        match side {
            WallSide::Left => Self::axis(Vector3::x(), position, restitution),
            WallSide::Right => Self::axis(-Vector3::x(), -position, restitution),
            WallSide::Back => Self::axis(Vector3::z(), position, restitution),
            WallSide::Front => Self::axis(-Vector3::z(), -position, restitution),
        }
    }
}

impl<const D: usize> Constraint<D> for PlaneConstraint<D> {
    fn enforce(&mut self, positions: &mut [f64], velocities: &mut [f64], n: usize) {
        let has_velocity = !velocities.is_empty();

        for i in 0..n {
            let p = read::<D>(positions, i);
            let d = self.signed_distance(&p);
            if d >= 0.0 {
                continue;
            }
            write(positions, i, &(p - self.normal * d));

            if has_velocity {
                let v = read::<D>(velocities, i);
                let vn = self.normal.dot(&v);
                if vn < 0.0 {
                    let impulse = -(1.0 + self.restitution) * vn;
                    write(velocities, i, &(v + self.normal * impulse));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn test_floor_bounce() {
        let mut floor = PlaneConstraint::floor(0.0, 0.5);
        let mut pos = vec![0.0, -1.0, 0.0];
        let mut vel = vec![0.0, -1.0, 0.0];

        floor.enforce(&mut pos, &mut vel, 1);

        assert_eq!(pos, vec![0.0, 0.0, 0.0]);
        assert_eq!(vel, vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_feasible_vertices_untouched() {
        let mut floor = PlaneConstraint::floor(1.0, 1.0);
        let mut pos = vec![0.3, 2.0, -0.4];
        let mut vel = vec![0.0, -5.0, 0.0];

        floor.enforce(&mut pos, &mut vel, 1);

        assert_eq!(pos, vec![0.3, 2.0, -0.4]);
        assert_eq!(vel, vec![0.0, -5.0, 0.0]);
    }

    #[test]
    fn test_separating_velocity_kept() {
        let mut floor = PlaneConstraint::floor(0.0, 0.5);
        let mut pos = vec![1.0, -0.2, 0.0];
        let mut vel = vec![1.0, 2.0, 0.0];

        floor.enforce(&mut pos, &mut vel, 1);

        assert!(pos[1].abs() < 1e-15);
        assert_eq!(vel, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_positions_only() {
        let mut ceiling = PlaneConstraint::ceiling(2.0, 0.0);
        let mut pos = vec![0.0, 3.0, 0.0, 0.0, 1.0, 0.0];

        ceiling.enforce(&mut pos, &mut [], 2);

        assert_eq!(pos, vec![0.0, 2.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_walls() {
        let mut pos = vec![-3.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, -3.0, 0.0, 0.0, 3.0];
        for (side, at) in [
            (WallSide::Left, -1.0),
            (WallSide::Right, 1.0),
            (WallSide::Back, -1.0),
            (WallSide::Front, 1.0),
        ] {
            PlaneConstraint::wall(side, at, 0.0).enforce(&mut pos, &mut [], 4);
        }

        assert_eq!(
            pos,
            vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_new_normalizes_and_rejects_zero() {
        let plane = PlaneConstraint::new(Vector2::new(3.0, 4.0), 1.0, 0.0).unwrap();
        assert!((plane.normal().norm() - 1.0).abs() < 1e-15);
        assert!((plane.signed_distance(&Vector2::new(0.6, 0.8)) - 0.0).abs() < 1e-15);

        assert!(PlaneConstraint::new(Vector2::zeros(), 0.0, 0.0).is_err());
        assert!(PlaneConstraint::new(Vector2::new(f64::NAN, 1.0), 0.0, 0.0).is_err());
    }

    #[test]
    fn test_two_dimensional_bounce() {
        let mut plane = PlaneConstraint::new(Vector2::new(1.0, 1.0), 0.0, 1.0).unwrap();
        let mut pos = vec![-1.0, -1.0];
        let mut vel = vec![-1.0, 0.0];

        plane.enforce(&mut pos, &mut vel, 1);

        assert!(pos.iter().all(|p| p.abs() < 1e-12));
        // Elastic: normal component flips, tangential component is kept
        assert!((vel[0] - 0.0).abs() < 1e-12);
        assert!((vel[1] - 1.0).abs() < 1e-12);
    }
}
