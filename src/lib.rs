//! # Tensile
//!
//! An energy-based mesh deformation kernel.
//!
//! Tensile turns a polygon mesh into a set of physically motivated energy terms
//! (springs, point charges, dihedral hinges), evaluates them and their analytic
//! gradients on a mutable set of vertex positions, and projects positions back
//! onto simple constraints. The time-stepping loop itself belongs to the caller.
//!
//! ## Features
//!
//! - **Half-edge topology**: built from a face-index soup, with typed ids
//! - **Dimension-generic positions**: `Embedding<D>`, including points on S³
//! - **Term-decomposed energies**: full, per-vertex and stochastic evaluation
//!   from one definition
//! - **Builders**: stretch, shear, bend and boundary springs, hinges, charges
//! - **Constraints**: planes with restitution and pinned vertices
//!
//! ## Quick Start
//!
//! ```
//! use tensile::prelude::*;
//! use tensile::builders::{bend_hinges, stretch_springs};
//! use nalgebra::Vector3;
//!
//! // A square of two triangles
//! let topology = Topology::from_soup(4, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//! let mut emb = Embedding3::from_points(&[
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(1.0, 1.0, 0.0),
//!     Vector3::new(0.0, 1.0, 0.0),
//! ]);
//! let geometry = Geometry::euclidean(&topology, &emb).unwrap();
//!
//! let energy: TotalEnergy<3> = TotalEnergy::new()
//!     .with(Energy::new(stretch_springs(&geometry, 10.0)), 1.0)
//!     .with(Energy::new(bend_hinges(&topology, 1.0)), 0.1);
//!
//! // Lift one corner, then relax
//! emb.set_position_at(2, &Vector3::new(1.0, 1.0, 0.5));
//! let before = energy.value(&emb);
//!
//! let mut grad = vec![0.0; emb.as_slice().len()];
//! for _ in 0..50 {
//!     energy.gradient(&emb, &mut grad);
//!     emb.add_scaled_vector(&grad, -0.01).unwrap();
//! }
//! assert!(energy.value(&emb) < before);
//! ```
//!
//! ## Integration Loop
//!
//! A typical caller alternates gradient steps and constraint projection:
//!
//! ```text
//! loop {
//!     energy.gradient(&emb, &mut grad);      // or stochastic_gradient
//!     integrate(&mut emb, &mut vel, &grad);  // caller's scheme
//!     for c in &mut constraints {
//!         c.enforce(emb.as_mut_slice(), &mut vel, n);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builders;
pub mod constraint;
pub mod embedding;
pub mod energy;
pub mod error;
pub mod geometry;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use tensile::prelude::*;
/// ```
pub mod prelude {
    pub use crate::constraint::{Constraint, PinConstraint, PlaneConstraint, WallSide};
    pub use crate::embedding::{Embedding, Embedding3, SphericalEmbedding};
    pub use crate::energy::{
        Charges, Energy, Hinge, Hinges, Objective, Spring, Springs, TermEnergy, TermSet,
        TotalEnergy,
    };
    pub use crate::error::{Result, TensileError};
    pub use crate::geometry::{Euclidean, Geometry, Metric};
    pub use crate::mesh::{FaceId, HalfEdgeId, Topology, VertexId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
