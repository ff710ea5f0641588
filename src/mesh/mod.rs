//! Mesh connectivity.
//!
//! This module provides the half-edge [`Topology`] that the energy builders walk
//! to generate interaction terms. It holds no positions: coordinates live in an
//! [`Embedding`](crate::embedding::Embedding) and reference geometry in a
//! [`Geometry`](crate::geometry::Geometry).
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use tensile::mesh::Topology;
//!
//! // Two quads sharing the edge 1-4
//! let faces = [[0, 1, 4, 3], [1, 2, 5, 4]];
//! let topology = Topology::from_soup(6, &faces).unwrap();
//!
//! assert_eq!(topology.unique_edges().len(), 7);
//! assert!(!topology.is_closed());
//! ```

mod builder;
mod index;
mod topology;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::build_from_soup;
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use topology::{Face, FaceHalfEdgeIter, HalfEdge, Topology, Vertex};
