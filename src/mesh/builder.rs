//! Topology construction from a face soup.
//!
//! A mesh loader hands over a vertex count and a list of faces (each an ordered
//! list of vertex indices); this module turns that into a [`Topology`].

use std::collections::HashMap;

use super::index::{FaceId, HalfEdgeId, VertexId};
use super::topology::{Face, HalfEdge, Topology, Vertex};
use crate::error::{Result, TensileError};

impl Topology {
    /// Build a topology from `vertex_count` vertices and a polygon soup.
    ///
    /// See [`build_from_soup`].
    pub fn from_soup<F: AsRef<[usize]>>(vertex_count: usize, faces: &[F]) -> Result<Self> {
        build_from_soup(vertex_count, faces)
    }
}

/// Build a half-edge topology from a polygon soup.
///
/// Creates one half-edge per face-vertex and links `next` circularly around each
/// face. Twins are matched through a map keyed by the directed edge
/// `(origin, dest)`: when a half-edge's reverse key is pending, the two are paired
/// and the entry is consumed; otherwise the half-edge is registered under its own
/// key. Half-edges still unpaired at the end are boundary edges.
///
/// # Non-manifold input
///
/// Manifoldness is not checked. If a directed edge is registered while an entry
/// for the same key is still pending (an edge used by more than two faces, or two
/// faces with clashing orientation), the later half-edge replaces the earlier one
/// in the map and the earlier one stays on the boundary.
///
/// # Errors
///
/// Returns [`TensileError::InvalidVertexIndex`] if a face references a vertex
/// `>= vertex_count`, and [`TensileError::DegenerateFace`] for faces with fewer
/// than three vertices.
///
/// # Example
/// ```
/// use tensile::mesh::Topology;
///
/// let topology = Topology::from_soup(4, &[[0, 1, 2], [1, 0, 3]]).unwrap();
/// assert_eq!(topology.num_faces(), 2);
/// assert_eq!(topology.unique_edges().len(), 5);
/// assert_eq!(topology.boundary_edges().len(), 4);
/// ```
pub fn build_from_soup<F: AsRef<[usize]>>(vertex_count: usize, faces: &[F]) -> Result<Topology> {
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(TensileError::DegenerateFace {
                face: fi,
                degree: face.len(),
            });
        }
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertex_count) {
            return Err(TensileError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }

    let num_halfedges: usize = faces.iter().map(|f| f.as_ref().len()).sum();

    let mut topology = Topology {
        vertices: vec![Vertex::default(); vertex_count],
        halfedges: Vec::with_capacity(num_halfedges),
        faces: Vec::with_capacity(faces.len()),
        unique_edges: Vec::new(),
        boundary_edges: Vec::new(),
    };

    // Directed edges still waiting for their reverse
    let mut pending: HashMap<(usize, usize), HalfEdgeId> = HashMap::new();

    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        let n = face.len();
        let base = topology.halfedges.len();
        let face_id = FaceId::new(fi);

        for k in 0..n {
            topology.halfedges.push(HalfEdge {
                origin: VertexId::new(face[k]),
                twin: None,
                next: HalfEdgeId::new(base + (k + 1) % n),
                face: face_id,
            });

            let vertex = &mut topology.vertices[face[k]];
            if vertex.halfedge.is_none() {
                vertex.halfedge = Some(HalfEdgeId::new(base + k));
            }
        }

        topology.faces.push(Face {
            vertices: face.iter().map(|&v| VertexId::new(v)).collect(),
            halfedge: HalfEdgeId::new(base),
        });

        for k in 0..n {
            let he = HalfEdgeId::new(base + k);
            let (u, v) = (face[k], face[(k + 1) % n]);

            if let Some(twin) = pending.remove(&(v, u)) {
                topology.halfedges[he.index()].twin = Some(twin);
                topology.halfedges[twin.index()].twin = Some(he);
            } else if let Some(dropped) = pending.insert((u, v), he) {
                log::debug!(
                    "non-manifold edge ({}, {}): {:?} replaced by {:?} in twin matching",
                    u,
                    v,
                    dropped,
                    he
                );
            }
        }
    }

    for (i, he) in topology.halfedges.iter().enumerate() {
        match he.twin {
            None => {
                topology.unique_edges.push(HalfEdgeId::new(i));
                topology.boundary_edges.push(HalfEdgeId::new(i));
            }
            Some(twin) if i < twin.index() => topology.unique_edges.push(HalfEdgeId::new(i)),
            Some(_) => {}
        }
    }

    log::debug!(
        "built topology: {} vertices, {} faces, {} edges ({} boundary)",
        topology.num_vertices(),
        topology.num_faces(),
        topology.unique_edges.len(),
        topology.boundary_edges.len()
    );

    Ok(topology)
}
