//! Half-edge topology.
//!
//! Connectivity only: positions live in an [`Embedding`](crate::embedding::Embedding)
//! so that the integrator can mutate them freely while the topology stays fixed.
//!
//! # Structure
//!
//! - Every face-vertex owns one **half-edge** running to the next vertex of the face
//! - Each half-edge knows its **origin**, its **next** half-edge around the face
//!   (counter-clockwise) and its **face**
//! - Interior half-edges have a **twin** running the opposite direction; half-edges
//!   on the mesh boundary have none
//!
//! # Boundary Handling
//!
//! Unlike a full doubly-connected edge list, no half-edges are created outside the
//! faces. A boundary edge is simply a half-edge whose twin is `None`, and boundary
//! loops are walked with [`Topology::next_boundary_edge`].

use std::collections::HashSet;

use super::index::{FaceId, HalfEdgeId, VertexId};

/// A vertex in the topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    /// One outgoing half-edge. `None` only for isolated vertices.
    pub halfedge: Option<HalfEdgeId>,
}

/// A directed edge inside one face.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The opposite half-edge, or `None` on the boundary.
    pub twin: Option<HalfEdgeId>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId,

    /// The face this half-edge belongs to.
    pub face: FaceId,
}

impl HalfEdge {
    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.twin.is_none()
    }
}

/// A polygonal face.
#[derive(Debug, Clone)]
pub struct Face {
    /// The face's vertices in counter-clockwise order.
    pub vertices: Vec<VertexId>,

    /// The half-edge leaving the first vertex.
    pub halfedge: HalfEdgeId,
}

impl Face {
    /// Number of vertices (and half-edges) of this face.
    #[inline]
    pub fn degree(&self) -> usize {
        self.vertices.len()
    }
}

/// Immutable half-edge connectivity built from a face soup.
///
/// Build one with [`Topology::from_soup`]. The derived edge lists
/// ([`unique_edges`](Self::unique_edges) and [`boundary_edges`](Self::boundary_edges))
/// are computed once at construction.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) unique_edges: Vec<HalfEdgeId>,
    pub(crate) boundary_edges: Vec<HalfEdgeId>,
}

impl Topology {
    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge, if the edge is interior.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> Option<HalfEdgeId> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// One half-edge per undirected edge.
    ///
    /// Boundary half-edges appear once; each interior pair is represented by
    /// its lower-indexed half-edge.
    #[inline]
    pub fn unique_edges(&self) -> &[HalfEdgeId] {
        &self.unique_edges
    }

    /// All half-edges without a twin.
    #[inline]
    pub fn boundary_edges(&self) -> &[HalfEdgeId] {
        &self.boundary_edges
    }

    /// True if the surface has no boundary.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.boundary_edges.is_empty()
    }

    /// Euler characteristic `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.unique_edges.len() as i64 + self.num_faces() as i64
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// The vertices of a face in counter-clockwise order.
    #[inline]
    pub fn face_vertices(&self, f: FaceId) -> &[VertexId] {
        &self.face(f).vertices
    }

    /// Iterate over the half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Faces sharing an edge with `f`.
    ///
    /// A face that shares several edges with `f` is yielded once per shared edge.
    pub fn neighboring_faces(&self, f: FaceId) -> impl Iterator<Item = FaceId> + '_ {
        self.face_halfedges(f)
            .filter_map(|he| self.twin(he).map(|t| self.face_of(t)))
    }

    /// The boundary half-edge that follows `he` along its boundary loop.
    ///
    /// Starting from the destination of `he`, rotates through interior
    /// `twin -> next` hops until a half-edge without a twin is found. Returns
    /// `None` if `he` is not a boundary half-edge, or if the walk does not reach
    /// the boundary (only possible on non-manifold input).
    pub fn next_boundary_edge(&self, he: HalfEdgeId) -> Option<HalfEdgeId> {
        if !self.is_boundary_halfedge(he) {
            return None;
        }

        let mut current = self.next(he);
        for _ in 0..self.halfedges.len() {
            match self.twin(current) {
                None => return Some(current),
                Some(twin) => current = self.next(twin),
            }
        }
        None
    }

    /// All boundary loops, each as an ordered list of boundary half-edges.
    pub fn boundary_loops(&self) -> Vec<Vec<HalfEdgeId>> {
        let mut visited: HashSet<HalfEdgeId> = HashSet::new();
        let mut loops = Vec::new();

        for &start in &self.boundary_edges {
            if visited.contains(&start) {
                continue;
            }

            let mut boundary_loop = Vec::new();
            let mut current = start;
            while visited.insert(current) {
                boundary_loop.push(current);
                match self.next_boundary_edge(current) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            loops.push(boundary_loop);
        }

        loops
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a> {
    topology: &'a Topology,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(topology: &'a Topology, f: FaceId) -> Self {
        let start = topology.face(f).halfedge;
        Self {
            topology,
            start,
            current: start,
            done: false,
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.topology.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures;

    #[test]
    fn test_empty_topology() {
        let topology = Topology::default();
        assert_eq!(topology.num_vertices(), 0);
        assert_eq!(topology.num_halfedges(), 0);
        assert_eq!(topology.num_faces(), 0);
        assert!(topology.is_closed());
    }

    #[test]
    fn test_face_halfedges_ring() {
        let topology = fixtures::quad_grid_topology(2, 2);
        let f = FaceId::new(0);

        let ring: Vec<HalfEdgeId> = topology.face_halfedges(f).collect();
        assert_eq!(ring.len(), 4);

        // Origins of the ring are the face's vertices in order
        let origins: Vec<VertexId> = ring.iter().map(|&he| topology.origin(he)).collect();
        assert_eq!(origins, topology.face_vertices(f));

        for &he in &ring {
            assert_eq!(topology.face_of(he), f);
        }
    }

    #[test]
    fn test_dest_is_next_origin() {
        let topology = fixtures::icosahedron_topology();
        for he in topology.halfedge_ids() {
            assert_eq!(topology.dest(he), topology.origin(topology.next(he)));
            if let Some(twin) = topology.twin(he) {
                assert_eq!(topology.origin(twin), topology.dest(he));
                assert_eq!(topology.dest(twin), topology.origin(he));
                assert_eq!(topology.twin(twin), Some(he));
            }
        }
    }

    #[test]
    fn test_neighboring_faces() {
        // 3x3 quad grid: the centre face (index 4) has four neighbours
        let topology = fixtures::quad_grid_topology(3, 3);
        let mut neighbors: Vec<usize> = topology
            .neighboring_faces(FaceId::new(4))
            .map(|f| f.index())
            .collect();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![1, 3, 5, 7]);

        // Corner face has two neighbours
        let corner: Vec<FaceId> = topology.neighboring_faces(FaceId::new(0)).collect();
        assert_eq!(corner.len(), 2);
    }

    #[test]
    fn test_next_boundary_edge_walks_loop() {
        let topology = fixtures::quad_grid_topology(2, 2);

        // 2x2 quads: 3x3 vertices, boundary loop of 8 edges
        assert_eq!(topology.boundary_edges().len(), 8);

        for &he in topology.boundary_edges() {
            let next = topology
                .next_boundary_edge(he)
                .expect("boundary edge must have a successor");
            assert!(topology.is_boundary_halfedge(next));
            assert_eq!(topology.origin(next), topology.dest(he));
        }
    }

    #[test]
    fn test_next_boundary_edge_rejects_interior() {
        let topology = fixtures::icosahedron_topology();
        assert_eq!(topology.next_boundary_edge(HalfEdgeId::new(0)), None);
    }

    #[test]
    fn test_boundary_loops() {
        let topology = fixtures::quad_grid_topology(3, 2);
        let loops = topology.boundary_loops();
        assert_eq!(loops.len(), 1);
        // Perimeter of a 3x2 grid of unit quads
        assert_eq!(loops[0].len(), 10);

        let closed = fixtures::icosahedron_topology();
        assert!(closed.boundary_loops().is_empty());
    }

    #[test]
    fn test_euler_characteristic() {
        // Sphere: 2, disk: 1
        assert_eq!(fixtures::icosahedron_topology().euler_characteristic(), 2);
        assert_eq!(fixtures::quad_grid_topology(4, 3).euler_characteristic(), 1);
    }
}
