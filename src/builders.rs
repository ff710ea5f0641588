//! Term generation from mesh connectivity.
//!
//! Each builder walks a [`Topology`] once and returns a fresh term list. Rest
//! lengths and cell areas are read from a [`Geometry`] at build time and never
//! updated afterwards.
//!
//! | Builder | Terms | Rest length | Stiffness |
//! |---------|-------|-------------|-----------|
//! | [`stretch_springs`] | one per edge | edge length | `k · rest` |
//! | [`shear_springs`] | both diagonals of each quad | diagonal length | `k` |
//! | [`bend_springs`] | across each pair of adjacent quads | two-cell span | `k` |
//! | [`boundary_springs`] | skip-one along each boundary loop | two-edge span | `k` |
//! | [`bend_hinges`] | one per edge between two triangles | - | `k` |
//!
//! Builders that only understand one face type skip the others and log a
//! single warning with the count.
//!
//! # Example
//!
//! ```
//! use tensile::prelude::*;
//! use tensile::builders::{shear_springs, stretch_springs};
//! use nalgebra::Vector3;
//!
//! let topology = Topology::from_soup(4, &[[0, 1, 2, 3]]).unwrap();
//! let emb = Embedding3::from_points(&[
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(1.0, 1.0, 0.0),
//!     Vector3::new(0.0, 1.0, 0.0),
//! ]);
//! let geometry = Geometry::euclidean(&topology, &emb).unwrap();
//!
//! let mut springs = stretch_springs(&geometry, 10.0);
//! springs.extend(shear_springs(&geometry, 2.0).iter().copied());
//! assert_eq!(springs.len(), 6);
//!
//! // The reference shape is at rest
//! assert_eq!(Energy::new(springs).value(&emb), 0.0);
//! ```

use std::collections::HashSet;

use crate::energy::{Charges, Hinge, Hinges, Spring, Springs};
use crate::geometry::{Geometry, Metric};
use crate::mesh::{FaceId, HalfEdgeId, Topology};

/// Side length of the parameter cell around a vertex.
#[derive(Clone, Copy)]
pub enum CellSize<'a> {
    /// Same size everywhere.
    Uniform(f64),
    /// Size looked up per vertex index.
    PerVertex(&'a dyn Fn(usize) -> f64),
}

impl CellSize<'_> {
    /// Cell size at vertex `i`.
    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        match self {
            CellSize::Uniform(size) => *size,
            CellSize::PerVertex(size) => size(i),
        }
    }
}

impl From<f64> for CellSize<'_> {
    fn from(size: f64) -> Self {
        CellSize::Uniform(size)
    }
}

impl std::fmt::Debug for CellSize<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellSize::Uniform(size) => f.debug_tuple("Uniform").field(size).finish(),
            CellSize::PerVertex(_) => f.write_str("PerVertex(..)"),
        }
    }
}

fn is_quad(topology: &Topology, f: FaceId) -> bool {
    topology.face(f).degree() == 4
}

fn warn_skipped(builder: &str, expected: &str, skipped: usize) {
    if skipped > 0 {
        log::warn!("{}: skipped {} faces that are not {}", builder, skipped, expected);
    }
}

/// Spring between `u` and `v` at their reference distance.
fn rest_spring<M: Metric>(geometry: &Geometry<'_, M>, u: usize, v: usize, k: f64) -> Spring {
    Spring::new(u, v, k, geometry.local_distance(u, v))
}

/// One spring per unique edge.
///
/// Stiffness is `k` times the rest length, so the response of a chain of
/// springs does not depend on how finely it is subdivided.
pub fn stretch_springs<M: Metric>(geometry: &Geometry<'_, M>, k: f64) -> Springs {
    let topology = geometry.topology();
    topology
        .unique_edges()
        .iter()
        .map(|&he| {
            let u = topology.origin(he).index();
            let v = topology.dest(he).index();
            let rest = geometry.local_distance(u, v);
            Spring::new(u, v, k * rest, rest)
        })
        .collect()
}

/// Springs on both diagonals of every quad.
pub fn shear_springs<M: Metric>(geometry: &Geometry<'_, M>, k: f64) -> Springs {
    let topology = geometry.topology();
    let mut springs = Springs::new();
    let mut skipped = 0;

    for f in topology.face_ids() {
        let [a, b, c, d] = match topology.face_vertices(f) {
            &[a, b, c, d] => [a.index(), b.index(), c.index(), d.index()],
            _ => {
                skipped += 1;
                continue;
            }
        };
        springs.push(rest_spring(geometry, a, c, k));
        springs.push(rest_spring(geometry, b, d, k));
    }

    warn_skipped("shear_springs", "quads", skipped);
    springs
}

/// Springs that skip over one quad row, resisting folds across quad edges.
///
/// For a half-edge `h` in a quad, the edge `next(h)` is crossed into the
/// neighbouring quad and a spring joins `origin(h)` to the vertex facing it on
/// the far side. Each vertex pair is emitted once.
pub fn bend_springs<M: Metric>(geometry: &Geometry<'_, M>, k: f64) -> Springs {
    let topology = geometry.topology();
    let mut springs = Springs::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut skipped = 0;

    for f in topology.face_ids() {
        if !is_quad(topology, f) {
            skipped += 1;
            continue;
        }

        for h in topology.face_halfedges(f) {
            let Some(across) = topology.twin(topology.next(h)) else {
                continue;
            };
            if !is_quad(topology, topology.face_of(across)) {
                continue;
            }

            let u = topology.origin(h).index();
            let far = topology.origin(topology.next(topology.next(across))).index();
            if u == far {
                continue;
            }

            if seen.insert((u.min(far), u.max(far))) {
                springs.push(rest_spring(geometry, u, far, k));
            }
        }
    }

    warn_skipped("bend_springs", "quads", skipped);
    springs
}

/// Springs joining every boundary vertex to the one two steps further along
/// its boundary loop.
pub fn boundary_springs<M: Metric>(geometry: &Geometry<'_, M>, k: f64) -> Springs {
    let topology = geometry.topology();
    let mut springs = Springs::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for &e in topology.boundary_edges() {
        let Some(next) = topology.next_boundary_edge(e) else {
            continue;
        };

        let u = topology.origin(e).index();
        let w = topology.dest(next).index();
        if u == w {
            continue;
        }

        if seen.insert((u.min(w), u.max(w))) {
            springs.push(rest_spring(geometry, u, w, k));
        }
    }

    springs
}

/// Hinge for the interior edge `he` if both incident faces are triangles.
fn triangle_hinge(topology: &Topology, he: HalfEdgeId, k: f64) -> Option<Hinge> {
    let twin = topology.twin(he)?;
    if topology.face(topology.face_of(he)).degree() != 3
        || topology.face(topology.face_of(twin)).degree() != 3
    {
        return None;
    }

    let a = topology.origin(he).index();
    let b = topology.dest(he).index();
    let c = topology.origin(topology.next(topology.next(he))).index();
    let d = topology.origin(topology.next(topology.next(twin))).index();
    Some(Hinge::new(a, b, c, d, k))
}

/// One dihedral hinge per interior edge shared by two triangles.
pub fn bend_hinges(topology: &Topology, k: f64) -> Hinges {
    let skipped = topology.face_ids().filter(|&f| topology.face(f).degree() != 3).count();
    warn_skipped("bend_hinges", "triangles", skipped);

    topology
        .unique_edges()
        .iter()
        .filter_map(|&he| triangle_hinge(topology, he, k))
        .collect()
}

/// One charge of magnitude `q` on every vertex.
pub fn vertex_charges(topology: &Topology, q: f64) -> Charges {
    Charges::uniform((0..topology.num_vertices()).collect(), q)
}

/// One charge per vertex, proportional to the reference area of its parameter
/// cell: `density · local_area(i, du(i), dv(i))`.
pub fn area_charges<'c, M: Metric>(
    geometry: &Geometry<'_, M>,
    density: f64,
    du: impl Into<CellSize<'c>>,
    dv: impl Into<CellSize<'c>>,
) -> Charges {
    let (du, dv) = (du.into(), dv.into());
    (0..geometry.topology().num_vertices())
        .map(|i| (i, density * geometry.local_area(i, du.at(i), dv.at(i))))
        .collect()
}
