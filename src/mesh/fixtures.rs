//! Small meshes shared by the unit tests.

use nalgebra::Vector3;

use super::Topology;
use crate::embedding::Embedding3;

/// Icosahedron faces with consistent counter-clockwise orientation.
pub(crate) const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

pub(crate) fn icosahedron_topology() -> Topology {
    Topology::from_soup(12, &ICOSAHEDRON_FACES).unwrap()
}

pub(crate) fn icosahedron_embedding() -> Embedding3 {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    Embedding3::from_points(&[
        Vector3::new(-1.0, t, 0.0),
        Vector3::new(1.0, t, 0.0),
        Vector3::new(-1.0, -t, 0.0),
        Vector3::new(1.0, -t, 0.0),
        Vector3::new(0.0, -1.0, t),
        Vector3::new(0.0, 1.0, t),
        Vector3::new(0.0, -1.0, -t),
        Vector3::new(0.0, 1.0, -t),
        Vector3::new(t, 0.0, -1.0),
        Vector3::new(t, 0.0, 1.0),
        Vector3::new(-t, 0.0, -1.0),
        Vector3::new(-t, 0.0, 1.0),
    ])
}

/// Vertex `(i, j)` of an `nx` by `ny` grid has index `j * (nx + 1) + i`.
fn grid_embedding(nx: usize, ny: usize) -> Embedding3 {
    let points: Vec<Vector3<f64>> = (0..=ny)
        .flat_map(|j| (0..=nx).map(move |i| Vector3::new(i as f64, j as f64, 0.0)))
        .collect();
    Embedding3::from_points(&points)
}

fn grid_cell(nx: usize, i: usize, j: usize) -> [usize; 4] {
    let v00 = j * (nx + 1) + i;
    let v10 = v00 + 1;
    let v01 = v00 + nx + 1;
    let v11 = v01 + 1;
    [v00, v10, v11, v01]
}

/// Unit quads in the xy-plane, face `(i, j)` at index `j * nx + i`.
pub(crate) fn quad_grid(nx: usize, ny: usize) -> (Topology, Embedding3) {
    let faces: Vec<[usize; 4]> = (0..ny)
        .flat_map(|j| (0..nx).map(move |i| grid_cell(nx, i, j)))
        .collect();
    let topology = Topology::from_soup((nx + 1) * (ny + 1), &faces).unwrap();
    (topology, grid_embedding(nx, ny))
}

pub(crate) fn quad_grid_topology(nx: usize, ny: usize) -> Topology {
    quad_grid(nx, ny).0
}

/// Each unit quad split along its `v00-v11` diagonal.
pub(crate) fn triangle_grid(nx: usize, ny: usize) -> (Topology, Embedding3) {
    let faces: Vec<[usize; 3]> = (0..ny)
        .flat_map(|j| (0..nx).map(move |i| grid_cell(nx, i, j)))
        .flat_map(|[v00, v10, v11, v01]| [[v00, v10, v11], [v00, v11, v01]])
        .collect();
    let topology = Topology::from_soup((nx + 1) * (ny + 1), &faces).unwrap();
    (topology, grid_embedding(nx, ny))
}
