//! Benchmarks for energy evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;
use tensile::builders::{bend_hinges, bend_springs, shear_springs, stretch_springs, vertex_charges};
use tensile::prelude::*;

fn create_grid(n: usize, triangles: bool) -> (Topology, Embedding3) {
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            points.push(Vector3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            if triangles {
                faces.push(vec![v00, v10, v11]);
                faces.push(vec![v00, v11, v01]);
            } else {
                faces.push(vec![v00, v10, v11, v01]);
            }
        }
    }

    let topology = Topology::from_soup(points.len(), &faces).unwrap();
    (topology, Embedding3::from_points(&points))
}

/// Lift the grid into a gentle bump so that no term sits at rest.
fn perturb(emb: &mut Embedding3) {
    for v in 0..emb.num_vertices() {
        let p = emb.position(v);
        let z = 0.3 * (0.7 * p.x).sin() * (0.5 * p.y).cos();
        emb.set_position_at(v, &Vector3::new(p.x * 1.05, p.y, z));
    }
}

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_soup");

    for n in [10, 50] {
        let (topology, emb) = create_grid(n, true);
        let faces: Vec<Vec<usize>> = topology
            .face_ids()
            .map(|f| topology.face_vertices(f).iter().map(|v| v.index()).collect())
            .collect();

        group.bench_with_input(BenchmarkId::new("triangle_grid", n), &faces, |b, faces| {
            b.iter(|| Topology::from_soup(emb.num_vertices(), black_box(faces)).unwrap())
        });
    }

    group.finish();
}

fn bench_builders(c: &mut Criterion) {
    let (topology, emb) = create_grid(50, false);
    let geometry = Geometry::euclidean(&topology, &emb).unwrap();

    c.bench_function("cloth_springs_50x50", |b| {
        b.iter(|| {
            let mut springs = stretch_springs(black_box(&geometry), 1.0);
            springs.extend(shear_springs(&geometry, 1.0).iter().copied());
            springs.extend(bend_springs(&geometry, 1.0).iter().copied());
            springs
        })
    });
}

fn bench_gradients(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient");

    let (quads, mut cloth) = create_grid(50, false);
    let geometry = Geometry::euclidean(&quads, &cloth).unwrap();
    let springs = Energy::new(stretch_springs(&geometry, 1.0));
    perturb(&mut cloth);
    let mut grad = vec![0.0; cloth.as_slice().len()];

    group.bench_function("springs_50x50", |b| {
        b.iter(|| springs.gradient(black_box(&cloth), &mut grad))
    });

    let mut rng = fastrand::Rng::with_seed(0);
    for fraction in [0.1, 0.5] {
        group.bench_with_input(
            BenchmarkId::new("springs_stochastic", fraction),
            &fraction,
            |b, &fraction| b.iter(|| springs.stochastic_gradient(&cloth, &mut grad, fraction, &mut rng)),
        );
    }

    let (triangles, mut sheet) = create_grid(50, true);
    let hinges = Energy::new(bend_hinges(&triangles, 1.0));
    perturb(&mut sheet);
    let mut grad = vec![0.0; sheet.as_slice().len()];

    group.bench_function("hinges_50x50", |b| {
        b.iter(|| hinges.gradient(black_box(&sheet), &mut grad))
    });

    let (small, mut blob) = create_grid(10, true);
    let charges = Energy::new(vertex_charges(&small, 0.1));
    perturb(&mut blob);
    let mut grad = vec![0.0; blob.as_slice().len()];

    group.bench_function("charges_11x11", |b| {
        b.iter(|| charges.gradient(black_box(&blob), &mut grad))
    });

    group.finish();
}

fn bench_local_value(c: &mut Criterion) {
    let (topology, mut emb) = create_grid(50, false);
    let geometry = Geometry::euclidean(&topology, &emb).unwrap();
    let springs = Energy::new(stretch_springs(&geometry, 1.0));
    springs.build_index();
    perturb(&mut emb);

    c.bench_function("local_value_all_vertices", |b| {
        b.iter(|| {
            (0..emb.num_vertices())
                .map(|v| springs.local_value(black_box(&emb), v))
                .sum::<f64>()
        })
    });
}

criterion_group!(
    benches,
    bench_topology,
    bench_builders,
    bench_gradients,
    bench_local_value
);
criterion_main!(benches);
