//! Benchmarks for topology construction and Catmull-Clark subdivision.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use quadsmooth::prelude::*;

fn create_cube_mesh() -> Mesh {
    let vertices = vec![
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, 1.0, 1.0),
    ];
    let faces = [
        [0usize, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [1, 2, 6, 5],
        [3, 0, 4, 7],
    ];
    Mesh::from_polygons(vertices, &faces).unwrap()
}

/// A closed quad mesh with 6 * 4^levels faces.
fn create_dense_cube(levels: usize) -> Mesh {
    subdivide(&create_cube_mesh(), levels).unwrap()
}

fn bench_topology(c: &mut Criterion) {
    let mesh = create_dense_cube(4);

    c.bench_function("topology_cube_1536", |b| {
        b.iter(|| Topology::from_mesh(&mesh).unwrap());
    });
}

fn bench_catmull_clark(c: &mut Criterion) {
    let mut group = c.benchmark_group("catmull_clark");

    let cube = create_cube_mesh();
    for iterations in [1usize, 2, 3] {
        group.bench_with_input(
            BenchmarkId::new("cube", iterations),
            &iterations,
            |b, &iterations| {
                let options = SubdivideOptions::new(iterations);
                b.iter(|| catmull_clark_subdivide(&cube, &options).unwrap());
            },
        );
    }

    let dense = create_dense_cube(4);
    for parallel in [false, true] {
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(BenchmarkId::new("cube_1536", label), |b| {
            let options = SubdivideOptions::new(1).with_parallel(parallel);
            b.iter(|| catmull_clark_subdivide(&dense, &options).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_topology, bench_catmull_clark);
criterion_main!(benches);
