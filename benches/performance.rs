// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hullslice::geometry::{intersect_triangle, monotone_chain, IntersectionResult, Primitive};
use hullslice::{MeshBuffers, Plane, SliceConfig, Slicer, TextureRegion};
use nalgebra::{Point3, Vector3};

fn oblique_plane() -> Plane {
    Plane::try_from_point_direction(&Point3::new(0.05, 0.1, -0.05), Vector3::new(0.2, 1.0, 0.3))
        .unwrap()
}

/// Sphere indices split into `ranges` submeshes
fn ranged_sphere(segments: u32, ranges: usize) -> MeshBuffers {
    let mut mesh = Primitive::sphere(1.0, segments).to_mesh();
    let indices = mesh.submeshes.remove(0);
    let chunk = (indices.len() / 3).div_ceil(ranges) * 3;
    mesh.submeshes = indices.chunks(chunk).map(<[u32]>::to_vec).collect();
    mesh
}

fn bench_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersect");
    let plane = oblique_plane();
    let mesh = Primitive::sphere(1.0, 64).to_mesh();
    let triangles: Vec<_> = mesh.triangles().collect();

    group.bench_function("sphere_64_triangles", |b| {
        let mut result = IntersectionResult::new();
        b.iter(|| {
            let mut split = 0;
            for triangle in &triangles {
                if intersect_triangle(black_box(&plane), triangle, &mut result) {
                    split += 1;
                }
            }
            split
        });
    });

    group.finish();
}

fn bench_cap(c: &mut Criterion) {
    let mut group = c.benchmark_group("cap");
    let plane = Plane::new(Vector3::y_axis(), 0.0);
    let region = TextureRegion::full();

    for count in [16usize, 256, 4096] {
        let points: Vec<Point3<f64>> = (0..count)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / count as f64;
                Point3::new(angle.cos(), 0.0, angle.sin())
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("monotone_chain", count), &points, |b, points| {
            b.iter(|| monotone_chain(black_box(points), &plane, &region));
        });
    }

    group.finish();
}

fn bench_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice");
    let plane = oblique_plane();
    let slicer = Slicer::default();

    let cube = Primitive::cube(1.0).to_mesh();
    group.bench_function("cube", |b| {
        b.iter(|| slicer.slice_by_plane(black_box(&cube), &plane).unwrap());
    });

    for segments in [32u32, 64, 128] {
        let sphere = Primitive::sphere(1.0, segments).to_mesh();
        group.bench_with_input(BenchmarkId::new("sphere", segments), &sphere, |b, mesh| {
            b.iter(|| slicer.slice_by_plane(black_box(mesh), &plane).unwrap());
        });
    }

    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel");
    let plane = oblique_plane();
    let mesh = ranged_sphere(256, 16);

    let sequential = Slicer::default();
    let parallel = Slicer::new(SliceConfig {
        parallel: true,
        ..SliceConfig::default()
    });

    group.bench_function("sequential", |b| {
        b.iter(|| sequential.slice_by_plane(black_box(&mesh), &plane).unwrap());
    });

    group.bench_function("rayon", |b| {
        b.iter(|| parallel.slice_by_plane(black_box(&mesh), &plane).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_intersect,
    bench_cap,
    bench_slice,
    bench_parallel
);
criterion_main!(benches);
