// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Invariants checked over many random planes through a sphere

use anyhow::{Context, Result};
use approx::assert_relative_eq;
use hullslice::geometry::analyze;
use hullslice::geometry::primitives::{cube, uv_sphere};
use hullslice::{HullSide, MeshBuffers, Plane, SideOfPlane, SlicedHull, Slicer};
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f64 = 1e-9;

fn random_plane(rng: &mut StdRng) -> Result<Plane> {
    let point = Point3::new(
        rng.gen_range(-0.4..0.4),
        rng.gen_range(-0.4..0.4),
        rng.gen_range(-0.4..0.4),
    );
    let direction = Vector3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    Ok(Plane::try_from_point_direction(&point, direction)?)
}

/// Slices of a sphere by planes that pass near its center
fn sliced_spheres(seed: u64, count: usize) -> Result<Vec<(MeshBuffers, Plane, SlicedHull)>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mesh = uv_sphere(1.0, 24, 12);
    let slicer = Slicer::default();

    let mut slices = Vec::with_capacity(count);
    while slices.len() < count {
        let Ok(plane) = random_plane(&mut rng) else {
            continue;
        };
        let hull = slicer
            .slice_by_plane(&mesh, &plane)?
            .with_context(|| format!("{:?} should cut the sphere", plane))?;
        slices.push((mesh.clone(), plane, hull));
    }
    Ok(slices)
}

#[test]
fn test_surface_area_is_partitioned() -> Result<()> {
    for (mesh, _, hull) in sliced_spheres(7, 40)? {
        let original = mesh.surface_area();
        let split: f64 = [HullSide::Upper, HullSide::Lower]
            .into_iter()
            .map(|side| {
                hull.hull(side)
                    .submesh_triangles(0)
                    .map(|t| t.area())
                    .sum::<f64>()
            })
            .sum();

        assert_relative_eq!(split, original, epsilon = TOLERANCE);
    }
    Ok(())
}

#[test]
fn test_hulls_stay_on_their_side() -> Result<()> {
    for (_, plane, hull) in sliced_spheres(11, 40)? {
        for p in &hull.upper().positions {
            assert!(
                plane.signed_distance(p) >= -TOLERANCE,
                "upper vertex {:?} below {:?}",
                p,
                plane
            );
        }
        for p in &hull.lower().positions {
            assert!(
                plane.signed_distance(p) <= TOLERANCE,
                "lower vertex {:?} above {:?}",
                p,
                plane
            );
        }
    }
    Ok(())
}

#[test]
fn test_cap_lies_in_plane() -> Result<()> {
    for (_, plane, hull) in sliced_spheres(13, 40)? {
        let cap = hull.cap_submesh().context("sphere sections are always capped")?;

        for side in [HullSide::Upper, HullSide::Lower] {
            let mesh = hull.hull(side);
            for triangle in mesh.submesh_triangles(cap) {
                for p in triangle.positions() {
                    assert_eq!(plane.classify(p), SideOfPlane::On);
                }

                // Caps face out of the hull they close
                let outward = match side {
                    HullSide::Upper => -plane.normal().into_inner(),
                    HullSide::Lower => plane.normal().into_inner(),
                };
                assert_relative_eq!(triangle.face_normal(), outward, epsilon = 1e-6);
            }
        }
    }
    Ok(())
}

#[test]
fn test_volume_is_conserved() -> Result<()> {
    for (mesh, _, hull) in sliced_spheres(17, 40)? {
        let upper = hull.upper().signed_volume();
        let lower = hull.lower().signed_volume();

        assert!(upper > 0.0 && lower > 0.0);
        assert_relative_eq!(upper + lower, mesh.signed_volume(), epsilon = TOLERANCE);
    }
    Ok(())
}

#[test]
fn test_hull_stats() -> Result<()> {
    for (mesh, _, hull) in sliced_spheres(19, 10)? {
        let original = analyze(&mesh);
        let upper = analyze(hull.upper());
        let lower = analyze(hull.lower());

        assert_eq!(upper.submesh_count, 2);
        assert_eq!(lower.submesh_count, 2);
        assert!(upper.surface_area < original.surface_area + 4.0);

        for stats in [&upper, &lower] {
            for axis in 0..3 {
                assert!(stats.bbox[axis] >= original.bbox[axis] - TOLERANCE);
                assert!(stats.bbox[axis + 3] <= original.bbox[axis + 3] + TOLERANCE);
            }
        }
    }
    Ok(())
}

#[test]
fn test_sphere_hulls_are_closed() -> Result<()> {
    for (_, plane, hull) in sliced_spheres(23, 40)? {
        assert!(analyze(hull.upper()).is_closed, "upper hull open for {:?}", plane);
        assert!(analyze(hull.lower()).is_closed, "lower hull open for {:?}", plane);
    }
    Ok(())
}

#[test]
fn test_cube_hulls_are_closed() -> Result<()> {
    let mesh = cube(1.0);
    let slicer = Slicer::default();
    let planes = [
        Plane::new(Vector3::y_axis(), 0.0),
        Plane::try_from_point_direction(&Point3::new(0.05, 0.1, -0.05), Vector3::new(0.2, 1.0, 0.3))?,
        Plane::try_from_point_direction(&Point3::new(0.1, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))?,
    ];

    for plane in planes {
        let hull = slicer
            .slice_by_plane(&mesh, &plane)?
            .with_context(|| format!("{:?} should cut the cube", plane))?;

        for side in [HullSide::Upper, HullSide::Lower] {
            let stats = analyze(hull.hull(side));
            assert!(stats.is_closed, "{:?} hull open for {:?}", side, plane);
        }
    }
    Ok(())
}
