// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cross-section cap triangulation
//!
//! The cut points are projected onto a 2D basis in the plane, wrapped with a
//! monotone-chain convex hull and fan triangulated. Only convex sections are
//! reproduced faithfully.

use super::plane::Plane;
use super::texture_region::TextureRegion;
use super::triangle::Triangle;
use crate::utils::math::tri_area_2d;
use nalgebra::{Point3, Unit, Vector2, Vector3};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
struct Mapped {
    position: Point3<f64>,
    projected: Vector2<f64>,
}

fn turn(a: &Mapped, b: &Mapped, c: &Mapped) -> f64 {
    tri_area_2d(
        a.projected.x,
        a.projected.y,
        b.projected.x,
        b.projected.y,
        c.projected.x,
        c.projected.y,
    )
}

/// `b` bends the chain `a -> b -> c` left by more than `epsilon`
fn turns_left(a: &Mapped, b: &Mapped, c: &Mapped, epsilon: f64) -> bool {
    turn(a, b, c) > epsilon * (c.projected - a.projected).norm()
}

fn lexicographic(a: &Mapped, b: &Mapped) -> Ordering {
    a.projected
        .x
        .total_cmp(&b.projected.x)
        .then(a.projected.y.total_cmp(&b.projected.y))
}

/// In-plane basis `(u, v)` for a plane facing `normal`
pub fn plane_basis(normal: &Unit<Vector3<f64>>) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let n = normal.into_inner();
    let u = n
        .cross(&Vector3::y())
        .try_normalize(f64::EPSILON)
        .or_else(|| n.cross(&Vector3::z()).try_normalize(f64::EPSILON))?;
    let v = u.cross(&n);
    Some((u, v))
}

/// Triangulate the convex hull of `points`, all lying on `plane`.
///
/// Points closer than the plane's tolerance are merged, and hull corners
/// within that tolerance of the line through their neighbours are dropped.
/// Every output vertex has the plane normal, a UV normalized over the bounds
/// of the projected points and remapped into `region`, and a tangent when the
/// UV basis is well formed. The triangles wind so their geometric normal
/// points along `-normal`.
///
/// Returns `None` for fewer than three points or a hull with fewer than three
/// corners.
pub fn monotone_chain(
    points: &[Point3<f64>],
    plane: &Plane,
    region: &TextureRegion,
) -> Option<Vec<Triangle>> {
    if points.len() < 3 {
        return None;
    }

    let normal = plane.normal();
    let epsilon = plane.epsilon();
    let (u, v) = plane_basis(normal)?;

    let mut min = Vector2::repeat(f64::MAX);
    let mut max = Vector2::repeat(f64::MIN);

    let mut sorted: Vec<Mapped> = points
        .iter()
        .map(|p| {
            let projected = Vector2::new(p.coords.dot(&u), p.coords.dot(&v));
            min = min.inf(&projected);
            max = max.sup(&projected);
            Mapped {
                position: *p,
                projected,
            }
        })
        .collect();

    sorted.sort_by(lexicographic);
    let merged = merge_close(sorted, epsilon);

    let hull = convex_hull(&merged, epsilon);
    if hull.len() < 3 {
        return None;
    }

    let extent = max - min;
    let normalize = |p: &Vector2<f64>| {
        let axis = |value: f64, lo: f64, size: f64| if size > 0.0 { (value - lo) / size } else { 0.0 };
        region.map(&Vector2::new(
            axis(p.x, min.x, extent.x),
            axis(p.y, min.y, extent.y),
        ))
    };

    let n = normal.into_inner();
    let first = &hull[0];
    let triangles = hull[1..]
        .windows(2)
        .map(|pair| {
            let corners = [first, &pair[0], &pair[1]];
            let triangle = Triangle::new(corners[0].position, corners[1].position, corners[2].position)
                .with_uvs(corners.map(|c| normalize(&c.projected)))
                .with_normals([n; 3]);

            match triangle.compute_tangents() {
                Some(tangents) => triangle.with_tangents(tangents),
                None => triangle,
            }
        })
        .collect();

    Some(triangles)
}

/// Drop points within `epsilon` of an earlier one. Keeps the sort order.
fn merge_close(sorted: Vec<Mapped>, epsilon: f64) -> Vec<Mapped> {
    let mut merged: Vec<Mapped> = Vec::with_capacity(sorted.len());

    for point in sorted {
        let duplicate = merged
            .iter()
            .rev()
            .take_while(|kept| point.projected.x - kept.projected.x <= epsilon)
            .any(|kept| (kept.projected - point.projected).amax() <= epsilon);
        if !duplicate {
            merged.push(point);
        }
    }

    merged
}

/// Andrew's monotone chain over lexicographically sorted points.
/// Points within `epsilon` of a hull edge are dropped.
fn convex_hull(sorted: &[Mapped], epsilon: f64) -> Vec<Mapped> {
    let mut hull: Vec<Mapped> = Vec::with_capacity(sorted.len() * 2);

    // Lower chain
    for p in sorted {
        while hull.len() >= 2 && !turns_left(&hull[hull.len() - 2], &hull[hull.len() - 1], p, epsilon) {
            hull.pop();
        }
        hull.push(*p);
    }

    // Upper chain
    let lower_len = hull.len() + 1;
    for p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && !turns_left(&hull[hull.len() - 2], &hull[hull.len() - 1], p, epsilon)
        {
            hull.pop();
        }
        hull.push(*p);
    }

    // Closing point repeats the first
    hull.pop();
    hull
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn y_plane() -> Plane {
        Plane::new(Vector3::y_axis(), 0.0)
    }

    fn square_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(-0.5, 0.0, -0.5),
            Point3::new(0.5, 0.0, -0.5),
            Point3::new(0.5, 0.0, 0.5),
            Point3::new(-0.5, 0.0, 0.5),
        ]
    }

    #[test]
    fn test_square_cap() {
        let triangles = monotone_chain(&square_points(), &y_plane(), &TextureRegion::full()).unwrap();

        assert_eq!(triangles.len(), 2);
        let area: f64 = triangles.iter().map(Triangle::area).sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cap_faces_against_normal() {
        let normal = Vector3::y_axis();
        let triangles = monotone_chain(&square_points(), &y_plane(), &TextureRegion::full()).unwrap();

        for triangle in &triangles {
            assert_relative_eq!(triangle.face_normal(), -normal.into_inner(), epsilon = 1e-12);
            for n in triangle.normals().unwrap() {
                assert_relative_eq!(*n, normal.into_inner());
            }
        }
    }

    #[test]
    fn test_drops_duplicates_and_interior_points() {
        let mut points = square_points();
        points.extend(square_points());
        points.push(Point3::new(0.0, 0.0, 0.0));
        points.push(Point3::new(0.5, 0.0, 0.0));

        let triangles = monotone_chain(&points, &y_plane(), &TextureRegion::full()).unwrap();
        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn test_merges_nearly_equal_points() {
        // The same edge crossing computed from both neighbouring triangles
        let mut points = square_points();
        points.extend(square_points().iter().map(|p| p + Vector3::new(1e-13, 0.0, -1e-13)));
        points.push(Point3::new(0.0, 0.0, -0.5 - 1e-12));
        points.push(Point3::new(0.5 + 1e-12, 0.0, 0.1));

        let triangles = monotone_chain(&points, &y_plane(), &TextureRegion::full()).unwrap();
        assert_eq!(triangles.len(), 2);
        for triangle in &triangles {
            assert_relative_eq!(triangle.area(), 0.5, epsilon = 1e-9);
            assert_relative_eq!(triangle.face_normal(), -Vector3::y(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_merge_keeps_points_beyond_tolerance() {
        let plane = Plane::new(Vector3::y_axis(), 0.0).with_epsilon(0.0);
        let mut points = square_points();
        points.push(Point3::new(0.0, 0.0, -0.5 - 1e-3));

        let triangles = monotone_chain(&points, &plane, &TextureRegion::full()).unwrap();
        assert_eq!(triangles.len(), 3);
    }

    #[test]
    fn test_uvs_span_region() {
        let region = TextureRegion::new(0.5, 0.5, 1.0, 1.0);
        let triangles = monotone_chain(&square_points(), &y_plane(), &region).unwrap();

        let uvs: Vec<Vector2<f64>> = triangles
            .iter()
            .flat_map(|t| t.uvs().unwrap().to_vec())
            .collect();
        let min_u = uvs.iter().map(|uv| uv.x).fold(f64::MAX, f64::min);
        let max_u = uvs.iter().map(|uv| uv.x).fold(f64::MIN, f64::max);
        let min_v = uvs.iter().map(|uv| uv.y).fold(f64::MAX, f64::min);
        let max_v = uvs.iter().map(|uv| uv.y).fold(f64::MIN, f64::max);

        assert_relative_eq!(min_u, 0.5);
        assert_relative_eq!(max_u, 1.0);
        assert_relative_eq!(min_v, 0.5);
        assert_relative_eq!(max_v, 1.0);
    }

    #[test]
    fn test_cap_has_tangents() {
        let triangles = monotone_chain(&square_points(), &y_plane(), &TextureRegion::full()).unwrap();
        for triangle in &triangles {
            assert!(triangle.has_tangents());
        }
    }

    #[test]
    fn test_normal_parallel_to_y_uses_fallback_basis() {
        let (u, v) = plane_basis(&Vector3::y_axis()).unwrap();
        assert_relative_eq!(u.dot(&v), 0.0);
        assert_relative_eq!(u.norm(), 1.0);
        assert_relative_eq!(v.norm(), 1.0);
    }

    #[test]
    fn test_degenerate_input() {
        let region = TextureRegion::full();
        let plane = y_plane();

        assert!(monotone_chain(&square_points()[..2], &plane, &region).is_none());

        let collinear = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(monotone_chain(&collinear, &plane, &region).is_none());
    }
}
