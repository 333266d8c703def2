// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Segment and triangle intersection against a cutting plane
//!
//! A triangle crossing the plane is split into two or three pieces which are
//! sorted into the upper (`Above`) and lower (`Below`) hulls. Every generated
//! vertex takes its attributes from the barycentric weights of the original
//! triangle, never from an intermediate piece.

use super::plane::{Plane, SideOfPlane};
use super::triangle::Triangle;
use nalgebra::Point3;

/// Reusable output buffer for [`intersect_triangle`].
///
/// Cleared at the start of every call, so one instance can be threaded
/// through a whole slice without reallocating.
#[derive(Debug, Clone, Default)]
pub struct IntersectionResult {
    upper: Vec<Triangle>,
    lower: Vec<Triangle>,
    points: Vec<Point3<f64>>,
}

impl IntersectionResult {
    pub fn new() -> Self {
        Self {
            upper: Vec::with_capacity(2),
            lower: Vec::with_capacity(2),
            points: Vec::with_capacity(2),
        }
    }

    pub fn clear(&mut self) {
        self.upper.clear();
        self.lower.clear();
        self.points.clear();
    }

    /// Pieces on the positive side of the plane
    pub fn upper_hull(&self) -> &[Triangle] {
        &self.upper
    }

    /// Pieces on the negative side of the plane
    pub fn lower_hull(&self) -> &[Triangle] {
        &self.lower
    }

    /// Points created on the plane by the split
    pub fn intersection_points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn is_valid(&self) -> bool {
        !self.upper.is_empty() || !self.lower.is_empty()
    }

    fn add(&mut self, side: SideOfPlane, triangle: Triangle) {
        match side {
            SideOfPlane::Above => self.upper.push(triangle),
            _ => self.lower.push(triangle),
        }
    }
}

/// Point where segment `a -> b` crosses the plane.
///
/// The segment parameter may overshoot `[0, 1]` by the plane's tolerance.
/// Segments parallel to the plane never intersect.
pub fn intersect_segment(plane: &Plane, a: &Point3<f64>, b: &Point3<f64>) -> Option<Point3<f64>> {
    let ab = b - a;
    let denom = plane.normal().dot(&ab);

    if denom == 0.0 {
        return None;
    }

    let t = (plane.distance() - plane.normal().dot(&a.coords)) / denom;
    if !t.is_finite() {
        return None;
    }

    let eps = plane.epsilon();
    if t >= -eps && t <= 1.0 + eps {
        Some(a + ab * t)
    } else {
        None
    }
}

/// Split `triangle` by `plane`, writing the pieces into `result`.
///
/// Returns `false` when the triangle does not need splitting: all corners on
/// one side, an edge lying in the plane, or an expected crossing that could
/// not be computed. The caller then assigns the whole triangle to one hull.
pub fn intersect_triangle(plane: &Plane, triangle: &Triangle, result: &mut IntersectionResult) -> bool {
    result.clear();

    let [a, b, c] = triangle.positions();
    let sides = [plane.classify(a), plane.classify(b), plane.classify(c)];

    if sides[0] == sides[1] && sides[1] == sides[2] {
        return false;
    }

    let on_count = sides.iter().filter(|&&s| s == SideOfPlane::On).count();

    match on_count {
        1 => split_through_vertex(plane, triangle, &sides, result),
        0 => split_lone_vertex(plane, triangle, &sides, result),
        // Edge in the plane
        _ => false,
    }
}

/// One corner on the plane, the other two on opposite sides
fn split_through_vertex(
    plane: &Plane,
    triangle: &Triangle,
    sides: &[SideOfPlane; 3],
    result: &mut IntersectionResult,
) -> bool {
    let Some(k) = sides.iter().position(|&s| s == SideOfPlane::On) else {
        return false;
    };
    let (p, q) = ((k + 1) % 3, (k + 2) % 3);

    if sides[p] == sides[q] {
        return false;
    }

    let positions = triangle.positions();
    let Some(x) = intersect_segment(plane, &positions[p], &positions[q]) else {
        return false;
    };

    let on = triangle.vertex(k);
    let cut = triangle.vertex_at(&x);

    result.add(sides[p], Triangle::from_vertices([on, triangle.vertex(p), cut]));
    result.add(sides[q], Triangle::from_vertices([on, cut, triangle.vertex(q)]));

    result.points.push(x);
    result.points.push(on.position);

    true
}

/// No corner on the plane; one corner alone on its side
fn split_lone_vertex(
    plane: &Plane,
    triangle: &Triangle,
    sides: &[SideOfPlane; 3],
    result: &mut IntersectionResult,
) -> bool {
    let lone = if sides[0] == sides[1] {
        2
    } else if sides[0] == sides[2] {
        1
    } else {
        0
    };
    let (n1, n2) = ((lone + 1) % 3, (lone + 2) % 3);

    let positions = triangle.positions();
    let (Some(x1), Some(x2)) = (
        intersect_segment(plane, &positions[lone], &positions[n1]),
        intersect_segment(plane, &positions[lone], &positions[n2]),
    ) else {
        return false;
    };

    let cut1 = triangle.vertex_at(&x1);
    let cut2 = triangle.vertex_at(&x2);
    let other_side = sides[n1];

    result.add(
        sides[lone],
        Triangle::from_vertices([triangle.vertex(lone), cut1, cut2]),
    );
    result.add(
        other_side,
        Triangle::from_vertices([cut1, triangle.vertex(n1), triangle.vertex(n2)]),
    );
    result.add(
        other_side,
        Triangle::from_vertices([cut2, cut1, triangle.vertex(n2)]),
    );

    result.points.push(x1);
    result.points.push(x2);

    true
}
