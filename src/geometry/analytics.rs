// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics

use super::mesh::MeshBuffers;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Quantization applied to positions before edges are matched
const WELD_SCALE: f64 = 1e6;

/// Geometry statistics and analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume, signed by winding
    pub volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    /// Average vertex position [x, y, z]
    pub centroid: [f64; 3],
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub submesh_count: usize,
    /// Every edge, after welding coincident positions, is used an even number of times
    pub is_closed: bool,
}

impl GeometryStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            centroid: [0.0; 3],
            vertex_count: 0,
            triangle_count: 0,
            submesh_count: 0,
            is_closed: false,
        }
    }

    /// Size along each axis
    pub fn extent(&self) -> [f64; 3] {
        [
            self.bbox[3] - self.bbox[0],
            self.bbox[4] - self.bbox[1],
            self.bbox[5] - self.bbox[2],
        ]
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &MeshBuffers) -> GeometryStats {
    let vertex_count = mesh.vertex_count();
    let triangle_count = mesh.triangle_count();

    if vertex_count == 0 || triangle_count == 0 {
        return GeometryStats::empty();
    }

    GeometryStats {
        volume: mesh.signed_volume(),
        surface_area: mesh.surface_area(),
        bbox: mesh.bounding_box().to_array(),
        centroid: calculate_centroid(&mesh.positions),
        vertex_count,
        triangle_count,
        submesh_count: mesh.submesh_count(),
        is_closed: check_closed(mesh),
    }
}

fn calculate_centroid(positions: &[Point3<f64>]) -> [f64; 3] {
    let sum = positions
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
    let mean = sum / positions.len() as f64;
    [mean.x, mean.y, mean.z]
}

type PointKey = (i64, i64, i64);

fn point_key(p: &Point3<f64>) -> PointKey {
    (
        (p.x * WELD_SCALE).round() as i64,
        (p.y * WELD_SCALE).round() as i64,
        (p.z * WELD_SCALE).round() as i64,
    )
}

/// Closed-surface check over welded positions.
///
/// Triangle soups (one vertex per corner) are handled, which is how the
/// slicer emits its hulls. An edge may be matched by a chain of collinear
/// edges on the other side (a T-junction), as happens where a cap meets
/// side faces that kept every cut point.
fn check_closed(mesh: &MeshBuffers) -> bool {
    let mut corners: HashMap<PointKey, Point3<f64>> = HashMap::new();
    let mut odd: HashSet<(PointKey, PointKey)> = HashSet::new();
    let mut has_edges = false;

    for triangle in mesh.triangles() {
        let positions = triangle.positions();
        let keys = positions.map(|p| point_key(&p));

        for i in 0..3 {
            corners.entry(keys[i]).or_insert(positions[i]);
            let (k1, k2) = (keys[i], keys[(i + 1) % 3]);
            if k1 == k2 {
                continue;
            }
            has_edges = true;
            toggle(&mut odd, k1, k2);
        }
    }

    if !has_edges {
        return false;
    }
    if odd.is_empty() {
        return true;
    }

    // Split every unmatched edge at the boundary vertices lying on it
    let boundary: HashSet<PointKey> = odd.iter().flat_map(|&(a, b)| [a, b]).collect();
    let mut remaining: HashSet<(PointKey, PointKey)> = HashSet::new();

    for &(a, b) in &odd {
        let (Some(p), Some(q)) = (corners.get(&a), corners.get(&b)) else {
            return false;
        };

        let mut inner: Vec<(f64, PointKey)> = boundary
            .iter()
            .filter(|&&k| k != a && k != b)
            .filter_map(|k| {
                let r = corners.get(k)?;
                param_on_segment(p, q, r).map(|t| (t, *k))
            })
            .collect();
        inner.sort_by(|x, y| x.0.total_cmp(&y.0));

        let mut from = a;
        for to in inner.into_iter().map(|(_, k)| k).chain(std::iter::once(b)) {
            toggle(&mut remaining, from, to);
            from = to;
        }
    }

    remaining.is_empty()
}

fn toggle(edges: &mut HashSet<(PointKey, PointKey)>, k1: PointKey, k2: PointKey) {
    let edge = if k1 < k2 { (k1, k2) } else { (k2, k1) };
    if !edges.remove(&edge) {
        edges.insert(edge);
    }
}

/// Position of `r` along the open segment `p -> q`, if it lies on it
fn param_on_segment(p: &Point3<f64>, q: &Point3<f64>, r: &Point3<f64>) -> Option<f64> {
    let direction = q - p;
    let length_sq = direction.norm_squared();
    if length_sq == 0.0 {
        return None;
    }

    let offset = r - p;
    let t = offset.dot(&direction) / length_sq;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }

    ((offset - direction * t).norm() <= 1.0 / WELD_SCALE).then_some(t)
}
