// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh slicing
//!
//! Every triangle of every submesh is split against the plane, the cut
//! points from all submeshes are pooled into one cross-section cap, and the
//! two halves are reassembled into un-indexed mesh buffers.

use crate::config::SliceConfig;
use crate::error::SliceError;
use crate::geometry::{
    intersect_triangle, monotone_chain, IntersectionResult, MeshBuffers, Plane, SideOfPlane,
    Triangle,
};
use nalgebra::{Isometry3, Point3, Vector2, Vector3, Vector4};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

/// Which half of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HullSide {
    /// Positive side of the plane
    Upper,
    /// Negative side of the plane
    Lower,
}

/// Triangles of one submesh after splitting
#[derive(Debug, Clone, Default)]
pub struct SlicedSubmesh {
    pub upper: Vec<Triangle>,
    pub lower: Vec<Triangle>,
}

impl SlicedSubmesh {
    pub fn triangles(&self, side: HullSide) -> &[Triangle] {
        match side {
            HullSide::Upper => &self.upper,
            HullSide::Lower => &self.lower,
        }
    }

    /// The plane actually divided this submesh
    pub fn is_valid(&self) -> bool {
        !self.upper.is_empty() && !self.lower.is_empty()
    }

    fn first(&self) -> Option<&Triangle> {
        self.upper.first().or_else(|| self.lower.first())
    }

    /// Attribute presence taken from the first stored triangle
    pub fn has_uvs(&self) -> bool {
        self.first().is_some_and(Triangle::has_uvs)
    }

    pub fn has_normals(&self) -> bool {
        self.first().is_some_and(Triangle::has_normals)
    }

    pub fn has_tangents(&self) -> bool {
        self.first().is_some_and(Triangle::has_tangents)
    }
}

/// The two closed halves of a sliced mesh
#[derive(Debug, Clone, PartialEq)]
pub struct SlicedHull {
    upper: MeshBuffers,
    lower: MeshBuffers,
    cap_submesh: Option<usize>,
}

impl SlicedHull {
    pub fn hull(&self, side: HullSide) -> &MeshBuffers {
        match side {
            HullSide::Upper => &self.upper,
            HullSide::Lower => &self.lower,
        }
    }

    pub fn upper(&self) -> &MeshBuffers {
        &self.upper
    }

    pub fn lower(&self) -> &MeshBuffers {
        &self.lower
    }

    /// `(upper, lower)`
    pub fn into_parts(self) -> (MeshBuffers, MeshBuffers) {
        (self.upper, self.lower)
    }

    /// Index range holding the cross-section cap in both hulls, `None` when
    /// the cap could not be triangulated
    pub fn cap_submesh(&self) -> Option<usize> {
        self.cap_submesh
    }
}

/// Attribute streams written to an output hull
#[derive(Debug, Clone, Copy)]
struct Streams {
    uvs: bool,
    normals: bool,
    tangents: bool,
}

/// Mesh slicer
#[derive(Debug, Clone, Default)]
pub struct Slicer {
    config: SliceConfig,
}

impl Slicer {
    pub fn new(config: SliceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Slice `mesh` by `plane` in the mesh's local space.
    ///
    /// Returns `Ok(None)` when the plane does not divide any submesh.
    pub fn slice_by_plane(
        &self,
        mesh: &MeshBuffers,
        plane: &Plane,
    ) -> Result<Option<SlicedHull>, SliceError> {
        self.config.validate()?;
        mesh.validate()?;

        if !plane.distance().is_finite() || !plane.normal().iter().all(|c| c.is_finite()) {
            return Err(SliceError::DegeneratePlane);
        }
        let plane = plane.with_epsilon(self.config.epsilon);

        warn_ignored_attributes(mesh);

        let parts = self.split_submeshes(mesh, &plane);

        if !parts.iter().any(|(part, _)| part.is_valid()) {
            debug!("Plane does not divide the mesh");
            return Ok(None);
        }

        let cut_points: Vec<Point3<f64>> = parts
            .iter()
            .flat_map(|(_, points)| points.iter().copied())
            .collect();
        let submeshes: Vec<SlicedSubmesh> = parts.into_iter().map(|(part, _)| part).collect();

        let cap = monotone_chain(&cut_points, &plane, &self.config.cross_section_region);
        if cap.is_none() {
            warn!(
                "Cross-section from {} cut points could not be triangulated, hulls are left open",
                cut_points.len()
            );
        }

        let streams = output_streams(&submeshes);
        let cap_submesh = cap.as_ref().map(|_| match self.config.cross_section_index {
            Some(index) if index < submeshes.len() => index,
            _ => submeshes.len(),
        });

        let cap = cap.as_deref();
        let upper = assemble_hull(&submeshes, HullSide::Upper, cap, cap_submesh, streams);
        let lower = assemble_hull(&submeshes, HullSide::Lower, cap, cap_submesh, streams);

        debug!(
            upper_triangles = upper.triangle_count(),
            lower_triangles = lower.triangle_count(),
            cut_points = cut_points.len(),
            cap_triangles = cap.map_or(0, <[Triangle]>::len),
            "Sliced mesh"
        );

        Ok(Some(SlicedHull {
            upper,
            lower,
            cap_submesh,
        }))
    }

    /// Slice by the plane through `point` facing `direction` (need not be unit length)
    pub fn slice_by_point_and_direction(
        &self,
        mesh: &MeshBuffers,
        point: &Point3<f64>,
        direction: Vector3<f64>,
    ) -> Result<Option<SlicedHull>, SliceError> {
        let plane = Plane::try_from_point_direction(point, direction)?;
        self.slice_by_plane(mesh, &plane)
    }

    /// Slice by the plane through a transform's origin facing its local +Y
    pub fn slice_by_transform(
        &self,
        mesh: &MeshBuffers,
        transform: &Isometry3<f64>,
    ) -> Result<Option<SlicedHull>, SliceError> {
        self.slice_by_plane(mesh, &Plane::from_transform(transform))
    }

    /// Slice a mesh placed at `mesh_transform` by a plane given in world space
    pub fn slice_in_world(
        &self,
        mesh: &MeshBuffers,
        mesh_transform: &Isometry3<f64>,
        world_point: &Point3<f64>,
        world_direction: Vector3<f64>,
    ) -> Result<Option<SlicedHull>, SliceError> {
        let plane = Plane::from_world(world_point, world_direction, mesh_transform)?;
        self.slice_by_plane(mesh, &plane)
    }

    /// Split every submesh, keeping submesh order regardless of threading
    fn split_submeshes(
        &self,
        mesh: &MeshBuffers,
        plane: &Plane,
    ) -> Vec<(SlicedSubmesh, Vec<Point3<f64>>)> {
        if self.config.parallel {
            (0..mesh.submesh_count())
                .into_par_iter()
                .map_init(IntersectionResult::new, |result, submesh| {
                    split_submesh(mesh, submesh, plane, result)
                })
                .collect()
        } else {
            let mut result = IntersectionResult::new();
            (0..mesh.submesh_count())
                .map(|submesh| split_submesh(mesh, submesh, plane, &mut result))
                .collect()
        }
    }
}

fn split_submesh(
    mesh: &MeshBuffers,
    submesh: usize,
    plane: &Plane,
    result: &mut IntersectionResult,
) -> (SlicedSubmesh, Vec<Point3<f64>>) {
    let mut part = SlicedSubmesh::default();
    let mut points = Vec::new();

    for triangle in mesh.submesh_triangles(submesh) {
        if intersect_triangle(plane, &triangle, result) {
            part.upper.extend_from_slice(result.upper_hull());
            part.lower.extend_from_slice(result.lower_hull());
            points.extend_from_slice(result.intersection_points());
        } else {
            match whole_triangle_side(plane, &triangle) {
                SideOfPlane::Below => part.lower.push(triangle),
                _ => part.upper.push(triangle),
            }
        }
    }

    trace!(
        submesh,
        upper = part.upper.len(),
        lower = part.lower.len(),
        cut_points = points.len(),
        "Split submesh"
    );

    (part, points)
}

/// Side of the first corner off the plane; fully coplanar triangles go up
fn whole_triangle_side(plane: &Plane, triangle: &Triangle) -> SideOfPlane {
    triangle
        .positions()
        .iter()
        .map(|p| plane.classify(p))
        .find(|&side| side != SideOfPlane::On)
        .unwrap_or(SideOfPlane::Above)
}

fn warn_ignored_attributes(mesh: &MeshBuffers) {
    let vertices = mesh.vertex_count();
    let checks = [
        ("uv", mesh.uvs.as_ref().map(Vec::len)),
        ("normal", mesh.normals.as_ref().map(Vec::len)),
        ("tangent", mesh.tangents.as_ref().map(Vec::len)),
    ];

    for (name, len) in checks {
        if let Some(len) = len.filter(|&len| len != vertices) {
            warn!("Ignoring {name} buffer: {len} values for {vertices} vertices");
        }
    }
}

/// Attribute streams of the output, read from the first submesh holding triangles
fn output_streams(submeshes: &[SlicedSubmesh]) -> Streams {
    submeshes
        .iter()
        .find(|part| part.first().is_some())
        .map_or(
            Streams {
                uvs: false,
                normals: false,
                tangents: false,
            },
            |part| Streams {
                uvs: part.has_uvs(),
                normals: part.has_normals(),
                tangents: part.has_tangents(),
            },
        )
}

/// Cap triangle oriented to face out of `side`.
///
/// Cap triangles arrive facing against the plane normal, which is already
/// outward for the upper hull; their stored normals point along the plane
/// normal, which is outward for the lower hull.
fn orient_cap(triangle: &Triangle, side: HullSide) -> Triangle {
    match side {
        HullSide::Lower => triangle.reversed(),
        HullSide::Upper => {
            let mut flipped = *triangle;
            if let Some(normals) = triangle.normals() {
                flipped = flipped.with_normals(normals.map(|n| -n));
            }
            if let Some(tangents) = triangle.tangents() {
                flipped = flipped.with_tangents(tangents.map(|t| Vector4::new(t.x, t.y, t.z, -t.w)));
            }
            flipped
        }
    }
}

/// Un-indexed output buffers: three fresh vertices per triangle, one index
/// range per submesh plus the cap range.
fn assemble_hull(
    submeshes: &[SlicedSubmesh],
    side: HullSide,
    cap: Option<&[Triangle]>,
    cap_submesh: Option<usize>,
    streams: Streams,
) -> MeshBuffers {
    let mut writer = HullWriter::new(streams);

    for part in submeshes {
        writer.push_range(part.triangles(side).iter().copied());
    }

    if let (Some(cap), Some(index)) = (cap, cap_submesh) {
        let cap = cap.iter().map(|t| orient_cap(t, side));
        if index < submeshes.len() {
            writer.extend_range(index, cap);
        } else {
            writer.push_range(cap);
        }
    }

    writer.finish()
}

struct HullWriter {
    streams: Streams,
    mesh: MeshBuffers,
    uvs: Vec<Vector2<f64>>,
    normals: Vec<Vector3<f64>>,
    tangents: Vec<Vector4<f64>>,
}

impl HullWriter {
    fn new(streams: Streams) -> Self {
        Self {
            streams,
            mesh: MeshBuffers::default(),
            uvs: Vec::new(),
            normals: Vec::new(),
            tangents: Vec::new(),
        }
    }

    fn push_range(&mut self, triangles: impl Iterator<Item = Triangle>) {
        self.mesh.submeshes.push(Vec::new());
        let index = self.mesh.submeshes.len() - 1;
        self.extend_range(index, triangles);
    }

    fn extend_range(&mut self, index: usize, triangles: impl Iterator<Item = Triangle>) {
        for triangle in triangles {
            for corner in 0..3 {
                let vertex = triangle.vertex(corner);
                let next = self.mesh.positions.len() as u32;

                self.mesh.positions.push(vertex.position);
                if self.streams.uvs {
                    self.uvs.push(vertex.uv.unwrap_or_else(Vector2::zeros));
                }
                if self.streams.normals {
                    self.normals.push(vertex.normal.unwrap_or_else(Vector3::zeros));
                }
                if self.streams.tangents {
                    self.tangents.push(vertex.tangent.unwrap_or_else(Vector4::zeros));
                }
                self.mesh.submeshes[index].push(next);
            }
        }
    }

    fn finish(self) -> MeshBuffers {
        let mut mesh = self.mesh;
        if self.streams.uvs {
            mesh.uvs = Some(self.uvs);
        }
        if self.streams.normals {
            mesh.normals = Some(self.normals);
        }
        if self.streams.tangents {
            mesh.tangents = Some(self.tangents);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;
    use approx::assert_relative_eq;

    fn y_plane(distance: f64) -> Plane {
        Plane::new(Vector3::y_axis(), distance)
    }

    #[test]
    fn test_whole_triangle_side_skips_on_vertices() {
        let plane = y_plane(0.0);
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, -1.0, 1.0),
        );
        assert_eq!(whole_triangle_side(&plane, &triangle), SideOfPlane::Below);

        let flat = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        );
        assert_eq!(whole_triangle_side(&plane, &flat), SideOfPlane::Above);
    }

    #[test]
    fn test_cube_split_counts() {
        let hull = Slicer::default()
            .slice_by_plane(&cube(1.0), &y_plane(0.0))
            .unwrap()
            .unwrap();

        assert_eq!(hull.cap_submesh(), Some(1));
        for side in [HullSide::Upper, HullSide::Lower] {
            let mesh = hull.hull(side);
            assert_eq!(mesh.submesh_count(), 2);
            assert_eq!(mesh.submeshes[0].len() / 3, 14);
            assert_eq!(mesh.submeshes[1].len() / 3, 2);
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn test_cap_faces_outward() {
        let hull = Slicer::default()
            .slice_by_plane(&cube(1.0), &y_plane(0.0))
            .unwrap()
            .unwrap();

        let upper_cap: Vec<Triangle> = hull.upper().submesh_triangles(1).collect();
        let lower_cap: Vec<Triangle> = hull.lower().submesh_triangles(1).collect();

        for triangle in &upper_cap {
            assert_relative_eq!(triangle.face_normal(), -Vector3::y(), epsilon = 1e-12);
            assert_relative_eq!(triangle.normals().unwrap()[0], -Vector3::y());
        }
        for triangle in &lower_cap {
            assert_relative_eq!(triangle.face_normal(), Vector3::y(), epsilon = 1e-12);
            assert_relative_eq!(triangle.normals().unwrap()[0], Vector3::y());
        }
    }

    #[test]
    fn test_plane_missing_mesh() {
        let result = Slicer::default().slice_by_plane(&cube(1.0), &y_plane(1000.0));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_rejects_invalid_input() {
        let slicer = Slicer::default();
        let empty = MeshBuffers::new(vec![Point3::origin()]);
        assert_eq!(
            slicer.slice_by_plane(&empty, &y_plane(0.0)),
            Err(SliceError::NoSubmeshes)
        );

        assert_eq!(
            slicer.slice_by_point_and_direction(&cube(1.0), &Point3::origin(), Vector3::zeros()),
            Err(SliceError::DegeneratePlane)
        );

        let slicer = Slicer::new(SliceConfig {
            epsilon: f64::NAN,
            ..SliceConfig::default()
        });
        assert!(matches!(
            slicer.slice_by_plane(&cube(1.0), &y_plane(0.0)),
            Err(SliceError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_sliced_submesh_flags() {
        let mut part = SlicedSubmesh::default();
        assert!(!part.is_valid());
        assert!(!part.has_uvs());

        let triangle = Triangle::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0))
            .with_normals([Vector3::z(); 3]);
        part.lower.push(triangle);
        assert!(part.has_normals());
        assert!(!part.has_uvs());
        assert!(!part.is_valid());

        part.upper.push(triangle);
        assert!(part.is_valid());
    }
}
