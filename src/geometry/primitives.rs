// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator
//!
//! Every primitive is closed, wound counter-clockwise when seen from outside,
//! and carries UVs, normals and tangents.

use super::mesh::MeshBuffers;
use super::triangle::Triangle;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometric primitives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cube { size: f64 },
    Sphere { radius: f64, segments: u32, rings: u32 },
}

impl Primitive {
    pub fn cube(size: f64) -> Self {
        Self::Cube { size }
    }

    /// UV sphere with `segments` around the equator and half as many rings
    pub fn sphere(radius: f64, segments: u32) -> Self {
        let segments = if segments > 0 { segments } else { 32 };
        Self::Sphere {
            radius,
            segments,
            rings: segments / 2,
        }
    }

    pub fn to_mesh(&self) -> MeshBuffers {
        match *self {
            Self::Cube { size } => cube(size),
            Self::Sphere {
                radius,
                segments,
                rings,
            } => uv_sphere(radius, segments, rings),
        }
    }
}

/// Axis-aligned cube of edge `size` centered at the origin.
/// Each face has its own four vertices.
pub fn cube(size: f64) -> MeshBuffers {
    let h = size / 2.0;

    let corners = [
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ];

    let faces = [
        // Front (z+)
        ([4, 5, 6, 7], Vector3::new(0.0, 0.0, 1.0)),
        // Back (z-)
        ([1, 0, 3, 2], Vector3::new(0.0, 0.0, -1.0)),
        // Right (x+)
        ([5, 1, 2, 6], Vector3::new(1.0, 0.0, 0.0)),
        // Left (x-)
        ([0, 4, 7, 3], Vector3::new(-1.0, 0.0, 0.0)),
        // Top (y+)
        ([7, 6, 2, 3], Vector3::new(0.0, 1.0, 0.0)),
        // Bottom (y-)
        ([0, 1, 5, 4], Vector3::new(0.0, -1.0, 0.0)),
    ];

    let face_uvs = [
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(1.0, 1.0),
        Vector2::new(0.0, 1.0),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut tangents = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in faces {
        let base = positions.len() as u32;
        let quad_positions = quad.map(|i| corners[i]);

        let tangent = Triangle::new(quad_positions[0], quad_positions[1], quad_positions[2])
            .with_uvs([face_uvs[0], face_uvs[1], face_uvs[2]])
            .with_normals([normal; 3])
            .compute_tangents()
            .map_or(Vector4::new(1.0, 0.0, 0.0, 1.0), |t| t[0]);

        positions.extend(quad_positions);
        uvs.extend(face_uvs);
        normals.extend([normal; 4]);
        tangents.extend([tangent; 4]);
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshBuffers::new(positions)
        .with_uvs(uvs)
        .with_normals(normals)
        .with_tangents(tangents)
        .with_submesh(indices)
}

/// Latitude/longitude sphere centered at the origin.
///
/// The seam column is duplicated so UVs stay continuous; the degenerate pole
/// triangles are left out.
pub fn uv_sphere(radius: f64, segments: u32, rings: u32) -> MeshBuffers {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let vertex_count = ((rings + 1) * (segments + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut tangents = Vec::with_capacity(vertex_count);

    for i in 0..=rings {
        let phi = PI * i as f64 / rings as f64;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..=segments {
            let theta = 2.0 * PI * j as f64 / segments as f64;
            let (sin, cos) = theta.sin_cos();

            let normal = Vector3::new(phi.sin() * cos, phi.cos(), phi.sin() * sin);
            positions.push(Point3::new(r * cos, y, r * sin));
            normals.push(normal);
            uvs.push(Vector2::new(
                j as f64 / segments as f64,
                i as f64 / rings as f64,
            ));
            tangents.push(Vector4::new(-sin, 0.0, cos, 1.0));
        }
    }

    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for i in 0..rings {
        for j in 0..segments {
            let first = i * (segments + 1) + j;
            let second = first + segments + 1;

            if i != 0 {
                indices.extend([first, first + 1, second]);
            }
            if i != rings - 1 {
                indices.extend([second, first + 1, second + 1]);
            }
        }
    }

    MeshBuffers::new(positions)
        .with_uvs(uvs)
        .with_normals(normals)
        .with_tangents(tangents)
        .with_submesh(indices)
}
