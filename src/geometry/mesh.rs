// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Host mesh buffers
//!
//! Flat vertex attribute arrays shared by any number of submeshes. Each
//! submesh is an index list over the same vertices, typically one per
//! material.

use super::bbox::BoundingBox;
use super::triangle::Triangle;
use crate::error::SliceError;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Vertex buffers plus per-submesh index lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<Point3<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<Vector2<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<Vector3<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangents: Option<Vec<Vector4<f64>>>,
    pub submeshes: Vec<Vec<u32>>,
}

impl MeshBuffers {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    pub fn with_uvs(mut self, uvs: Vec<Vector2<f64>>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_tangents(mut self, tangents: Vec<Vector4<f64>>) -> Self {
        self.tangents = Some(tangents);
        self
    }

    /// Append a submesh index list
    pub fn with_submesh(mut self, indices: Vec<u32>) -> Self {
        self.submeshes.push(indices);
        self
    }

    /// Check the structure the slicer relies on.
    ///
    /// Attribute buffers of the wrong length are not an error; they are
    /// ignored when triangles are built.
    pub fn validate(&self) -> Result<(), SliceError> {
        if self.submeshes.is_empty() {
            return Err(SliceError::NoSubmeshes);
        }

        if let Some(index) = self
            .positions
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(SliceError::NonFinitePosition { index });
        }

        let vertex_count = self.positions.len();
        for (submesh, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(SliceError::IndexCount {
                    submesh,
                    count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(SliceError::IndexOutOfRange {
                    submesh,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// UVs are present and cover every vertex
    pub fn has_uvs(&self) -> bool {
        matches!(&self.uvs, Some(uvs) if uvs.len() == self.positions.len())
    }

    pub fn has_normals(&self) -> bool {
        matches!(&self.normals, Some(normals) if normals.len() == self.positions.len())
    }

    pub fn has_tangents(&self) -> bool {
        matches!(&self.tangents, Some(tangents) if tangents.len() == self.positions.len())
    }

    /// Triangle `index` of `submesh`, carrying every usable attribute.
    /// `None` when the triangle or one of its vertices does not exist.
    pub fn triangle(&self, submesh: usize, index: usize) -> Option<Triangle> {
        let indices = self.submeshes.get(submesh)?;
        let corners = indices.get(index * 3..index * 3 + 3)?;
        let [i0, i1, i2] = [corners[0] as usize, corners[1] as usize, corners[2] as usize];

        let mut triangle = Triangle::new(
            *self.positions.get(i0)?,
            *self.positions.get(i1)?,
            *self.positions.get(i2)?,
        );

        if let Some(uvs) = self.uvs.as_ref().filter(|_| self.has_uvs()) {
            triangle = triangle.with_uvs([uvs[i0], uvs[i1], uvs[i2]]);
        }
        if let Some(normals) = self.normals.as_ref().filter(|_| self.has_normals()) {
            triangle = triangle.with_normals([normals[i0], normals[i1], normals[i2]]);
        }
        if let Some(tangents) = self.tangents.as_ref().filter(|_| self.has_tangents()) {
            triangle = triangle.with_tangents([tangents[i0], tangents[i1], tangents[i2]]);
        }

        Some(triangle)
    }

    /// Triangles of one submesh in index order
    pub fn submesh_triangles(&self, submesh: usize) -> impl Iterator<Item = Triangle> + '_ {
        let count = self.submeshes.get(submesh).map_or(0, |s| s.len() / 3);
        (0..count).filter_map(move |i| self.triangle(submesh, i))
    }

    /// Triangles of every submesh, submesh by submesh
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.submeshes.len()).flat_map(move |s| self.submesh_triangles(s))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.positions)
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }

    /// Enclosed volume by the divergence theorem, positive for outward winding
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|t| {
                let [a, b, c] = t.positions();
                Triangle::signed_square(a, b, c) / 6.0
            })
            .sum()
    }
}
