// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle with optional per-vertex attributes
//!
//! Attribute triples are all-or-nothing: a triangle either carries a value
//! for every corner or none at all.

use crate::utils::math::{handedness, tri_area_2d};
use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// Single corner of a triangle, with whatever attributes the triangle carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub uv: Option<Vector2<f64>>,
    pub normal: Option<Vector3<f64>>,
    pub tangent: Option<Vector4<f64>>,
}

impl Vertex {
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            uv: None,
            normal: None,
            tangent: None,
        }
    }
}

/// Triangle value: three positions plus optional UV, normal and tangent triples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    positions: [Point3<f64>; 3],
    uvs: Option<[Vector2<f64>; 3]>,
    normals: Option<[Vector3<f64>; 3]>,
    tangents: Option<[Vector4<f64>; 3]>,
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            positions: [a, b, c],
            uvs: None,
            normals: None,
            tangents: None,
        }
    }

    /// Build from three corners. An attribute is kept only if every corner has it.
    pub fn from_vertices(vertices: [Vertex; 3]) -> Self {
        let [v0, v1, v2] = vertices;
        let mut triangle = Self::new(v0.position, v1.position, v2.position);

        if let (Some(a), Some(b), Some(c)) = (v0.uv, v1.uv, v2.uv) {
            triangle.uvs = Some([a, b, c]);
        }
        if let (Some(a), Some(b), Some(c)) = (v0.normal, v1.normal, v2.normal) {
            triangle.normals = Some([a, b, c]);
        }
        if let (Some(a), Some(b), Some(c)) = (v0.tangent, v1.tangent, v2.tangent) {
            triangle.tangents = Some([a, b, c]);
        }

        triangle
    }

    pub fn with_uvs(mut self, uvs: [Vector2<f64>; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_normals(mut self, normals: [Vector3<f64>; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_tangents(mut self, tangents: [Vector4<f64>; 3]) -> Self {
        self.tangents = Some(tangents);
        self
    }

    pub fn a(&self) -> &Point3<f64> {
        &self.positions[0]
    }

    pub fn b(&self) -> &Point3<f64> {
        &self.positions[1]
    }

    pub fn c(&self) -> &Point3<f64> {
        &self.positions[2]
    }

    pub fn positions(&self) -> &[Point3<f64>; 3] {
        &self.positions
    }

    pub fn uvs(&self) -> Option<&[Vector2<f64>; 3]> {
        self.uvs.as_ref()
    }

    pub fn normals(&self) -> Option<&[Vector3<f64>; 3]> {
        self.normals.as_ref()
    }

    pub fn tangents(&self) -> Option<&[Vector4<f64>; 3]> {
        self.tangents.as_ref()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_tangents(&self) -> bool {
        self.tangents.is_some()
    }

    /// Corner `index` (0, 1 or 2) with its original attributes
    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex {
            position: self.positions[index],
            uv: self.uvs.map(|uvs| uvs[index]),
            normal: self.normals.map(|normals| normals[index]),
            tangent: self.tangents.map(|tangents| tangents[index]),
        }
    }

    /// Vertex at `point` with every attribute interpolated from this triangle
    pub fn vertex_at(&self, point: &Point3<f64>) -> Vertex {
        Vertex {
            position: *point,
            uv: self.generate_uv(point),
            normal: self.generate_normal(point),
            tangent: self.generate_tangent(point),
        }
    }

    /// Same corners in reverse winding order
    pub fn reversed(&self) -> Self {
        let [v0, v1, v2] = [self.vertex(0), self.vertex(1), self.vertex(2)];
        Self::from_vertices([v0, v2, v1])
    }

    /// Barycentric weights `(u, v, w)` of `point` for corners `(a, b, c)`.
    ///
    /// The point is projected onto the coordinate plane where the triangle
    /// has the largest projected area. Zero-area triangles give equal weights.
    pub fn barycentric(&self, point: &Point3<f64>) -> Vector3<f64> {
        let [a, b, c] = &self.positions;
        let p = point;
        let m = (b - a).cross(&(c - a));

        let (x, y, z) = (m.x.abs(), m.y.abs(), m.z.abs());

        let (nu, nv, ood) = if x >= y && x >= z {
            (
                tri_area_2d(p.y, p.z, b.y, b.z, c.y, c.z),
                tri_area_2d(p.y, p.z, c.y, c.z, a.y, a.z),
                1.0 / m.x,
            )
        } else if y >= x && y >= z {
            (
                tri_area_2d(p.x, p.z, b.x, b.z, c.x, c.z),
                tri_area_2d(p.x, p.z, c.x, c.z, a.x, a.z),
                1.0 / -m.y,
            )
        } else {
            (
                tri_area_2d(p.x, p.y, b.x, b.y, c.x, c.y),
                tri_area_2d(p.x, p.y, c.x, c.y, a.x, a.y),
                1.0 / m.z,
            )
        };

        if !ood.is_finite() {
            let third = 1.0 / 3.0;
            return Vector3::new(third, third, third);
        }

        let u = nu * ood;
        let v = nv * ood;
        Vector3::new(u, v, 1.0 - u - v)
    }

    /// Interpolated UV at `point`, if the triangle has UVs
    pub fn generate_uv(&self, point: &Point3<f64>) -> Option<Vector2<f64>> {
        let uvs = self.uvs?;
        let w = self.barycentric(point);
        Some(uvs[0] * w.x + uvs[1] * w.y + uvs[2] * w.z)
    }

    /// Interpolated normal at `point`, renormalized when non-zero
    pub fn generate_normal(&self, point: &Point3<f64>) -> Option<Vector3<f64>> {
        let normals = self.normals?;
        let w = self.barycentric(point);
        let blended = normals[0] * w.x + normals[1] * w.y + normals[2] * w.z;
        Some(blended.try_normalize(f64::EPSILON).unwrap_or(blended))
    }

    /// Interpolated tangent at `point`. `w` stays a pure handedness sign.
    pub fn generate_tangent(&self, point: &Point3<f64>) -> Option<Vector4<f64>> {
        let tangents = self.tangents?;
        let w = self.barycentric(point);
        let blended = tangents[0] * w.x + tangents[1] * w.y + tangents[2] * w.z;
        let xyz = blended.xyz();
        let xyz = xyz.try_normalize(f64::EPSILON).unwrap_or(xyz);
        Some(Vector4::new(xyz.x, xyz.y, xyz.z, handedness(blended.w)))
    }

    /// Per-corner tangents from positions and UVs.
    ///
    /// Each tangent is orthogonalized against the corner normal (or the face
    /// normal when the triangle has none). Returns `None` without UVs or when
    /// the UV mapping is singular.
    pub fn compute_tangents(&self) -> Option<[Vector4<f64>; 3]> {
        let uvs = self.uvs?;
        let [v1, v2, v3] = &self.positions;
        let [w1, w2, w3] = uvs;

        let e1 = v2 - v1;
        let e2 = v3 - v1;

        let s1 = w2.x - w1.x;
        let s2 = w3.x - w1.x;
        let t1 = w2.y - w1.y;
        let t2 = w3.y - w1.y;

        let r = 1.0 / (s1 * t2 - s2 * t1);
        if !r.is_finite() {
            return None;
        }

        let sdir = (e1 * t2 - e2 * t1) * r;
        let tdir = (e2 * s1 - e1 * s2) * r;

        let face_normal = self.face_normal();
        let normals = self.normals.unwrap_or([face_normal; 3]);

        let mut tangents = [Vector4::zeros(); 3];
        for (tangent, n) in tangents.iter_mut().zip(normals.iter()) {
            // Gram-Schmidt
            let t = (sdir - n * n.dot(&sdir)).try_normalize(f64::EPSILON)?;
            let w = handedness(n.cross(&t).dot(&tdir));
            *tangent = Vector4::new(t.x, t.y, t.z, w);
        }

        Some(tangents)
    }

    /// Scalar triple product `a . (b x c)`
    pub fn signed_square(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
        a.coords.dot(&b.coords.cross(&c.coords))
    }

    /// Whether the corners wind clockwise as seen from the origin
    pub fn is_clockwise(&self) -> bool {
        let [a, b, c] = &self.positions;
        Self::signed_square(a, b, c) >= f64::EPSILON
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.positions;
        (b - a).cross(&(c - a)).norm() * 0.5
    }

    /// Unit geometric normal from the winding order, zero for degenerate triangles
    pub fn face_normal(&self) -> Vector3<f64> {
        let [a, b, c] = &self.positions;
        (b - a)
            .cross(&(c - a))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}
