// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL import and export

use crate::geometry::MeshBuffers;
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

/// Load an STL file (binary or ASCII) as a single-submesh, positions-only mesh
pub fn import_stl(path: impl AsRef<Path>) -> Result<MeshBuffers> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader)
        .with_context(|| format!("Failed to read STL file: {:?}", path))?;

    let positions = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let indices = stl
        .faces
        .iter()
        .flat_map(|face| face.vertices.map(|i| i as u32))
        .collect();

    Ok(MeshBuffers::new(positions).with_submesh(indices))
}

/// Write every index range of `mesh` into one binary STL file
pub fn export_stl(mesh: &MeshBuffers, path: impl AsRef<Path>) -> Result<()> {
    let to_vertex = |p: &Point3<f64>| StlVertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let triangles: Vec<StlTriangle> = mesh
        .triangles()
        .map(|tri| {
            let normal = tri.face_normal();
            let [a, b, c] = tri.positions();

            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [to_vertex(a), to_vertex(b), to_vertex(c)],
            }
        })
        .collect();

    let path = path.as_ref();
    let mut file = File::create(path).with_context(|| format!("Failed to create STL file: {:?}", path))?;

    stl_io::write_stl(&mut file, triangles.iter()).context("Failed to write STL file")?;

    Ok(())
}
