// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GLTF/GLB exporter
//!
//! Each index range becomes one primitive of a single glTF mesh, so the
//! cross-section cap can be given its own material downstream.

use crate::geometry::MeshBuffers;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Export mesh to GLB (`.glb`) or GLTF with a sidecar `.bin`
pub fn export(mesh: &MeshBuffers, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_glb = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("glb"));

    if is_glb {
        export_glb(mesh, path)
    } else {
        export_gltf_separate(mesh, path)
    }
}

/// Export mesh to GLB (binary GLTF)
fn export_glb(mesh: &MeshBuffers, path: &Path) -> Result<()> {
    let (gltf_json_val, buffer_data) = create_gltf_json(mesh, None);

    let json_string = serde_json::to_string(&gltf_json_val)?;
    let mut json_offset = json_string.len();
    align_to_multiple_of_four(&mut json_offset);
    let json_padding = json_offset - json_string.len();

    let mut buffer_offset = buffer_data.len();
    align_to_multiple_of_four(&mut buffer_offset);
    let buffer_padding = buffer_offset - buffer_data.len();

    let total_length = 12 + 8 + json_offset + 8 + buffer_offset;

    let mut file = File::create(path).with_context(|| format!("Failed to create GLB file: {:?}", path))?;

    // GLB header
    file.write_all(&0x46546C67u32.to_le_bytes())?; // magic: "glTF"
    file.write_all(&2u32.to_le_bytes())?; // version
    file.write_all(&(total_length as u32).to_le_bytes())?;

    // JSON chunk
    file.write_all(&(json_offset as u32).to_le_bytes())?;
    file.write_all(&0x4E4F534Au32.to_le_bytes())?; // type: "JSON"
    file.write_all(json_string.as_bytes())?;
    file.write_all(&vec![b' '; json_padding])?;

    // BIN chunk
    file.write_all(&(buffer_offset as u32).to_le_bytes())?;
    file.write_all(&0x004E4942u32.to_le_bytes())?; // type: "BIN\0"
    file.write_all(&buffer_data)?;
    file.write_all(&vec![0u8; buffer_padding])?;

    Ok(())
}

/// Export mesh to GLTF with separate .bin file
fn export_gltf_separate(mesh: &MeshBuffers, path: &Path) -> Result<()> {
    let bin_path = path.with_extension("bin");
    let bin_name = bin_path
        .file_name()
        .and_then(|name| name.to_str())
        .context("GLTF output path has no file name")?
        .to_string();

    let (gltf_json_val, buffer_data) = create_gltf_json(mesh, Some(&bin_name));

    let json_string = serde_json::to_string_pretty(&gltf_json_val)?;
    std::fs::write(path, json_string).with_context(|| format!("Failed to write GLTF file: {:?}", path))?;
    std::fs::write(&bin_path, buffer_data)
        .with_context(|| format!("Failed to write GLTF buffer: {:?}", bin_path))?;

    Ok(())
}

/// Appends vertex streams and index ranges to one buffer, tracking views and accessors
struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Float attribute stream; returns its accessor index
    fn push_floats<const N: usize>(&mut self, values: impl Iterator<Item = [f32; N]>, kind: &str) -> usize {
        let offset = self.data.len();
        let mut count = 0;
        let mut min = [f32::MAX; N];
        let mut max = [f32::MIN; N];

        for value in values {
            for (i, component) in value.iter().enumerate() {
                self.data.extend_from_slice(&component.to_le_bytes());
                min[i] = min[i].min(*component);
                max[i] = max[i].max(*component);
            }
            count += 1;
        }

        let view = self.push_view(offset, ARRAY_BUFFER);
        let mut accessor = json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": FLOAT,
            "count": count,
            "type": kind
        });
        if kind == "VEC3" && count > 0 {
            accessor["min"] = json!(min.to_vec());
            accessor["max"] = json!(max.to_vec());
        }

        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_indices(&mut self, indices: &[u32]) -> usize {
        let offset = self.data.len();
        for index in indices {
            self.data.extend_from_slice(&index.to_le_bytes());
        }

        let view = self.push_view(offset, ELEMENT_ARRAY_BUFFER);
        self.accessors.push(json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR"
        }));
        self.accessors.len() - 1
    }

    fn push_view(&mut self, offset: usize, target: u32) -> usize {
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": self.data.len() - offset,
            "target": target
        }));
        self.views.len() - 1
    }
}

fn create_gltf_json(mesh: &MeshBuffers, uri: Option<&str>) -> (Value, Vec<u8>) {
    let mut builder = BufferBuilder::new();
    let mut attributes = serde_json::Map::new();

    let position = builder.push_floats(
        mesh.positions.iter().map(|p| [p.x as f32, p.y as f32, p.z as f32]),
        "VEC3",
    );
    attributes.insert("POSITION".into(), json!(position));

    if let Some(normals) = mesh.normals.as_ref().filter(|_| mesh.has_normals()) {
        let normal = builder.push_floats(normals.iter().map(|n| [n.x as f32, n.y as f32, n.z as f32]), "VEC3");
        attributes.insert("NORMAL".into(), json!(normal));
    }

    if let Some(uvs) = mesh.uvs.as_ref().filter(|_| mesh.has_uvs()) {
        let uv = builder.push_floats(uvs.iter().map(|uv| [uv.x as f32, uv.y as f32]), "VEC2");
        attributes.insert("TEXCOORD_0".into(), json!(uv));
    }

    if let Some(tangents) = mesh.tangents.as_ref().filter(|_| mesh.has_tangents()) {
        let tangent = builder.push_floats(
            tangents
                .iter()
                .map(|t| [t.x as f32, t.y as f32, t.z as f32, t.w as f32]),
            "VEC4",
        );
        attributes.insert("TANGENT".into(), json!(tangent));
    }

    let primitives: Vec<Value> = mesh
        .submeshes
        .iter()
        .filter(|indices| !indices.is_empty())
        .map(|indices| {
            let accessor = builder.push_indices(indices);
            json!({
                "attributes": attributes,
                "indices": accessor,
                "mode": 4
            })
        })
        .collect();

    let mut buffer = json!({ "byteLength": builder.data.len() });
    if let Some(uri) = uri {
        buffer["uri"] = json!(uri);
    }

    let gltf = json!({
        "asset": {
            "generator": "hullslice",
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": primitives }],
        "accessors": builder.accessors,
        "bufferViews": builder.views,
        "buffers": [buffer]
    });

    (gltf, builder.data)
}

fn align_to_multiple_of_four(n: &mut usize) {
    *n = (*n + 3) & !3;
}
