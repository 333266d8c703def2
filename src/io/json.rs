// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON mesh buffers
//!
//! The only format here that keeps UVs, tangents and submeshes intact.

use crate::geometry::MeshBuffers;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub fn load_mesh_json(path: impl AsRef<Path>) -> Result<MeshBuffers> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open mesh file: {:?}", path))?;
    let mesh = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse mesh file: {:?}", path))?;
    Ok(mesh)
}

pub fn save_mesh_json(mesh: &MeshBuffers, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create mesh file: {:?}", path))?;
    serde_json::to_writer(BufWriter::new(file), mesh).context("Failed to serialize mesh")?;
    Ok(())
}
