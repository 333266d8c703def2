// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - importing and exporting mesh buffers

mod export_gltf;
mod json;
mod stl;

pub use export_gltf::export as export_gltf;
pub use json::{load_mesh_json, save_mesh_json};
pub use stl::{export_stl, import_stl};

use crate::geometry::MeshBuffers;
use anyhow::{bail, Result};
use std::path::Path;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Load a mesh, choosing the format from the file extension
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshBuffers> {
    let path = path.as_ref();
    match extension(path).as_str() {
        "stl" => import_stl(path),
        "json" => load_mesh_json(path),
        other => bail!("Unsupported input format {:?}: {:?}", other, path),
    }
}

/// Save a mesh, choosing the format from the file extension
pub fn save_mesh(mesh: &MeshBuffers, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_str() {
        "stl" => export_stl(mesh, path),
        "json" => save_mesh_json(mesh, path),
        "glb" | "gltf" => export_gltf(mesh, path),
        other => bail!("Unsupported output format {:?}: {:?}", other, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;
    use tempfile::TempDir;

    #[test]
    fn test_dispatch_by_extension() -> Result<()> {
        let dir = TempDir::new()?;
        let mesh = cube(1.0);

        for name in ["cube.stl", "cube.json", "cube.glb", "cube.gltf"] {
            save_mesh(&mesh, dir.path().join(name))?;
            assert!(dir.path().join(name).exists());
        }

        assert_eq!(load_mesh(dir.path().join("cube.json"))?.triangle_count(), 12);
        assert_eq!(load_mesh(dir.path().join("cube.stl"))?.triangle_count(), 12);
        Ok(())
    }

    #[test]
    fn test_unsupported_extension() {
        let err = save_mesh(&cube(1.0), "cube.obj").unwrap_err();
        assert!(err.to_string().contains("Unsupported output format"));
        assert!(load_mesh("cube.3mf").is_err());
    }
}
