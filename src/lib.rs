// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hullslice
//!
//! Runtime slicing of convex triangle meshes. A cutting plane divides a mesh
//! into an upper and a lower hull, the exposed cross-section is capped with a
//! convex triangulation, and UVs, normals and tangents are interpolated
//! across the cut.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod slicer;
pub mod utils;

pub use config::SliceConfig;
pub use error::SliceError;
pub use geometry::{MeshBuffers, Plane, SideOfPlane, TextureRegion, Triangle};
pub use slicer::{HullSide, SlicedHull, Slicer};

use nalgebra::{Point3, Vector3};

/// Slice `mesh` by `plane` with the default configuration
pub fn slice_by_plane(mesh: &MeshBuffers, plane: &Plane) -> Result<Option<SlicedHull>, SliceError> {
    Slicer::default().slice_by_plane(mesh, plane)
}

/// Slice `mesh` by the plane through `point` facing `direction`, with the
/// default configuration
pub fn slice_by_point_and_direction(
    mesh: &MeshBuffers,
    point: &Point3<f64>,
    direction: Vector3<f64>,
) -> Result<Option<SlicedHull>, SliceError> {
    Slicer::default().slice_by_point_and_direction(mesh, point, direction)
}
