// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - planes, triangles, mesh buffers and the split kernels

pub mod analytics;
mod bbox;
pub mod intersector;
mod mesh;
mod plane;
pub mod primitives;
mod texture_region;
mod triangle;
pub mod triangulator;

pub use analytics::{analyze, GeometryStats};
pub use bbox::BoundingBox;
pub use intersector::{intersect_segment, intersect_triangle, IntersectionResult};
pub use mesh::MeshBuffers;
pub use plane::{Plane, SideOfPlane, DEFAULT_EPSILON};
pub use primitives::Primitive;
pub use texture_region::TextureRegion;
pub use triangle::{Triangle, Vertex};
pub use triangulator::monotone_chain;
