// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Precondition failures reported before slicing starts

use thiserror::Error;

/// Errors for input that the slicer refuses to process.
///
/// A plane that misses the mesh is not an error: the slice entry points
/// return `Ok(None)` for that case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliceError {
    #[error("mesh has no submeshes to slice")]
    NoSubmeshes,

    #[error("submesh {submesh} has {count} indices, which is not a multiple of 3")]
    IndexCount { submesh: usize, count: usize },

    #[error("submesh {submesh} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        submesh: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("vertex {index} has a non-finite position")]
    NonFinitePosition { index: usize },

    #[error("plane normal must be finite and non-zero")]
    DegeneratePlane,

    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("texture region bounds must be finite")]
    InvalidTextureRegion,
}
