// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Texture sub-regions for cross-section UV mapping

use crate::error::SliceError;
use crate::utils::math::map_range;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Rectangle of a texture in normalized UV space.
///
/// Cross-section UVs are generated in `[0, 1] x [0, 1]` and then remapped
/// into this rectangle, so a cap can sample from one tile of an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureRegion {
    pub start_u: f64,
    pub start_v: f64,
    pub end_u: f64,
    pub end_v: f64,
}

impl TextureRegion {
    pub fn new(start_u: f64, start_v: f64, end_u: f64, end_v: f64) -> Self {
        Self {
            start_u,
            start_v,
            end_u,
            end_v,
        }
    }

    /// The whole texture
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Region from pixel coordinates inside a `texture_width x texture_height`
    /// texture. The rectangle is clamped to the texture bounds.
    pub fn from_pixels(
        texture_width: f64,
        texture_height: f64,
        pixel_x: f64,
        pixel_y: f64,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Self {
        let width = texture_width.min(pixel_width);
        let height = texture_height.min(pixel_height);
        let x = pixel_x.abs().min(texture_width);
        let y = pixel_y.abs().min(texture_height);

        Self::new(
            x / texture_width,
            y / texture_height,
            (x + width) / texture_width,
            (y + height) / texture_height,
        )
    }

    pub fn start(&self) -> Vector2<f64> {
        Vector2::new(self.start_u, self.start_v)
    }

    pub fn end(&self) -> Vector2<f64> {
        Vector2::new(self.end_u, self.end_v)
    }

    /// Map a `[0, 1]` UV coordinate into this region
    pub fn map(&self, uv: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            map_range(uv.x, 0.0, 1.0, self.start_u, self.end_u),
            map_range(uv.y, 0.0, 1.0, self.start_v, self.end_v),
        )
    }

    pub fn validate(&self) -> Result<(), SliceError> {
        let finite = [self.start_u, self.start_v, self.end_u, self.end_v]
            .iter()
            .all(|v| v.is_finite());
        if finite {
            Ok(())
        } else {
            Err(SliceError::InvalidTextureRegion)
        }
    }
}

impl Default for TextureRegion {
    fn default() -> Self {
        Self::full()
    }
}
