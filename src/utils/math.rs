// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

/// Remap `x` from `[in_min, in_max]` into `[out_min, out_max]`.
///
/// Values outside the input range extrapolate linearly.
pub fn map_range(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Twice the signed area of the 2D triangle (p1, p2, p3).
///
/// Positive for a counter-clockwise (left) turn, negative for clockwise,
/// zero when collinear.
pub fn tri_area_2d(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> f64 {
    (x1 - x2) * (y2 - y3) - (x2 - x3) * (y1 - y2)
}

/// `-1.0` for negative values, `1.0` otherwise
pub fn handedness(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}
