// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for hullslice

pub mod args;
pub mod reporter;

pub use args::{parse_region, parse_vector3};
pub use reporter::Reporter;
