// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cutting plane and half-space classification

use crate::error::SliceError;
use nalgebra::{Isometry3, Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// Tolerance shared by plane classification and segment intersection
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Side of a plane a point lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideOfPlane {
    /// Positive side, along the normal
    Above,
    /// Negative side
    Below,
    /// Within tolerance of the plane
    On,
}

/// Oriented plane `dot(normal, p) == distance`.
///
/// Carries the tolerance shared by point classification and segment
/// intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    normal: Unit<Vector3<f64>>,
    distance: f64,
    epsilon: f64,
}

impl Plane {
    /// Plane from a unit normal and signed distance from the origin
    pub fn new(normal: Unit<Vector3<f64>>, distance: f64) -> Self {
        Self {
            normal,
            distance,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Plane through `point` facing `normal`
    pub fn from_point_normal(point: &Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        let distance = normal.dot(&point.coords);
        Self::new(normal, distance)
    }

    /// Plane from an arbitrary (non-unit) normal vector.
    ///
    /// The normal is normalized; `distance` is taken as already measured
    /// along the normalized direction.
    pub fn try_from_vector(normal: Vector3<f64>, distance: f64) -> Result<Self, SliceError> {
        if !distance.is_finite() {
            return Err(SliceError::DegeneratePlane);
        }
        let normal = unit_direction(normal)?;
        Ok(Self::new(normal, distance))
    }

    /// Plane through an arbitrary point facing an arbitrary (non-unit) direction
    pub fn try_from_point_direction(
        point: &Point3<f64>,
        direction: Vector3<f64>,
    ) -> Result<Self, SliceError> {
        if !point.coords.iter().all(|c| c.is_finite()) {
            return Err(SliceError::DegeneratePlane);
        }
        Ok(Self::from_point_normal(point, unit_direction(direction)?))
    }

    /// Plane through a transform's position facing its local up (+Y) axis
    pub fn from_transform(transform: &Isometry3<f64>) -> Self {
        let position = Point3::from(transform.translation.vector);
        let up = transform.rotation * Vector3::y_axis();
        Self::from_point_normal(&position, up)
    }

    /// World-space point and direction expressed in the local space of an
    /// object placed at `object_transform`.
    pub fn from_world(
        world_point: &Point3<f64>,
        world_direction: Vector3<f64>,
        object_transform: &Isometry3<f64>,
    ) -> Result<Self, SliceError> {
        let local_point = object_transform.inverse_transform_point(world_point);
        let local_direction = object_transform.inverse_transform_vector(&world_direction);
        Self::try_from_point_direction(&local_point, local_direction)
    }

    /// Same plane with a different classification tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn normal(&self) -> &Unit<Vector3<f64>> {
        &self.normal
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Plane with the opposite orientation (Above and Below swap)
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
            epsilon: self.epsilon,
        }
    }

    /// Signed distance of `point` from the plane
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.distance
    }

    /// Classify `point` against the plane
    pub fn classify(&self, point: &Point3<f64>) -> SideOfPlane {
        let d = self.signed_distance(point);

        if d > self.epsilon {
            SideOfPlane::Above
        } else if d < -self.epsilon {
            SideOfPlane::Below
        } else {
            SideOfPlane::On
        }
    }
}

fn unit_direction(direction: Vector3<f64>) -> Result<Unit<Vector3<f64>>, SliceError> {
    if !direction.iter().all(|c| c.is_finite()) {
        return Err(SliceError::DegeneratePlane);
    }
    Unit::try_new(direction, f64::EPSILON).ok_or(SliceError::DegeneratePlane)
}
