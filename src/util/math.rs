//! Math type re-exports and geometry helpers.
//!
//! This module re-exports types from `glam` and provides an axis-aligned
//! bounding box used for the `extent` attribute.

pub use glam::{Vec2, Vec3, Vec4, DVec3, Mat4, DMat4, Quat};

use std::fmt;

/// 3D bounding box with single precision.
#[derive(Clone, Copy, PartialEq)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Compute the bounds of a point array. Empty input gives [`BBox3f::EMPTY`].
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::EMPTY;
        for &p in points {
            bounds.expand_by_point(p);
        }
        bounds
    }

    /// Check if this box is empty (has no volume).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Min and max corners as a two-element array.
    pub fn corners(&self) -> [Vec3; 2] {
        [self.min, self.max]
    }
}

impl Default for BBox3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

/// Round a value to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f32, places: i32) -> f32 {
    let scale = 10f32.powi(places);
    (value * scale).round() / scale
}

/// Apply a 4x4 matrix to a point array in place.
pub fn transform_points(matrix: &Mat4, points: &mut [Vec3]) {
    for p in points.iter_mut() {
        *p = matrix.transform_point3(*p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_points() {
        let bounds = BBox3f::from_points(&[
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::ZERO,
        ]);
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 2.0, 0.5));
        assert_eq!(bounds.size(), Vec3::new(4.0, 4.0, 0.5));
    }

    #[test]
    fn test_bbox_empty() {
        assert!(BBox3f::from_points(&[]).is_empty());
        assert!(!BBox3f::from_points(&[Vec3::ONE]).is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123449, 4), 0.1234);
        assert_eq!(round_to(0.99996, 4), 1.0);
    }
}
