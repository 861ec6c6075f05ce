// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Geometric primitives for spatial calculations.

use super::Vec3;

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// Used to describe the bounding volume of the render subject, from which the
/// LOD box mesh is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new `Aabb` from two corner points.
    ///
    /// The `min` field always holds the component-wise minimum and `max` the
    /// component-wise maximum, regardless of argument order.
    #[inline]
    pub fn from_min_max(min_pt: Vec3, max_pt: Vec3) -> Self {
        Self {
            min: Vec3::new(
                min_pt.x.min(max_pt.x),
                min_pt.y.min(max_pt.y),
                min_pt.z.min(max_pt.z),
            ),
            max: Vec3::new(
                min_pt.x.max(max_pt.x),
                min_pt.y.max(max_pt.y),
                min_pt.z.max(max_pt.z),
            ),
        }
    }

    /// Creates an `Aabb` that tightly encloses a given set of points.
    ///
    /// # Returns
    ///
    /// `Some(Aabb)` if the input slice is not empty, otherwise `None`.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_pt = points[0];
        let mut max_pt = points[0];

        for point in points.iter().skip(1) {
            min_pt.x = min_pt.x.min(point.x);
            min_pt.y = min_pt.y.min(point.y);
            min_pt.z = min_pt.z.min(point.z);

            max_pt.x = max_pt.x.max(point.x);
            max_pt.y = max_pt.y.max(point.y);
            max_pt.z = max_pt.z.max(point.z);
        }

        Some(Self {
            min: min_pt,
            max: max_pt,
        })
    }

    /// Returns the center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of the box (distance from center to faces).
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns the eight corner points of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_min_max_normalizes_order() {
        let b = Aabb::from_min_max(Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_points() {
        let pts = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, -1.0, 2.0),
            Vec3::new(-2.0, 3.0, 1.0),
        ];
        let b = Aabb::from_points(&pts).unwrap();
        assert_eq!(b.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(4.0, 3.0, 2.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_center_and_half_extents() {
        let b = Aabb::from_min_max(Vec3::new(-8.0, -8.0, 0.0), Vec3::new(8.0, 8.0, 4.0));
        assert_eq!(b.center(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(b.half_extents(), Vec3::new(8.0, 8.0, 2.0));
        assert_eq!(b.corners().len(), 8);
    }
}
