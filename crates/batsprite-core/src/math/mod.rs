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

//! Mathematical primitives for the render pipeline.
//!
//! Vectors, a 4x4 affine matrix, an axis-aligned bounding box, and a handful
//! of scalar helpers. All angles are in **radians** unless a function name
//! says otherwise.

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;

pub mod geometry;
pub mod matrix;
pub mod vector;

pub use self::geometry::Aabb;
pub use self::matrix::Mat4;
pub use self::vector::{Vec2, Vec3, Vec4};

/// Converts an angle from degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Clamps a value to a specified minimum and maximum range.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linearly remaps `value` from the range `[from_lo, from_hi]` to
/// `[to_lo, to_hi]`.
///
/// The value is not clamped; inputs outside the source range extrapolate.
#[inline]
pub fn remap(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    let scaled = (value - from_lo) / (from_hi - from_lo);
    to_lo + scaled * (to_hi - to_lo)
}

/// Performs an approximate equality comparison with a custom tolerance.
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_and_saturate() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(saturate(2.0), 1.0);
        assert_eq!(saturate(-2.0), 0.0);
    }

    #[test]
    fn test_remap() {
        assert!(approx_eq(remap(5.0, 0.0, 10.0, 0.0, 1.0), 0.5));
        assert!(approx_eq(remap(0.0, -1.0, 1.0, 0.0, 100.0), 50.0));
        // extrapolates outside the source range
        assert!(approx_eq(remap(20.0, 0.0, 10.0, 0.0, 1.0), 2.0));
    }

    #[test]
    fn test_degrees_to_radians() {
        assert!(approx_eq(degrees_to_radians(180.0), PI));
        assert!(approx_eq(degrees_to_radians(90.0), FRAC_PI_2));
    }
}
