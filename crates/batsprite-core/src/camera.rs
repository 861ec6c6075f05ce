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

//! The orthographic camera model and its projection math.
//!
//! The camera is a plain value type threaded explicitly through the fitting
//! steps; nothing here reads ambient scene state. The view convention follows
//! the host renderer: the camera looks along its local -Z axis, +Y is up, and
//! camera-local depth is therefore negative for points in front of the lens.

use crate::error::CoreError;
use crate::math::{Mat4, Vec3};

/// Output raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Horizontal size in pixels.
    pub width: u32,
    /// Vertical size in pixels.
    pub height: u32,
}

impl Resolution {
    /// A square reference resolution, used while measuring bounds before the
    /// real canvas dimensions are known.
    pub const SQUARE: Self = Self {
        width: 1,
        height: 1,
    };

    /// Creates a new resolution.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The larger of the two dimensions.
    #[inline]
    pub fn max_dim(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Horizontal extent as a fraction of the larger dimension (`<= 1`).
    #[inline]
    pub fn ratio_x(&self) -> f32 {
        self.width as f32 / self.max_dim() as f32
    }

    /// Vertical extent as a fraction of the larger dimension (`<= 1`).
    #[inline]
    pub fn ratio_y(&self) -> f32 {
        self.height as f32 / self.max_dim() as f32
    }
}

/// A normalized camera-view coordinate: `u`/`v` in `[0, 1]` within the
/// rendered frame ((0, 0) = bottom-left) and signed camera-local depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCoord {
    /// Horizontal position within the frame.
    pub u: f32,
    /// Vertical position within the frame.
    pub v: f32,
    /// Camera-local Z; negative for points in front of the camera.
    pub depth: f32,
}

/// The bounding rectangle of a point set in camera view, as
/// (left, right, top, bottom) `u`/`v` fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    /// Smallest `u` over the point set.
    pub left: f32,
    /// Largest `u` over the point set.
    pub right: f32,
    /// Largest `v` over the point set (top of the frame is `v = 1`).
    pub top: f32,
    /// Smallest `v` over the point set.
    pub bottom: f32,
}

/// Orthographic camera state.
///
/// `ortho_scale` is the world-unit extent spanned by the larger render
/// dimension; the shorter dimension shrinks with the aspect ratio. The shift
/// values move the frame by a fraction of the larger dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub location: Vec3,
    /// Orientation as XYZ euler angles in radians.
    pub rotation_euler: Vec3,
    /// World units spanned by the larger viewport axis.
    pub ortho_scale: f32,
    /// Horizontal frame shift, as a fraction of the larger dimension.
    pub shift_x: f32,
    /// Vertical frame shift, as a fraction of the larger dimension.
    pub shift_y: f32,
    /// Far clip distance in world units.
    pub clip_end: f32,
}

impl Camera {
    /// Creates a camera at the given placement with neutral shift and a
    /// placeholder orthographic scale.
    pub fn new(location: Vec3, rotation_euler: Vec3) -> Self {
        Self {
            location,
            rotation_euler,
            ortho_scale: 1.0,
            shift_x: 0.0,
            shift_y: 0.0,
            // 10 km, comfortably past any building
            clip_end: 10_000.0,
        }
    }

    /// The camera's object-to-world transform.
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation_euler_xyz(self.location, self.rotation_euler)
    }

    /// The world-to-camera transform.
    ///
    /// # Errors
    ///
    /// [`CoreError::DegenerateCamera`] if the transform cannot be inverted.
    #[inline]
    pub fn view_matrix(&self) -> Result<Mat4, CoreError> {
        self.world_matrix()
            .affine_inverse()
            .ok_or(CoreError::DegenerateCamera)
    }

    /// The view direction (local -Z) in world space.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.world_matrix().transform_vector3(-Vec3::Z)
    }

    /// Frame extents in world units for the given output resolution.
    ///
    /// Returns `(frame_x, frame_y)`: the larger dimension spans
    /// `ortho_scale`, the shorter one shrinks by the aspect ratio.
    #[inline]
    pub fn frame_extents(&self, resolution: Resolution) -> (f32, f32) {
        (
            self.ortho_scale * resolution.ratio_x(),
            self.ortho_scale * resolution.ratio_y(),
        )
    }

    /// Maps a world-space point into normalized camera-view coordinates.
    ///
    /// # Errors
    ///
    /// [`CoreError::DegenerateCamera`] for a non-invertible camera transform.
    pub fn world_to_camera(
        &self,
        point: Vec3,
        resolution: Resolution,
    ) -> Result<ViewCoord, CoreError> {
        let view = self.view_matrix()?;
        Ok(self.project_local(view.transform_point3(point), resolution))
    }

    /// Maps an already camera-local point into normalized view coordinates.
    #[inline]
    pub fn project_local(&self, local: Vec3, resolution: Resolution) -> ViewCoord {
        let (frame_x, frame_y) = self.frame_extents(resolution);
        ViewCoord {
            u: (local.x - self.shift_x * self.ortho_scale) / frame_x + 0.5,
            v: (local.y - self.shift_y * self.ortho_scale) / frame_y + 0.5,
            depth: local.z,
        }
    }

    /// Determines the bounding rectangle of a point set in camera view.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyBounds`] if `points` is empty, or
    /// [`CoreError::DegenerateCamera`] for a non-invertible transform.
    pub fn view_bounds(
        &self,
        points: &[Vec3],
        resolution: Resolution,
    ) -> Result<ViewBounds, CoreError> {
        if points.is_empty() {
            return Err(CoreError::EmptyBounds);
        }
        let view = self.view_matrix()?;
        let mut bounds = ViewBounds {
            left: f32::INFINITY,
            right: f32::NEG_INFINITY,
            top: f32::NEG_INFINITY,
            bottom: f32::INFINITY,
        };
        for &p in points {
            let c = self.project_local(view.transform_point3(p), resolution);
            bounds.left = bounds.left.min(c.u);
            bounds.right = bounds.right.max(c.u);
            bounds.top = bounds.top.max(c.v);
            bounds.bottom = bounds.bottom.min(c.v);
        }
        Ok(bounds)
    }

    /// Camera-local depth of the point nearest to the camera.
    ///
    /// Depths are negative in front of the camera, so the nearest point has
    /// the largest depth value.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyBounds`] if `points` is empty, or
    /// [`CoreError::DegenerateCamera`] for a non-invertible transform.
    pub fn distance_from_lod(&self, points: &[Vec3]) -> Result<f32, CoreError> {
        if points.is_empty() {
            return Err(CoreError::EmptyBounds);
        }
        let view = self.view_matrix()?;
        Ok(points
            .iter()
            .map(|&p| view.transform_point3(p).z)
            .fold(f32::NEG_INFINITY, f32::max))
    }

    /// The four corners of the rendered viewport in camera-local space, at
    /// unit distance in front of the camera.
    ///
    /// Order: bottom-left, bottom-right, top-left, top-right. The corners
    /// include the current shift and shrink the shorter dimension to match
    /// the output resolution.
    pub fn view_frame(&self, resolution: Resolution) -> [Vec3; 4] {
        let (frame_x, frame_y) = self.frame_extents(resolution);
        let cx = self.shift_x * self.ortho_scale;
        let cy = self.shift_y * self.ortho_scale;
        let (hx, hy) = (frame_x * 0.5, frame_y * 0.5);
        [
            Vec3::new(cx - hx, cy - hy, -1.0),
            Vec3::new(cx + hx, cy - hy, -1.0),
            Vec3::new(cx - hx, cy + hy, -1.0),
            Vec3::new(cx + hx, cy + hy, -1.0),
        ]
    }
}
