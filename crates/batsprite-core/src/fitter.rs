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

//! Pixel-perfect camera fitting.
//!
//! Zoom levels are calibrated against a fixed 16x16-unit reference cell, not
//! against the model: a cell must always span the same number of pixels at a
//! given zoom, whatever the model's own size. The fitter measures the model
//! against that reference, sizes a canvas with a small slop margin, and then
//! compensates the orthographic scale for canvas quantization so the pixel
//! density stays exact.

use log::debug;

use crate::camera::Camera;
use crate::canvas::{round_up_to_chunk, Canvas, SLOP_PX};
use crate::error::CoreError;
use crate::ids::Zoom;
use crate::math::Vec3;

/// Expected horizontal pixel extent of a 16-unit reference cell per zoom.
const ZOOM_CELL_PX: [u32; 5] = [10, 19, 37, 73, 146];

/// Extra clearance in world units applied when pushing the camera back.
const PUSH_BACK_CLEARANCE: f32 = 80.0;

/// Pixel extent of the reference cell at a zoom level.
///
/// HD doubles the density of the closest zoom only; all other levels share
/// the SD table.
#[inline]
pub fn zoom_cell_px(zoom: Zoom, hd: bool) -> u32 {
    let px = ZOOM_CELL_PX[zoom.index()];
    if hd && zoom == Zoom::Five {
        px * 2
    } else {
        px
    }
}

/// Corners of the fixed 16x16 calibration square in the ground plane.
fn reference_square() -> [Vec3; 4] {
    [
        Vec3::new(-8.0, -8.0, 0.0),
        Vec3::new(8.0, -8.0, 0.0),
        Vec3::new(8.0, 8.0, 0.0),
        Vec3::new(-8.0, 8.0, 0.0),
    ]
}

/// Minimal orthographic scale at which `points` fit the camera's viewport.
///
/// Measured at square aspect with neutral shift; the scale equals the larger
/// camera-local extent of the point set. Lateral centering is left to
/// [`offset_camera`].
///
/// # Errors
///
/// [`CoreError::EmptyBounds`] for an empty slice,
/// [`CoreError::DegenerateCamera`] for a non-invertible transform.
pub fn fit_points_scale(camera: &Camera, points: &[Vec3]) -> Result<f32, CoreError> {
    if points.is_empty() {
        return Err(CoreError::EmptyBounds);
    }
    let view = camera.view_matrix()?;
    let mut min = (f32::INFINITY, f32::INFINITY);
    let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for &p in points {
        let local = view.transform_point3(p);
        min = (min.0.min(local.x), min.1.min(local.y));
        max = (max.0.max(local.x), max.1.max(local.y));
    }
    Ok((max.0 - min.0).max(max.1 - min.1))
}

/// Smallest integer multiple of the reference scale covering the model scale.
///
/// Used to decide how far a render has outgrown one reference cell, e.g. to
/// advise a supersampling factor.
pub fn scale_factor(os_lod: f32, os_ref: f32) -> u32 {
    (os_lod / os_ref).ceil().max(1.0) as u32
}

/// Shifts the camera frame so the volume sits flush against the top-left
/// slop margin.
///
/// # Errors
///
/// Propagates measurement errors from [`Camera::view_bounds`].
pub fn offset_camera(
    camera: &mut Camera,
    points: &[Vec3],
    canvas: &Canvas,
) -> Result<(), CoreError> {
    let res = canvas.resolution();
    let bounds = camera.view_bounds(points, res)?;
    let dim_x = res.width as f32;
    let dim_y = res.height as f32;
    let max_dim = res.max_dim() as f32;
    let slop = SLOP_PX as f32;
    camera.shift_x += (bounds.left * dim_x - slop) / max_dim;
    camera.shift_y += (bounds.top * dim_y - (dim_y - slop)) / max_dim;
    Ok(())
}

/// Moves the camera back along its view axis until the volume's near extent
/// has generous clearance.
///
/// Scales the location by `(distance - nearest_depth + 80) / distance`;
/// `nearest_depth` is camera-local and negative, so the factor exceeds 1 for
/// any volume in front of the camera. Orthographic projection is unaffected
/// by the move.
///
/// # Errors
///
/// [`CoreError::DegenerateCamera`] if the camera sits at the origin,
/// otherwise propagates measurement errors.
pub fn push_back(camera: &mut Camera, points: &[Vec3]) -> Result<(), CoreError> {
    let distance = camera.location.length();
    if distance <= f32::EPSILON {
        return Err(CoreError::DegenerateCamera);
    }
    let nearest_depth = camera.distance_from_lod(points)?;
    let factor = (distance - nearest_depth + PUSH_BACK_CLEARANCE) / distance;
    camera.location = camera.location * factor;
    Ok(())
}

/// Fits the camera to a bounding volume at a zoom level and sizes the canvas.
///
/// Returns the adjusted camera together with the quantized canvas. The
/// volume ends up flush against the top-left corner with a 3 px margin, a
/// 16-unit ground cell spans exactly [`zoom_cell_px`] pixels, and the camera
/// is pulled back clear of the volume's near extent.
///
/// # Errors
///
/// [`CoreError::EmptyBounds`] if `points` is empty; camera and canvas errors
/// propagate.
pub fn fit(
    mut camera: Camera,
    points: &[Vec3],
    zoom: Zoom,
    hd: bool,
) -> Result<(Camera, Canvas), CoreError> {
    let os_ref = fit_points_scale(&camera, &reference_square())?;
    let os_lod = fit_points_scale(&camera, points)?;
    let dim_lod = zoom_cell_px(zoom, hd) as f32 * os_lod / os_ref;
    camera.ortho_scale = os_lod;

    let side = round_up_to_chunk(dim_lod + 2.0 * SLOP_PX as f32);
    let canvas = Canvas::new(side, side)?;
    camera.ortho_scale *= canvas.resolution().max_dim() as f32 / dim_lod;
    debug!(
        "fit: os_ref={os_ref:.3} os_lod={os_lod:.3} dim_lod={dim_lod:.2} canvas={}x{}",
        canvas.width_px(),
        canvas.height_px()
    );

    offset_camera(&mut camera, points, &canvas)?;
    push_back(&mut camera, points)?;
    Ok((camera, canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Rotation;
    use crate::math::Aabb;
    use crate::mesh::Mesh;
    use crate::rig;
    use approx::assert_relative_eq;

    fn cube_16() -> Vec<Vec3> {
        Mesh::cuboid(&Aabb::from_min_max(
            Vec3::new(-8.0, -8.0, 0.0),
            Vec3::new(8.0, 8.0, 16.0),
        ))
        .positions
    }

    #[test]
    fn test_zoom_cell_px_tables() {
        assert_eq!(zoom_cell_px(Zoom::One, false), 10);
        assert_eq!(zoom_cell_px(Zoom::Five, false), 146);
        assert_eq!(zoom_cell_px(Zoom::Five, true), 292);
        // HD only doubles the closest zoom
        assert_eq!(zoom_cell_px(Zoom::Four, true), 73);
    }

    #[test]
    fn test_fit_points_scale_straight_down() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        let scale = fit_points_scale(&cam, &reference_square()).unwrap();
        assert_relative_eq!(scale, 16.0, epsilon = 1e-3);
    }

    #[test]
    fn test_fit_points_scale_empty_is_an_error() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        assert_eq!(fit_points_scale(&cam, &[]), Err(CoreError::EmptyBounds));
    }

    #[test]
    fn test_scale_factor_rounds_up() {
        assert_eq!(scale_factor(10.0, 10.0), 1);
        assert_eq!(scale_factor(10.1, 10.0), 2);
        assert_eq!(scale_factor(95.0, 10.0), 10);
        assert_eq!(scale_factor(0.5, 10.0), 1);
    }

    #[test]
    fn test_fit_cube_zoom_five_sd() {
        let camera = rig::setup_camera(Rotation::South, Zoom::Five);
        let (_, canvas) = fit(camera, &cube_16(), Zoom::Five, false).unwrap();
        assert_eq!(canvas.width_px(), canvas.height_px());
        assert!(canvas.width_px() >= 150);
        assert_eq!(canvas.width_px() % 8, 0);
        assert_eq!(canvas.num_columns(), 1);
        assert_eq!(canvas.num_rows(), 1);
    }

    #[test]
    fn test_fit_cube_zoom_five_hd_spans_multiple_tiles() {
        let camera = rig::setup_camera(Rotation::South, Zoom::Five);
        let (_, canvas) = fit(camera, &cube_16(), Zoom::Five, true).unwrap();
        assert!(canvas.num_columns() >= 2);
    }

    #[test]
    fn test_fit_leaves_volume_flush_to_margin() {
        let camera = rig::setup_camera(Rotation::South, Zoom::Five);
        let points = cube_16();
        let (camera, canvas) = fit(camera, &points, Zoom::Five, false).unwrap();
        let res = canvas.resolution();
        let bounds = camera.view_bounds(&points, res).unwrap();
        assert_relative_eq!(bounds.left * res.width as f32, 3.0, epsilon = 0.05);
        assert_relative_eq!(
            bounds.top * res.height as f32,
            res.height as f32 - 3.0,
            epsilon = 0.05
        );
        // the rest of the volume stays inside the frame
        assert!(bounds.right <= 1.0 + 1e-4);
        assert!(bounds.bottom >= -1e-4);
    }

    #[test]
    fn test_fit_preserves_pixel_density() {
        let camera = rig::setup_camera(Rotation::South, Zoom::Five);
        let (camera, canvas) = fit(camera, &cube_16(), Zoom::Five, false).unwrap();
        // the reference cell must span the zoom-table pixel count exactly:
        // pixels per world unit stays zoom_px / os_ref through quantization
        let os_ref = fit_points_scale(&camera, &reference_square()).unwrap();
        let px_per_unit = canvas.width_px() as f32 / camera.ortho_scale;
        assert_relative_eq!(px_per_unit, 146.0 / os_ref, epsilon = 1e-3);
    }

    #[test]
    fn test_push_back_increases_distance() {
        let mut camera = rig::setup_camera(Rotation::South, Zoom::Five);
        let before = camera.location;
        push_back(&mut camera, &cube_16()).unwrap();
        let after = camera.location;
        assert!(after.length() > before.length() + PUSH_BACK_CLEARANCE - 1.0);
        // only the distance grows, not the direction
        assert_relative_eq!(
            before.normalize().dot(after.normalize()),
            1.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_push_back_from_origin_is_an_error() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(
            push_back(&mut camera, &cube_16()),
            Err(CoreError::DegenerateCamera)
        );
    }
}
