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

//! The 2D rendering canvas and its tile grid.
//!
//! A canvas is the full output raster, divided into tiles of at most
//! 256x256 px — the chunk size of the target FSH image format. The grid can
//! be mapped back into camera-local 3D coordinates to drive mesh slicing.

use crate::camera::{Camera, Resolution};
use crate::error::CoreError;
use crate::math::{Vec3, Vec2};

/// Maximum edge length of a tile in pixels (FSH chunk size).
pub const MAX_TILE_SIZE_PX: u32 = 256;
/// FSH dimensions must be multiples of this block size.
pub const MIN_TILE_SIZE_PX: u32 = 4;
/// Pixel padding added around the fitted volume to avoid boundary clipping.
pub const SLOP_PX: u32 = 3;

/// Rounds a raw pixel size up to the next FSH-friendly chunk size.
///
/// The FSH format stores image data in power-of-two-ish chunks; the remainder
/// past full 256 px chunks is bumped to the next breakpoint in
/// {0, 8, 16, 32, 64, 128, 256}. The result is always a multiple of 4.
pub fn round_up_to_chunk(raw: f32) -> u32 {
    let whole = raw.ceil().max(0.0) as u32;
    let count = whole / MAX_TILE_SIZE_PX;
    let rem = whole % MAX_TILE_SIZE_PX;
    let bumped = match rem {
        0 => 0,
        1..=8 => 8,
        9..=16 => 16,
        17..=32 => 32,
        33..=64 => 64,
        65..=128 => 128,
        _ => MAX_TILE_SIZE_PX,
    };
    count * MAX_TILE_SIZE_PX + bumped
}

/// Fractional bounds of a tile within the canvas, each in `[0, 1]`.
///
/// `top` is measured from the top of the image, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBorder {
    /// Left edge fraction.
    pub left: f32,
    /// Right edge fraction.
    pub right: f32,
    /// Top edge fraction.
    pub top: f32,
    /// Bottom edge fraction.
    pub bottom: f32,
}

/// Absolute camera-frame bounds of a tile, in camera-local world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteBorder {
    /// Camera-local X of the left edge.
    pub x_min: f32,
    /// Camera-local X of the right edge.
    pub x_max: f32,
    /// Camera-local Y of the top edge.
    pub y_max: f32,
    /// Camera-local Y of the bottom edge.
    pub y_min: f32,
}

/// A 2D rendering canvas, divided into tiles of size at most 256 px.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    width_px: u32,
    height_px: u32,
    num_columns: u32,
    num_rows: u32,
}

impl Canvas {
    /// Creates a canvas.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidCanvasDimensions`] unless both dimensions are
    /// positive multiples of 4.
    pub fn new(width_px: u32, height_px: u32) -> Result<Self, CoreError> {
        if width_px == 0
            || height_px == 0
            || width_px % MIN_TILE_SIZE_PX != 0
            || height_px % MIN_TILE_SIZE_PX != 0
        {
            return Err(CoreError::InvalidCanvasDimensions {
                width: width_px,
                height: height_px,
            });
        }
        Ok(Self {
            width_px,
            height_px,
            num_columns: width_px.div_ceil(MAX_TILE_SIZE_PX),
            num_rows: height_px.div_ceil(MAX_TILE_SIZE_PX),
        })
    }

    /// Canvas width in pixels.
    #[inline]
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Canvas height in pixels.
    #[inline]
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Number of tile columns.
    #[inline]
    pub fn num_columns(&self) -> u32 {
        self.num_columns
    }

    /// Number of tile rows.
    #[inline]
    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    /// The canvas dimensions as a render resolution.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width_px, self.height_px)
    }

    /// Pixel dimensions of a tile. Full tiles are 256x256; only the last
    /// row/column may be smaller.
    ///
    /// # Panics
    ///
    /// Panics if the tile index is outside the grid.
    pub fn tile_dimensions_px(&self, row: u32, col: u32) -> (u32, u32) {
        assert!(row < self.num_rows && col < self.num_columns);
        let w = if col == self.num_columns - 1 {
            self.width_px - col * MAX_TILE_SIZE_PX
        } else {
            MAX_TILE_SIZE_PX
        };
        let h = if row == self.num_rows - 1 {
            self.height_px - row * MAX_TILE_SIZE_PX
        } else {
            MAX_TILE_SIZE_PX
        };
        (w, h)
    }

    /// Iterates all tile positions in row-major order.
    ///
    /// The iterator is cheap to recreate; calling this again restarts from
    /// the first tile.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32)> {
        let (rows, cols) = (self.num_rows, self.num_columns);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// Fractional image-space bounds of a tile, clipped at the canvas edge.
    pub fn tile_border_fractional(&self, row: u32, col: u32) -> TileBorder {
        let w = self.width_px as f32;
        let h = self.height_px as f32;
        TileBorder {
            left: (col * MAX_TILE_SIZE_PX) as f32 / w,
            right: ((col + 1) * MAX_TILE_SIZE_PX).min(self.width_px) as f32 / w,
            top: (row * MAX_TILE_SIZE_PX) as f32 / h,
            bottom: ((row + 1) * MAX_TILE_SIZE_PX).min(self.height_px) as f32 / h,
        }
    }

    /// Maps the tile grid into camera-local 3D coordinates.
    ///
    /// Must be recomputed whenever the canvas or the camera changes.
    ///
    /// # Errors
    ///
    /// [`CoreError::DegenerateFrame`] if the camera frame corners cannot be
    /// classified.
    pub fn grid(&self, camera: &Camera) -> Result<CanvasGrid, CoreError> {
        let frame = CanvasFrame::from_corners(camera.view_frame(self.resolution()))?;
        let mut column_coords = Vec::with_capacity(self.num_columns as usize + 1);
        for col in 0..self.num_columns {
            let left = self.tile_border_fractional(0, col).left;
            column_coords.push(frame.weighted(left, 0.0));
        }
        column_coords.push(frame.top_r);
        let mut row_coords = Vec::with_capacity(self.num_rows as usize + 1);
        for row in 0..self.num_rows {
            let top = self.tile_border_fractional(row, 0).top;
            row_coords.push(frame.weighted(0.0, top));
        }
        row_coords.push(frame.bot_l);
        Ok(CanvasGrid {
            frame,
            column_coords,
            row_coords,
        })
    }
}

/// The four corners of the camera's rendered viewport in camera-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    /// Bottom-left corner.
    pub bot_l: Vec3,
    /// Bottom-right corner.
    pub bot_r: Vec3,
    /// Top-left corner.
    pub top_l: Vec3,
    /// Top-right corner.
    pub top_r: Vec3,
}

impl CanvasFrame {
    /// Classifies four unordered corner points by splitting on their mean.
    ///
    /// This assumes a convex quadrilateral with no corner aligned to the
    /// mean on either axis, which holds for every practical orthographic
    /// camera frame.
    ///
    /// # Errors
    ///
    /// [`CoreError::DegenerateFrame`] if any quadrant does not receive
    /// exactly one corner.
    pub fn from_corners(corners: [Vec3; 4]) -> Result<Self, CoreError> {
        let mean = (corners[0] + corners[1] + corners[2] + corners[3]) / 4.0;
        let pick = |left: bool, bottom: bool| -> Result<Vec3, CoreError> {
            let mut found = None;
            for &c in &corners {
                if (c.x < mean.x) == left && (c.y < mean.y) == bottom {
                    if found.is_some() {
                        return Err(CoreError::DegenerateFrame);
                    }
                    found = Some(c);
                }
            }
            found.ok_or(CoreError::DegenerateFrame)
        };
        Ok(Self {
            bot_l: pick(true, true)?,
            bot_r: pick(false, true)?,
            top_l: pick(true, false)?,
            top_r: pick(false, false)?,
        })
    }

    /// Bilinearly interpolates the frame corners.
    ///
    /// `sx = 0` is the left edge, `sy = 0` the top edge.
    pub fn weighted(&self, sx: f32, sy: f32) -> Vec3 {
        (self.top_l * (1.0 - sy) + self.bot_l * sy) * (1.0 - sx)
            + (self.top_r * (1.0 - sy) + self.bot_r * sy) * sx
    }

    /// Absolute camera-frame bounds of a tile.
    pub fn tile_border_absolute(&self, canvas: &Canvas, row: u32, col: u32) -> AbsoluteBorder {
        let b = canvas.tile_border_fractional(row, col);
        let tile_top_l = self.weighted(b.left, b.top);
        let tile_bot_r = self.weighted(b.right, b.bottom);
        AbsoluteBorder {
            x_min: tile_top_l.x,
            x_max: tile_bot_r.x,
            y_max: tile_top_l.y,
            y_min: tile_bot_r.y,
        }
    }
}

/// The tile grid of a canvas/camera pair, in camera-local coordinates.
///
/// `column_coords` holds one point per column boundary (`num_columns + 1`),
/// `row_coords` one per row boundary (`num_rows + 1`, top first).
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasGrid {
    /// The classified viewport corners.
    pub frame: CanvasFrame,
    /// Points on the column boundary lines, left to right.
    pub column_coords: Vec<Vec3>,
    /// Points on the row boundary lines, top to bottom.
    pub row_coords: Vec<Vec3>,
}

impl CanvasGrid {
    /// Tests whether a camera-local point lies inside a tile.
    ///
    /// Interior boundaries are half-open so that a point exactly on a shared
    /// grid line belongs to the lower row/column index only; the outer canvas
    /// edges are closed.
    pub fn is_point_in_tile(&self, p: Vec2, row: u32, col: u32) -> bool {
        let (row, col) = (row as usize, col as usize);
        let x0 = self.column_coords[col].x;
        let x1 = self.column_coords[col + 1].x;
        let y0 = self.row_coords[row].y;
        let y1 = self.row_coords[row + 1].y;
        let in_x = (if col == 0 { p.x >= x0 } else { p.x > x0 }) && p.x <= x1;
        let in_y = (if row == 0 { p.y <= y0 } else { p.y < y0 }) && p.y >= y1;
        in_x && in_y
    }

    /// Camera-local X positions of the interior column boundaries.
    pub fn interior_column_positions(&self) -> impl Iterator<Item = f32> + '_ {
        self.column_coords[1..self.column_coords.len() - 1]
            .iter()
            .map(|c| c.x)
    }

    /// Camera-local Y positions of the interior row boundaries.
    pub fn interior_row_positions(&self) -> impl Iterator<Item = f32> + '_ {
        self.row_coords[1..self.row_coords.len() - 1]
            .iter()
            .map(|c| c.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_round_up_to_chunk_vectors() {
        assert_eq!(round_up_to_chunk(0.0), 0);
        assert_eq!(round_up_to_chunk(5.0), 8);
        assert_eq!(round_up_to_chunk(20.0), 32);
        assert_eq!(round_up_to_chunk(152.0), 256);
        assert_eq!(round_up_to_chunk(256.0), 256);
        assert_eq!(round_up_to_chunk(260.0), 264);
        assert_eq!(round_up_to_chunk(400.0), 512);
        assert_eq!(round_up_to_chunk(276.5), 288);
    }

    #[test]
    fn test_round_up_to_chunk_is_idempotent() {
        for raw in [0.0, 5.0, 130.0, 256.0, 260.0, 400.0, 1000.0] {
            let once = round_up_to_chunk(raw);
            assert_eq!(round_up_to_chunk(once as f32), once);
            assert_eq!(once % MIN_TILE_SIZE_PX, 0);
        }
    }

    #[test]
    fn test_canvas_rejects_bad_dimensions() {
        assert!(Canvas::new(250, 128).is_err());
        assert!(Canvas::new(0, 128).is_err());
        assert!(Canvas::new(128, 130).is_err());
        assert!(Canvas::new(128, 128).is_ok());
    }

    #[test]
    fn test_row_and_column_counts() {
        let c = Canvas::new(600, 256).unwrap();
        assert_eq!(c.num_columns(), 3);
        assert_eq!(c.num_rows(), 1);
        let c = Canvas::new(256, 257 + 3).unwrap();
        assert_eq!(c.num_rows(), 2);
    }

    #[test]
    fn test_tile_dimensions_reconstruct_canvas() {
        let c = Canvas::new(600, 300).unwrap();
        for row in 0..c.num_rows() {
            let w: u32 = (0..c.num_columns())
                .map(|col| c.tile_dimensions_px(row, col).0)
                .sum();
            assert_eq!(w, c.width_px());
        }
        for col in 0..c.num_columns() {
            let h: u32 = (0..c.num_rows())
                .map(|row| c.tile_dimensions_px(row, col).1)
                .sum();
            assert_eq!(h, c.height_px());
        }
        // only the last row/column deviates from 256
        assert_eq!(c.tile_dimensions_px(0, 0), (256, 256));
        assert_eq!(c.tile_dimensions_px(1, 2), (88, 44));
    }

    #[test]
    fn test_fractional_borders_partition_unit_interval() {
        let c = Canvas::new(600, 520).unwrap();
        for row in 1..c.num_rows() {
            let above = c.tile_border_fractional(row - 1, 0);
            let here = c.tile_border_fractional(row, 0);
            assert!(approx_eq(above.bottom, here.top));
        }
        for col in 1..c.num_columns() {
            let left = c.tile_border_fractional(0, col - 1);
            let here = c.tile_border_fractional(0, col);
            assert!(approx_eq(left.right, here.left));
        }
        let first = c.tile_border_fractional(0, 0);
        let last = c.tile_border_fractional(c.num_rows() - 1, c.num_columns() - 1);
        assert!(approx_eq(first.left, 0.0) && approx_eq(first.top, 0.0));
        assert!(approx_eq(last.right, 1.0) && approx_eq(last.bottom, 1.0));
    }

    #[test]
    fn test_tiles_iteration_is_row_major_and_restartable() {
        let c = Canvas::new(600, 300).unwrap();
        let tiles: Vec<_> = c.tiles().collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], (0, 0));
        assert_eq!(tiles[1], (0, 1));
        assert_eq!(tiles[3], (1, 0));
        assert_eq!(c.tiles().count(), 6);
    }

    #[test]
    fn test_frame_corner_classification() {
        let corners = [
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ];
        let frame = CanvasFrame::from_corners(corners).unwrap();
        assert_eq!(frame.bot_l, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(frame.top_r, Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_degenerate_frame_is_rejected() {
        // all corners on a vertical line: left/right split is ambiguous
        let corners = [
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 2.0, -1.0),
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(0.0, -2.0, -1.0),
        ];
        assert_eq!(
            CanvasFrame::from_corners(corners),
            Err(CoreError::DegenerateFrame)
        );
    }

    #[test]
    fn test_weighted_interpolation() {
        let frame = CanvasFrame {
            bot_l: Vec3::new(-1.0, -1.0, -1.0),
            bot_r: Vec3::new(1.0, -1.0, -1.0),
            top_l: Vec3::new(-1.0, 1.0, -1.0),
            top_r: Vec3::new(1.0, 1.0, -1.0),
        };
        assert_eq!(frame.weighted(0.0, 0.0), frame.top_l);
        assert_eq!(frame.weighted(1.0, 1.0), frame.bot_r);
        let mid = frame.weighted(0.5, 0.5);
        assert!(approx_eq(mid.x, 0.0) && approx_eq(mid.y, 0.0));
    }

    #[test]
    fn test_grid_boundary_counts() {
        let cam = {
            let mut cam = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
            cam.ortho_scale = 600.0;
            cam
        };
        let canvas = Canvas::new(600, 300).unwrap();
        let grid = canvas.grid(&cam).unwrap();
        assert_eq!(grid.column_coords.len(), 4);
        assert_eq!(grid.row_coords.len(), 3);
        // boundaries run left to right and top to bottom
        assert!(grid.column_coords[0].x < grid.column_coords[3].x);
        assert!(grid.row_coords[0].y > grid.row_coords[2].y);
    }

    #[test]
    fn test_point_on_shared_boundary_belongs_to_lower_index() {
        let cam = {
            let mut cam = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
            cam.ortho_scale = 512.0;
            cam
        };
        let canvas = Canvas::new(512, 512).unwrap();
        let grid = canvas.grid(&cam).unwrap();
        let x_boundary = grid.column_coords[1].x;
        let y_boundary = grid.row_coords[1].y;
        let p = Vec2::new(x_boundary, y_boundary);
        let hits: Vec<_> = canvas
            .tiles()
            .filter(|&(row, col)| grid.is_point_in_tile(p, row, col))
            .collect();
        assert_eq!(hits, vec![(0, 0)]);
    }
}
