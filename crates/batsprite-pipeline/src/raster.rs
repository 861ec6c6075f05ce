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

//! Raster post-processing: supersample reduction, tile cropping, PNG export.

use std::path::Path;

use batsprite_core::Canvas;
use image::RgbaImage;

use crate::error::PipelineError;

/// Halves an image with a 2x2 box filter.
///
/// Canvas sizes are multiples of 4 and supersampling doubles them, so the
/// evenness precondition always holds for pipeline rasters.
///
/// # Panics
///
/// Panics if either input dimension is odd; the last pixel row/column would
/// have no 2x2 block to average.
pub fn downsample_2x(image: &RgbaImage) -> RgbaImage {
    assert!(
        image.width() % 2 == 0 && image.height() % 2 == 0,
        "downsample input is {}x{}, expected even dimensions",
        image.width(),
        image.height()
    );
    let (w, h) = (image.width() / 2, image.height() / 2);
    RgbaImage::from_fn(w, h, |x, y| {
        let mut acc = [0u32; 4];
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let p = image.get_pixel(2 * x + dx, 2 * y + dy);
            for (a, &c) in acc.iter_mut().zip(p.0.iter()) {
                *a += c as u32;
            }
        }
        image::Rgba(acc.map(|c| (c / 4) as u8))
    })
}

/// Cuts one tile out of a full-canvas raster.
///
/// The crop matches [`Canvas::tile_dimensions_px`] exactly, including the
/// smaller last row/column.
///
/// # Panics
///
/// Panics if `row`/`col` lie outside the canvas grid or if `image` is
/// smaller than the canvas; the job validates raster dimensions before
/// cropping, other callers must do the same.
pub fn crop_tile(image: &RgbaImage, canvas: &Canvas, row: u32, col: u32) -> RgbaImage {
    let (w, h) = canvas.tile_dimensions_px(row, col);
    let x0 = col * 256;
    let y0 = row * 256;
    RgbaImage::from_fn(w, h, |x, y| *image.get_pixel(x0 + x, y0 + y))
}

/// Saves an image as PNG.
///
/// # Errors
///
/// [`PipelineError::Image`] on encode failure.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), PipelineError> {
    image.save(path)?;
    Ok(())
}
