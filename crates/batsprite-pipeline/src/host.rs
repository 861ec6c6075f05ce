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

//! The seam to the black-box renderer.
//!
//! The actual renderer lives in the host application and renders
//! asynchronously: [`RenderHost::request_render`] only starts a render, and
//! the finished raster comes back through
//! [`RenderJob::raster_ready`](crate::job::RenderJob::raster_ready).

use batsprite_core::rig::Placement;
use batsprite_core::{Camera, NightMode};
use image::RgbaImage;

use crate::error::PipelineError;

/// A rendered RGBA frame handed back by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Wraps a host image.
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrows the pixel data.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Unwraps the pixel data.
    #[inline]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Abstraction over the host application's scene and renderer.
pub trait RenderHost {
    /// Applies the fitted camera to the host scene.
    fn apply_camera(&mut self, camera: &Camera) -> Result<(), PipelineError>;

    /// Moves the sun light to match the current rotation.
    fn apply_sun(&mut self, placement: &Placement) -> Result<(), PipelineError>;

    /// Switches the scene lighting to the given variant.
    fn apply_night_mode(&mut self, mode: NightMode) -> Result<(), PipelineError>;

    /// Starts an asynchronous render at the given resolution.
    ///
    /// The host must deliver the finished frame to the job's `raster_ready`
    /// on the same thread that called this method.
    fn request_render(&mut self, width: u32, height: u32) -> Result<(), PipelineError>;
}
