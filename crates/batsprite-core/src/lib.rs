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

//! # Batsprite Core
//!
//! Geometry core for rendering game-lot sprite sheets: orthographic camera
//! fitting calibrated to logical zoom levels, canvas tiling with
//! FSH-friendly size quantization, mesh slicing along the tile grid, and
//! the instance-id scheme naming each output. Pure and synchronous; all
//! I/O and orchestration live in `batsprite-pipeline`.

#![warn(missing_docs)]

pub mod camera;
pub mod canvas;
pub mod error;
pub mod fitter;
pub mod ids;
pub mod math;
pub mod mesh;
pub mod rig;
pub mod slicer;

pub use camera::{Camera, Resolution};
pub use canvas::Canvas;
pub use error::CoreError;
pub use ids::{NightMode, Rotation, Zoom};
pub use mesh::Mesh;
pub use slicer::MeshSlice;
