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

//! Pipeline error types.

use std::path::PathBuf;

use batsprite_core::CoreError;
use thiserror::Error;

use crate::tools::ToolError;

/// Errors surfaced by the render pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The geometry core rejected its inputs.
    #[error("geometry error: {0}")]
    Geometry(#[from] CoreError),

    /// A file could not be read or written.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Encoding or decoding an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// An external tool failed; see [`ToolError`] for the user-facing detail.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Two configured night modes map to the same instance ids.
    #[error(
        "night modes {first} and {second} share the same instance-id night flag \
         and would overwrite each other's output files; run them as separate jobs"
    )]
    ConflictingNightModes {
        /// Label of the first configured mode.
        first: &'static str,
        /// Label of the mode colliding with it.
        second: &'static str,
    },

    /// A raster was delivered while the job was not waiting for one.
    #[error("render job is in state {state:?}, not awaiting a raster")]
    UnexpectedRaster {
        /// The state the job was actually in.
        state: crate::job::JobState,
    },

    /// The delivered raster does not match the canvas the job requested.
    #[error("raster is {got_width}x{got_height}, expected {want_width}x{want_height}")]
    RasterMismatch {
        /// Delivered width.
        got_width: u32,
        /// Delivered height.
        got_height: u32,
        /// Requested width.
        want_width: u32,
        /// Requested height.
        want_height: u32,
    },
}

impl PipelineError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
