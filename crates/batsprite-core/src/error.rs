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

//! Error types for the geometry core.
//!
//! Every variant here is a precondition violation: a correct caller never
//! triggers one, so these are internal errors, not user-facing messages.

use std::fmt;

/// An error raised by the camera-fitting and slicing pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The bounding volume contained no vertices. Callers must guarantee at
    /// least one mesh vertex exists before fitting.
    EmptyBounds,
    /// The camera transform is not invertible.
    DegenerateCamera,
    /// The four view-frame corners could not be classified into
    /// bottom-left/bottom-right/top-left/top-right relative to their mean.
    DegenerateFrame,
    /// Canvas dimensions must be positive multiples of 4 (FSH block size).
    InvalidCanvasDimensions {
        /// The rejected width in pixels.
        width: u32,
        /// The rejected height in pixels.
        height: u32,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::EmptyBounds => {
                write!(f, "Bounding volume is empty; at least one vertex is required")
            }
            CoreError::DegenerateCamera => {
                write!(f, "Camera transform is degenerate (non-invertible)")
            }
            CoreError::DegenerateFrame => {
                write!(
                    f,
                    "View-frame corners are ambiguous relative to their mean point"
                )
            }
            CoreError::InvalidCanvasDimensions { width, height } => {
                write!(
                    f,
                    "Canvas dimensions {width}x{height} are not positive multiples of 4"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}
