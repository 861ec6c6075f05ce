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

//! # Batsprite Pipeline
//!
//! Orchestration around `batsprite-core`: the render-job state machine,
//! OBJ and PNG export, and wrappers for the external archiving tools. The
//! host renderer stays behind the [`host::RenderHost`] trait.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod job;
pub mod raster;
pub mod tools;

pub use config::{JobConfig, PostProcessing, SuperSampling};
pub use error::PipelineError;
pub use host::{Raster, RenderHost};
pub use job::{JobState, RenderJob};
