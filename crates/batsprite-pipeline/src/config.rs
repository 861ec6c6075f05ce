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

//! Render-job configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use batsprite_core::NightMode;
use serde::{Deserialize, Serialize};

/// Group ids reserved by the base game; a generated id must avoid them.
const RESERVED_GROUP_IDS: [u32; 8] = [
    0xbadb57f1, 0x1abe787d, 0x0986135e, 0x2bc2759a, 0x2a2458f9, 0x49a593e7, 0x891b0e1a, 0x46a006b0,
];

/// Supersampling factor applied to the render resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SuperSampling {
    /// Render at the target resolution.
    #[default]
    Off,
    /// Render at twice the target resolution, then box-filter down.
    X2,
}

impl SuperSampling {
    /// The resolution multiplier.
    #[inline]
    pub fn factor(&self) -> u32 {
        match self {
            Self::Off => 1,
            Self::X2 => 2,
        }
    }
}

/// Post-processing settings for building the final model archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessing {
    /// Path to the archiver executable.
    pub fshgen_path: PathBuf,
}

/// Everything a render job needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// The group id stamped into every output filename.
    pub group_id: u32,
    /// Render the closest zoom at doubled pixel density.
    pub hd: bool,
    /// Which lighting variants to render.
    ///
    /// Output filenames distinguish only day from night, so a job accepts at
    /// most one night variant; `RenderJob::new` rejects collisions.
    pub night_modes: Vec<NightMode>,
    /// Supersampling factor for each render.
    pub supersampling: SuperSampling,
    /// Directory receiving the emitted `.obj` and `.png` files.
    pub output_dir: PathBuf,
    /// Archive-building step, skipped when absent.
    pub post_processing: Option<PostProcessing>,
}

impl JobConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading job config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing job config {}", path.display()))
    }

    /// Saves the configuration as JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing job config {}", path.display()))
    }

    /// The group id as the 8-hex-digit string used in filenames.
    pub fn group_id_hex(&self) -> String {
        format!("{:08x}", self.group_id)
    }
}

/// Draws a random group id outside the reserved set.
pub fn randomize_group_id() -> u32 {
    loop {
        let id = rand::random::<u32>();
        if !RESERVED_GROUP_IDS.contains(&id) {
            return id;
        }
    }
}
