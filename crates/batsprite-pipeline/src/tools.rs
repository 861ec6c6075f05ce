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

//! Wrappers around external command-line tools.
//!
//! Failures here are user-actionable (a wrong path in the settings, a
//! missing installation) and abort only the current job step, never the
//! host.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;
use thiserror::Error;

/// Failures from launching or running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The configured executable does not exist.
    #[error("{tool} not found at {path}; check the tool path in the job settings")]
    NotFound {
        /// Tool name.
        tool: &'static str,
        /// The configured path.
        path: PathBuf,
    },

    /// The executable could not be started.
    #[error("failed to launch {tool} ({path}): {source}")]
    Launch {
        /// Tool name.
        tool: &'static str,
        /// The configured path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure.
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        /// Tool name.
        tool: &'static str,
        /// The exit status.
        status: std::process::ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

fn run(tool: &'static str, path: &Path, args: &[&str]) -> Result<(), ToolError> {
    if !path.exists() {
        return Err(ToolError::NotFound {
            tool,
            path: path.to_path_buf(),
        });
    }
    let output = Command::new(path)
        .args(args)
        .output()
        .map_err(|source| ToolError::Launch {
            tool,
            path: path.to_path_buf(),
            source,
        })?;
    if !output.status.success() {
        return Err(ToolError::Failed {
            tool,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// The `fshgen` archiver, which packs the emitted `.png`/`.obj` set into an
/// SC4Model file.
#[derive(Debug, Clone)]
pub struct Fshgen {
    path: PathBuf,
}

impl Fshgen {
    /// Points the wrapper at the `fshgen` script.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Builds an SC4Model archive from the emitted files.
    pub fn build_archive(
        &self,
        inputs: &[PathBuf],
        output_file: &Path,
    ) -> Result<(), ToolError> {
        let mut args: Vec<&str> = vec![
            "import",
            "--force",
            "--with-BAT-models",
            "-o",
        ];
        let output_str = output_file.to_string_lossy();
        args.push(&output_str);
        let input_strs: Vec<String> = inputs
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        args.extend(input_strs.iter().map(String::as_str));
        run("fshgen", &self.path, &args)?;
        info!(
            "fshgen packed {} files into {}",
            inputs.len(),
            output_file.display()
        );
        Ok(())
    }
}

/// ImageMagick's `magick`, used by the preview path to halve oversized
/// renders.
#[derive(Debug, Clone)]
pub struct Downsampler {
    path: PathBuf,
}

impl Downsampler {
    /// Points the wrapper at the `magick` executable.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resizes an image to half its dimensions.
    pub fn downsample(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let input_str = input.to_string_lossy();
        let output_str = output.to_string_lossy();
        run(
            "magick",
            &self.path,
            &[&input_str, "-resize", "50%", &output_str],
        )
    }
}
