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

//! Wavefront OBJ export of sliced geometry.
//!
//! One `.obj` file holds every nonempty tile slice as its own `o` group.
//! The game expects the model aligned to the view it was rendered from, so
//! the axis remap depends on the rotation: the base mapping takes scene
//! coordinates to OBJ's Y-up convention with -Z forward (south view), and
//! the other rotations add a quarter turn each about the OBJ up axis.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use batsprite_core::math::Vec3;
use batsprite_core::{MeshSlice, Rotation};
use log::info;

use crate::error::PipelineError;

/// Maps a world-space scene position into OBJ coordinates for a rotation.
fn obj_position(p: Vec3, rotation: Rotation) -> Vec3 {
    // scene (x, y, z) -> OBJ (x, z, -y), Y up, -Z forward
    let south = Vec3::new(p.x, p.z, -p.y);
    match rotation {
        Rotation::South => south,
        Rotation::East => Vec3::new(south.z, south.y, -south.x),
        Rotation::North => Vec3::new(-south.x, south.y, -south.z),
        Rotation::West => Vec3::new(-south.z, south.y, south.x),
    }
}

/// Writes the nonempty slices to a single OBJ file.
///
/// Faces are fan-triangulated and written as `f v/vt` records; vertex and
/// texture indices share the same numbering. Empty slices are skipped.
///
/// # Errors
///
/// [`PipelineError::Io`] when the file cannot be written.
pub fn export_obj(
    path: &Path,
    slices: &BTreeMap<(u32, u32), MeshSlice>,
    rotation: Rotation,
) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut out = BufWriter::new(file);
    let io_err = |e: std::io::Error| PipelineError::io(path, e);

    let mut base_index = 1u32;
    let mut groups = 0usize;
    for ((row, col), slice) in slices {
        if slice.is_empty() {
            continue;
        }
        writeln!(out, "o tile_{row}_{col}").map_err(io_err)?;
        for &p in &slice.mesh.positions {
            let v = obj_position(p, rotation);
            writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z).map_err(io_err)?;
        }
        for uv in &slice.uv {
            writeln!(out, "vt {:.6} {:.6}", uv.x, uv.y).map_err(io_err)?;
        }
        for face in &slice.mesh.faces {
            for k in 1..face.len() - 1 {
                let (a, b, c) = (
                    base_index + face[0],
                    base_index + face[k],
                    base_index + face[k + 1],
                );
                writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}").map_err(io_err)?;
            }
        }
        base_index += slice.mesh.vertex_count() as u32;
        groups += 1;
    }
    out.flush().map_err(io_err)?;
    info!("exported {groups} tile groups to {}", path.display());
    Ok(())
}
