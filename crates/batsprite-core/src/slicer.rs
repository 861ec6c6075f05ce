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

//! Slices a mesh along the canvas tile grid.
//!
//! The sliced pieces carry per-tile UVs so a renderer can map each tile's
//! raster back onto the matching geometry. The cut happens in camera-local
//! space: grid lines there are axis-aligned, so every cut is a plane test.

use std::collections::{BTreeMap, HashMap};

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::error::CoreError;
use crate::math::{remap, saturate, Vec2, Vec3, EPSILON};
use crate::mesh::Mesh;

/// One tile's share of a sliced mesh, in camera-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSlice {
    /// The tile-local geometry.
    pub mesh: Mesh,
    /// Per-vertex texture coordinates in `[0, 1]`, `v = 0` at the tile's
    /// bottom edge.
    pub uv: Vec<Vec2>,
}

impl MeshSlice {
    /// True if no geometry landed in this tile.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Drops faces pointing away from the camera.
///
/// The test uses world-space normals against the camera view direction. An
/// orthographic camera sees every front face at the same angle, so this is
/// exact, not an approximation.
pub fn visible_faces(mesh: &Mesh, view_dir: Vec3) -> Mesh {
    let faces = (0..mesh.face_count())
        .filter(|&f| mesh.face_normal(f).dot(view_dir) < 0.0)
        .map(|f| mesh.faces[f].clone())
        .collect();
    Mesh::new(mesh.positions.clone(), faces)
}

/// Splits a convex polygon against an axis plane.
///
/// Returns the loops at or below and at or above the plane value; vertices on
/// the plane appear in both, and edges crossing the plane gain an
/// interpolated vertex.
fn split_polygon(
    poly: &[Vec3],
    axis_value: impl Fn(&Vec3) -> f32,
    plane: f32,
) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut below = Vec::new();
    let mut above = Vec::new();
    for k in 0..poly.len() {
        let a = poly[k];
        let b = poly[(k + 1) % poly.len()];
        let da = axis_value(&a) - plane;
        let db = axis_value(&b) - plane;
        if da <= EPSILON {
            below.push(a);
        }
        if da >= -EPSILON {
            above.push(a);
        }
        // strict sign change: the edge pierces the plane
        if (da < -EPSILON && db > EPSILON) || (da > EPSILON && db < -EPSILON) {
            let t = da / (da - db);
            let cut = Vec3::lerp(a, b, t);
            below.push(cut);
            above.push(cut);
        }
    }
    (below, above)
}

fn split_all(
    polys: Vec<Vec<Vec3>>,
    axis_value: impl Fn(&Vec3) -> f32 + Copy,
    plane: f32,
) -> Vec<Vec<Vec3>> {
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        let (below, above) = split_polygon(&poly, axis_value, plane);
        if below.len() >= 3 {
            out.push(below);
        }
        if above.len() >= 3 {
            out.push(above);
        }
    }
    out
}

fn centroid(poly: &[Vec3]) -> Vec3 {
    poly.iter().fold(Vec3::ZERO, |acc, &p| acc + p) / poly.len() as f32
}

/// Builds an indexed mesh from loose polygon loops, merging exactly equal
/// positions so shared cut vertices index the same slot.
fn index_polygons(polys: &[Vec<Vec3>]) -> Mesh {
    let mut lookup: HashMap<(u32, u32, u32), u32> = HashMap::new();
    let mut positions = Vec::new();
    let mut faces = Vec::with_capacity(polys.len());
    for poly in polys {
        let mut face = Vec::with_capacity(poly.len());
        for &p in poly {
            let key = (p.x.to_bits(), p.y.to_bits(), p.z.to_bits());
            let idx = *lookup.entry(key).or_insert_with(|| {
                positions.push(p);
                positions.len() as u32 - 1
            });
            face.push(idx);
        }
        faces.push(face);
    }
    Mesh::new(positions, faces)
}

/// Cuts the camera-facing side of a world-space mesh along the tile grid.
///
/// The map holds one entry per tile, empty slices included; check
/// [`MeshSlice::is_empty`] before exporting. Each slice lives in camera-local
/// coordinates with contiguous vertex indices. A face that straddles a grid
/// line is bisected, and the resulting pieces land in the tile holding their
/// centroid.
///
/// # Errors
///
/// [`CoreError::DegenerateCamera`] or [`CoreError::DegenerateFrame`] if the
/// camera transform or frame is unusable.
pub fn sliced(
    mesh: &Mesh,
    camera: &Camera,
    canvas: &Canvas,
) -> Result<BTreeMap<(u32, u32), MeshSlice>, CoreError> {
    let grid = canvas.grid(camera)?;
    let view = camera.view_matrix()?;
    let local = visible_faces(mesh, camera.forward()).transformed(&view);

    let mut polys: Vec<Vec<Vec3>> = local
        .faces
        .iter()
        .map(|f| f.iter().map(|&i| local.positions[i as usize]).collect())
        .collect();
    for x in grid.interior_column_positions().collect::<Vec<_>>() {
        polys = split_all(polys, |p| p.x, x);
    }
    for y in grid.interior_row_positions().collect::<Vec<_>>() {
        polys = split_all(polys, |p| p.y, y);
    }

    let mut buckets: BTreeMap<(u32, u32), Vec<Vec<Vec3>>> = BTreeMap::new();
    for poly in polys {
        let c = centroid(&poly);
        let hit = canvas
            .tiles()
            .find(|&(row, col)| grid.is_point_in_tile(c.truncate(), row, col));
        if let Some(tile) = hit {
            buckets.entry(tile).or_default().push(poly);
        }
    }

    let mut slices = BTreeMap::new();
    for tile in canvas.tiles() {
        let polys = buckets.remove(&tile).unwrap_or_default();
        let tile_mesh = index_polygons(&polys);
        let border = grid.frame.tile_border_absolute(canvas, tile.0, tile.1);
        let uv = tile_mesh
            .positions
            .iter()
            .map(|p| {
                Vec2::new(
                    saturate(remap(p.x, border.x_min, border.x_max, 0.0, 1.0)),
                    saturate(remap(p.y, border.y_min, border.y_max, 0.0, 1.0)),
                )
            })
            .collect();
        slices.insert(tile, MeshSlice { mesh: tile_mesh, uv });
    }
    Ok(slices)
}
