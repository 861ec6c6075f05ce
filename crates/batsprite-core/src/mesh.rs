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

//! Polygonal mesh representation.
//!
//! Faces are planar convex polygons of arbitrary vertex count, wound
//! counter-clockwise when viewed from outside. Slicing a quad against a grid
//! line produces pentagons and beyond, so faces are not kept triangulated;
//! exporters fan-triangulate on the way out.

use crate::math::{Aabb, Mat4, Vec3};

/// An indexed polygon mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Faces as lists of vertex indices, counter-clockwise from outside.
    pub faces: Vec<Vec<u32>>,
}

impl Mesh {
    /// Creates a mesh from positions and faces.
    pub fn new(positions: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self { positions, faces }
    }

    /// An axis-aligned box with six outward-facing quads.
    pub fn cuboid(bounds: &Aabb) -> Self {
        let (lo, hi) = (bounds.min, bounds.max);
        let positions = vec![
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ];
        let faces = vec![
            vec![0, 1, 2, 3],
            vec![4, 7, 6, 5],
            vec![0, 4, 5, 1],
            vec![1, 5, 6, 2],
            vec![2, 6, 7, 3],
            vec![4, 0, 3, 7],
        ];
        Self { positions, faces }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh holds no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The positions of one face's corners, in winding order.
    pub fn face_positions(&self, face: usize) -> impl Iterator<Item = Vec3> + '_ {
        self.faces[face].iter().map(|&i| self.positions[i as usize])
    }

    /// Unnormalized face normal via Newell's method.
    ///
    /// Robust for non-triangular faces where a single corner cross product
    /// can degenerate.
    pub fn face_normal(&self, face: usize) -> Vec3 {
        let mut n = Vec3::ZERO;
        let idx = &self.faces[face];
        for k in 0..idx.len() {
            let a = self.positions[idx[k] as usize];
            let b = self.positions[idx[(k + 1) % idx.len()] as usize];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        n
    }

    /// Arithmetic mean of a face's corner positions.
    pub fn face_centroid(&self, face: usize) -> Vec3 {
        let idx = &self.faces[face];
        let sum = idx
            .iter()
            .fold(Vec3::ZERO, |acc, &i| acc + self.positions[i as usize]);
        sum / idx.len() as f32
    }

    /// Area of one face, fan-triangulated from its first corner.
    pub fn face_area(&self, face: usize) -> f32 {
        let idx = &self.faces[face];
        let root = self.positions[idx[0] as usize];
        let mut area = 0.0;
        for k in 1..idx.len() - 1 {
            let b = self.positions[idx[k] as usize];
            let c = self.positions[idx[k + 1] as usize];
            area += (b - root).cross(c - root).length() * 0.5;
        }
        area
    }

    /// Total surface area.
    pub fn total_area(&self) -> f32 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    /// A copy of the mesh with every position transformed as a point.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|&p| transform.transform_point3(p))
                .collect(),
            faces: self.faces.clone(),
        }
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Mesh {
        Mesh::cuboid(&Aabb::from_min_max(-Vec3::ONE, Vec3::ONE))
    }

    #[test]
    fn test_cuboid_shape() {
        let m = unit_box();
        assert_eq!(m.vertex_count(), 8);
        assert_eq!(m.face_count(), 6);
        assert!(m.faces.iter().all(|f| f.len() == 4));
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let m = unit_box();
        for f in 0..m.face_count() {
            let n = m.face_normal(f).normalize();
            let c = m.face_centroid(f);
            // centroid sits on the face, so it points the same way out
            assert!(n.dot(c) > 0.9, "face {f} normal {n:?} centroid {c:?}");
        }
    }

    #[test]
    fn test_cuboid_area() {
        let m = unit_box();
        assert_relative_eq!(m.total_area(), 24.0);
        for f in 0..m.face_count() {
            assert_relative_eq!(m.face_area(f), 4.0);
        }
    }

    #[test]
    fn test_centroid_of_top_face() {
        let m = unit_box();
        // face 1 holds all four z = +1 vertices
        let c = m.face_centroid(1);
        assert_relative_eq!(c.x, 0.0);
        assert_relative_eq!(c.y, 0.0);
        assert_relative_eq!(c.z, 1.0);
    }

    #[test]
    fn test_transformed_moves_positions_only() {
        let m = unit_box();
        let t = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let moved = m.transformed(&t);
        assert_eq!(moved.faces, m.faces);
        assert_relative_eq!(moved.positions[0].x, m.positions[0].x + 5.0);
        assert_relative_eq!(moved.total_area(), 24.0);
    }

    #[test]
    fn test_bounds_round_trip() {
        let aabb = Aabb::from_min_max(Vec3::new(-8.0, -8.0, 0.0), Vec3::new(8.0, 8.0, 12.0));
        let m = Mesh::cuboid(&aabb);
        assert_eq!(m.bounds(), Some(aabb));
    }

    #[test]
    fn test_pentagon_area_and_normal() {
        // unit square with one corner cut, in the z = 0 plane
        let m = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.5, 0.0),
                Vec3::new(0.5, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3, 4]],
        );
        assert_relative_eq!(m.face_area(0), 0.875);
        let n = m.face_normal(0).normalize();
        assert_relative_eq!(n.z, 1.0);
    }
}
