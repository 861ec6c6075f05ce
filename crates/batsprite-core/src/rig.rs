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

//! Fixed-formula camera and sun placement for the render rig.

use crate::camera::Camera;
use crate::ids::{Rotation, Zoom};
use crate::math::{degrees_to_radians, Vec3, FRAC_PI_2};

/// Distance of the camera from the origin, in world units.
pub const CAMERA_RANGE: f32 = 190.0;

/// A world-space placement for a rig object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World-space position.
    pub location: Vec3,
    /// Orientation as XYZ euler angles in radians.
    pub rotation_euler: Vec3,
}

/// Camera pitch per zoom level; zooms 4 and 5 share the last entry.
fn pitch_for(zoom: Zoom) -> f32 {
    const PITCH_DEG: [f32; 4] = [60.0, 55.0, 50.0, 45.0];
    degrees_to_radians(PITCH_DEG[zoom.index().min(3)])
}

/// Camera yaw per rotation.
fn yaw_for(rotation: Rotation) -> f32 {
    const YAW_DEG: [f32; 4] = [-67.5, 22.5, 112.5, 202.5];
    degrees_to_radians(YAW_DEG[rotation.index()])
}

/// Computes the camera placement for a rotation and zoom.
///
/// The camera sits on a sphere of radius [`CAMERA_RANGE`] around the origin
/// and looks straight at it. The extra 90 degrees on the euler Z angle turns
/// the camera's local axes to face inward.
pub fn camera_placement(rotation: Rotation, zoom: Zoom) -> Placement {
    let pitch = pitch_for(zoom);
    let yaw = yaw_for(rotation);
    let location = Vec3::new(
        CAMERA_RANGE * pitch.sin() * yaw.cos(),
        CAMERA_RANGE * pitch.sin() * yaw.sin(),
        CAMERA_RANGE * pitch.cos(),
    );
    Placement {
        location,
        rotation_euler: Vec3::new(pitch, 0.0, yaw + FRAC_PI_2),
    }
}

/// Creates a camera for the given render step, ready for fitting.
pub fn setup_camera(rotation: Rotation, zoom: Zoom) -> Camera {
    let placement = camera_placement(rotation, zoom);
    Camera::new(placement.location, placement.rotation_euler)
}

/// Computes the sun placement for a rotation.
///
/// The orientation reproduces the BAT4Max sun (south direction
/// (-474, -352, 575)), rotated by a quarter turn per compass rotation. The
/// location is only moved up out of the way; a sun light is directional.
pub fn sun_placement(rotation: Rotation) -> Placement {
    let (x, y, z) = (-474.0_f32, -352.0_f32, 575.0_f32);
    let base_pitch = Vec3::new(x, y, 0.0).length().atan2(z);
    let base_yaw = y.atan2(x);
    let yaw = base_yaw + (rotation.index() as f32) * FRAC_PI_2;
    Placement {
        location: Vec3::new(0.0, 0.0, 1000.0),
        rotation_euler: Vec3::new(0.0, base_pitch, yaw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_looks_at_origin() {
        for rotation in Rotation::ALL {
            for zoom in Zoom::ALL {
                let cam = setup_camera(rotation, zoom);
                let toward_origin = (-cam.location).normalize();
                let forward = cam.forward();
                assert_relative_eq!(forward.x, toward_origin.x, epsilon = 1e-4);
                assert_relative_eq!(forward.y, toward_origin.y, epsilon = 1e-4);
                assert_relative_eq!(forward.z, toward_origin.z, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_camera_range() {
        let cam = setup_camera(Rotation::South, Zoom::Five);
        assert_relative_eq!(cam.location.length(), CAMERA_RANGE, epsilon = 1e-3);
    }

    #[test]
    fn test_zooms_four_and_five_share_pitch() {
        let a = camera_placement(Rotation::South, Zoom::Four);
        let b = camera_placement(Rotation::South, Zoom::Five);
        assert_relative_eq!(a.rotation_euler.x, b.rotation_euler.x);
        assert_relative_eq!(a.rotation_euler.x, degrees_to_radians(45.0));
    }

    #[test]
    fn test_sun_rotates_in_quarter_turns() {
        let south = sun_placement(Rotation::South);
        let east = sun_placement(Rotation::East);
        assert_relative_eq!(
            east.rotation_euler.z - south.rotation_euler.z,
            FRAC_PI_2
        );
        // BAT4Max sun pitch is about 45.757 degrees
        assert_relative_eq!(
            south.rotation_euler.y,
            degrees_to_radians(45.757),
            epsilon = 1e-3
        );
    }
}
