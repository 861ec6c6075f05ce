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

//! Render-step enums and TGI identifier formatting.
//!
//! The instance-id bit layout is parsed by the downstream archiver and the
//! game engine, so it must stay bit-exact.

use serde::{Deserialize, Serialize};

/// The fixed FSH type id used for all sprite output files.
pub const TYPE_ID: &str = "7ab50e44";

/// One of the five discrete zoom levels of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zoom {
    /// Zoom 1, the farthest view.
    One = 0,
    /// Zoom 2.
    Two = 1,
    /// Zoom 3.
    Three = 2,
    /// Zoom 4.
    Four = 3,
    /// Zoom 5, the closest view.
    Five = 4,
}

impl Zoom {
    /// All zoom levels, in render order (farthest first).
    pub const ALL: [Zoom; 5] = [Zoom::One, Zoom::Two, Zoom::Three, Zoom::Four, Zoom::Five];

    /// The zero-based index of the zoom level.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One of the four compass-aligned camera azimuths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// South view.
    South = 0,
    /// East view.
    East = 1,
    /// North view.
    North = 2,
    /// West view.
    West = 3,
}

impl Rotation {
    /// All rotations, in render order.
    pub const ALL: [Rotation; 4] = [
        Rotation::South,
        Rotation::East,
        Rotation::North,
        Rotation::West,
    ];

    /// The zero-based index of the rotation.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The single-letter compass name, as shown in progress labels.
    pub fn compass_name(self) -> &'static str {
        match self {
            Rotation::South => "S",
            Rotation::East => "E",
            Rotation::North => "N",
            Rotation::West => "W",
        }
    }
}

/// The lighting mode of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightMode {
    /// Ordinary daylight render.
    Day,
    /// Night render with the classic Maxis-style ambient glow.
    MaxisNight,
    /// Night render with dark ambient lighting.
    DarkNight,
}

impl NightMode {
    /// Short label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            NightMode::Day => "Day",
            NightMode::MaxisNight => "MN",
            NightMode::DarkNight => "DN",
        }
    }

    /// Whether this mode sets the night flag bit in instance ids.
    #[inline]
    pub fn is_night(self) -> bool {
        !matches!(self, NightMode::Day)
    }
}

/// Packs a render step into the 32-bit instance id consumed by the archiver.
///
/// Layout (low to high): tile bits 0-3 stay at bits 0-3, rotation occupies
/// bits 4-5, zoom bits 6-8, tile bit 4 moves to bit 9 and tile bits 5-9 move
/// to bits 10-14; the day/night flag is bit 16 on top of the `0x30000` base.
/// The non-contiguous tile placement leaves room for 1024 tiles without any
/// field overlapping another, so every (zoom, rotation, tile, mode)
/// combination yields a distinct id.
///
/// # Panics
///
/// Panics if `tile_index` is 1024 or more; a larger index would bleed into
/// the night-flag bit and corrupt the id.
pub fn instance_id(zoom: Zoom, rotation: Rotation, tile_index: u32, night: bool) -> u32 {
    assert!(tile_index < 0x400, "tile index {tile_index} exceeds 1024");
    0x0003_0000
        + if night { 0x1_0000 } else { 0 }
        + ((zoom as u32) << 6)
        + ((rotation as u32) << 4)
        + ((tile_index & !0x1f) << 5)
        + ((tile_index & 0x10) << 5)
        + (tile_index & 0xf)
}

/// Builds the `{type}_{group}_{instance}` file stem for an output artifact.
///
/// With `prefix_0x` every component is rendered as a `0x`-prefixed hex
/// literal, which is the form the archiver's command line accepts.
pub fn tgi_formatter(group_id: &str, iid: u32, prefix_0x: bool) -> String {
    if prefix_0x {
        format!("0x{TYPE_ID}_0x{group_id}_0x{iid:08x}")
    } else {
        format!("{TYPE_ID}_{group_id}_{iid:08x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_instance_id_day_base() {
        // zoom 1, south, tile 0, day: only the base and zoom field are set
        assert_eq!(instance_id(Zoom::One, Rotation::South, 0, false), 0x30000);
        assert_eq!(
            instance_id(Zoom::Five, Rotation::South, 0, false),
            0x30000 + (4 << 6)
        );
    }

    #[test]
    fn test_instance_id_night_flag() {
        let day = instance_id(Zoom::Three, Rotation::West, 7, false);
        let night = instance_id(Zoom::Three, Rotation::West, 7, true);
        assert_eq!(night - day, 0x10000);
    }

    #[test]
    fn test_instance_id_tile_bit_layout() {
        // tile 16 sets bit 9, tile 32 sets bit 10, low nibble stays in place
        let base = instance_id(Zoom::One, Rotation::South, 0, false);
        assert_eq!(instance_id(Zoom::One, Rotation::South, 15, false) - base, 0xf);
        assert_eq!(
            instance_id(Zoom::One, Rotation::South, 16, false) - base,
            0x200
        );
        assert_eq!(
            instance_id(Zoom::One, Rotation::South, 32, false) - base,
            0x400
        );
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let mut seen = HashSet::new();
        for zoom in Zoom::ALL {
            for rotation in Rotation::ALL {
                for tile in 0..=50 {
                    for night in [false, true] {
                        assert!(
                            seen.insert(instance_id(zoom, rotation, tile, night)),
                            "duplicate id for {zoom:?} {rotation:?} tile {tile} night {night}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "exceeds 1024")]
    fn test_instance_id_rejects_oversized_tile_index() {
        instance_id(Zoom::One, Rotation::South, 0x400, false);
    }

    #[test]
    fn test_tgi_formatter() {
        let iid = instance_id(Zoom::Five, Rotation::East, 0, false);
        let stem = tgi_formatter("4a3c9f01", iid, false);
        assert_eq!(stem, format!("7ab50e44_4a3c9f01_{iid:08x}"));
        let stem0x = tgi_formatter("4a3c9f01", iid, true);
        assert_eq!(stem0x, format!("0x7ab50e44_0x4a3c9f01_0x{iid:08x}"));
    }

    #[test]
    fn test_enum_tables() {
        assert_eq!(Zoom::ALL.len(), 5);
        assert_eq!(Rotation::ALL.len(), 4);
        assert_eq!(Rotation::North.compass_name(), "N");
        assert_eq!(NightMode::MaxisNight.label(), "MN");
        assert!(!NightMode::Day.is_night());
        assert!(NightMode::DarkNight.is_night());
    }
}
