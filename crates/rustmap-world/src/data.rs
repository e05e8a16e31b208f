//! The persisted map model: named byte maps, prefabs and paths.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Land heights, `u16` per sample.
pub const HEIGHT_MAP: &str = "height";
/// Copy of the land heights kept for older readers.
pub const TERRAIN_MAP: &str = "terrain";
/// Water surface heights, `u16` per sample.
pub const WATER_MAP: &str = "water";
/// Ground weights, 8 `u8` channels.
pub const SPLAT_MAP: &str = "splat";
/// Biome weights, 4 `u8` channels.
pub const BIOME_MAP: &str = "biome";
/// Terrain visibility, one `u8` per cell.
pub const ALPHA_MAP: &str = "alpha";
/// Topology membership, one `u32` bitmask per cell.
pub const TOPOLOGY_MAP: &str = "topology";

/// One named byte map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Map name, e.g. [`SPLAT_MAP`].
    pub name: String,
    /// Encoded samples.
    pub data: Vec<u8>,
}

/// A placed prefab. Positions are relative to the map centre.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrefabData {
    /// Grouping label shown in the editor.
    pub category: String,
    /// Prefab asset id.
    pub id: u32,
    /// Position in metres.
    pub position: Vec3,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

/// A road, river or rail spline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub name: String,
    pub spline: bool,
    pub start: bool,
    pub end: bool,
    pub width: f32,
    pub inner_padding: f32,
    pub outer_padding: f32,
    pub inner_fade: f32,
    pub outer_fade: f32,
    pub random_scale: f32,
    pub mesh_offset: f32,
    pub terrain_offset: f32,
    /// Splat texture mask painted along the path.
    pub splat: i32,
    /// Topology mask painted along the path.
    pub topology: i32,
    /// Spline nodes relative to the map centre.
    pub nodes: Vec<Vec3>,
}

/// Everything a map file stores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    /// Terrain extent in metres; `y` is the height scale.
    pub size: Vec3,
    /// Named byte maps.
    pub maps: Vec<MapData>,
    /// Placed prefabs.
    pub prefabs: Vec<PrefabData>,
    /// Splines.
    pub paths: Vec<PathData>,
}

impl WorldData {
    /// Byte map called `name`.
    pub fn map(&self, name: &str) -> Option<&MapData> {
        self.maps.iter().find(|m| m.name == name)
    }

    /// Stores a byte map, replacing any map of the same name.
    pub fn set_map(&mut self, name: &str, data: Vec<u8>) {
        match self.maps.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.data = data,
            None => self.maps.push(MapData {
                name: name.to_string(),
                data,
            }),
        }
    }
}

/// Quarter-turns prefabs and path nodes about the map centre, matching
/// [`rustmap_layers::rotate_heightfield`] on the terrain.
pub fn rotate_objects(prefabs: &mut [PrefabData], paths: &mut [PathData], clockwise: bool) {
    let turn = |p: Vec3| {
        if clockwise {
            Vec3::new(p.z, p.y, -p.x)
        } else {
            Vec3::new(-p.z, p.y, p.x)
        }
    };
    let yaw = if clockwise { 90.0 } else { -90.0 };
    for prefab in prefabs {
        prefab.position = turn(prefab.position);
        prefab.rotation.y = (prefab.rotation.y + yaw).rem_euclid(360.0);
    }
    for path in paths {
        for node in &mut path.nodes {
            *node = turn(*node);
        }
    }
}
