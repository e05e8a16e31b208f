//! Conversion between the persisted [`WorldData`] and in-memory layers.

use glam::Vec3;
use rustmap_layers::{BiomeTexture, GroundTexture, Heightfield, LayerKind, MiscTexture, SplatLayers};
use tracing::{debug, info};

use crate::data::{
    ALPHA_MAP, BIOME_MAP, HEIGHT_MAP, PathData, PrefabData, SPLAT_MAP, TERRAIN_MAP, TOPOLOGY_MAP,
    WATER_MAP, WorldData,
};
use crate::encoding::{
    decode_alpha, decode_heights, decode_splat, decode_topology, encode_alpha, encode_heights,
    encode_splat, encode_topology,
};
use crate::error::WorldError;

/// Vertical extent, in metres, of a newly created map.
pub const DEFAULT_HEIGHT_SCALE: f32 = 1000.0;

/// Normalised land and water height of a newly created map.
pub const EMPTY_MAP_HEIGHT: f32 = 0.5;

/// A decoded map, ready to load into the editor.
#[derive(Clone, Debug, PartialEq)]
pub struct MapInfo {
    /// Terrain extent in metres; `y` is the height scale.
    pub size: Vec3,
    /// Normalised land heights.
    pub land: Heightfield,
    /// Normalised water surface heights.
    pub water: Heightfield,
    /// Every splat raster.
    pub layers: SplatLayers,
    /// Placed prefabs.
    pub prefabs: Vec<PrefabData>,
    /// Splines.
    pub paths: Vec<PathData>,
}

impl MapInfo {
    /// Heightmap samples per side.
    pub fn resolution(&self) -> usize {
        self.land.rows()
    }

    /// Splat cells per side.
    pub fn splat_resolution(&self) -> usize {
        self.layers.resolution().0
    }
}

fn required<'a>(world: &'a WorldData, name: &str) -> Result<&'a [u8], WorldError> {
    world
        .map(name)
        .map(|m| m.data.as_slice())
        .ok_or_else(|| WorldError::MissingMap(name.to_string()))
}

fn check_resolution(name: &str, expected: usize, actual: usize) -> Result<(), WorldError> {
    if expected == actual {
        Ok(())
    } else {
        Err(WorldError::ResolutionMismatch {
            name: name.to_string(),
            expected,
            actual,
        })
    }
}

/// Decodes every map of a world.
///
/// # Errors
///
/// [`WorldError::MissingMap`] if a required map is absent,
/// [`WorldError::MalformedMap`] if one is not square and
/// [`WorldError::ResolutionMismatch`] if the heightmaps or splat maps disagree
/// among themselves.
pub fn world_to_terrain(world: &WorldData) -> Result<MapInfo, WorldError> {
    let land = decode_heights(HEIGHT_MAP, required(world, HEIGHT_MAP)?)?;
    let water = match world.map(WATER_MAP) {
        Some(map) => decode_heights(WATER_MAP, &map.data)?,
        None => {
            debug!("Map has no water heights, using a flat surface");
            Heightfield::new(land.rows(), land.cols(), 0.0)
        }
    };
    check_resolution(WATER_MAP, land.rows(), water.rows())?;

    let ground = decode_splat(
        SPLAT_MAP,
        required(world, SPLAT_MAP)?,
        LayerKind::GROUND_TEXTURES,
    )?;
    let splat_res = ground.rows();
    let biome = decode_splat(
        BIOME_MAP,
        required(world, BIOME_MAP)?,
        LayerKind::BIOME_TEXTURES,
    )?;
    check_resolution(BIOME_MAP, splat_res, biome.rows())?;
    let alpha = decode_alpha(ALPHA_MAP, required(world, ALPHA_MAP)?)?;
    check_resolution(ALPHA_MAP, splat_res, alpha.rows())?;
    let topology = decode_topology(TOPOLOGY_MAP, required(world, TOPOLOGY_MAP)?)?;
    check_resolution(TOPOLOGY_MAP, splat_res, topology[0].rows())?;

    let layers = SplatLayers {
        ground,
        biome,
        alpha,
        topology,
    };
    layers.validate()?;

    info!(
        "Decoded map: {}m, heightmap {}, splat {}, {} prefabs, {} paths",
        world.size.x,
        land.rows(),
        splat_res,
        world.prefabs.len(),
        world.paths.len()
    );
    Ok(MapInfo {
        size: world.size,
        land,
        water,
        layers,
        prefabs: world.prefabs.clone(),
        paths: world.paths.clone(),
    })
}

/// Encodes a map for saving. Splat weights are quantised to bytes and
/// two-channel layers are saved as active wherever channel 0 is at least 0.5.
pub fn terrain_to_world(info: &MapInfo) -> Result<WorldData, WorldError> {
    let mut world = WorldData {
        size: info.size,
        maps: Vec::new(),
        prefabs: info.prefabs.clone(),
        paths: info.paths.clone(),
    };
    let heights = encode_heights(&info.land);
    world.set_map(TERRAIN_MAP, heights.clone());
    world.set_map(HEIGHT_MAP, heights);
    world.set_map(WATER_MAP, encode_heights(&info.water));
    world.set_map(SPLAT_MAP, encode_splat(&info.layers.ground));
    world.set_map(BIOME_MAP, encode_splat(&info.layers.biome));
    world.set_map(ALPHA_MAP, encode_alpha(&info.layers.alpha));
    world.set_map(TOPOLOGY_MAP, encode_topology(&info.layers.topology)?);
    Ok(world)
}

/// Heightmap and splat resolutions for a map `size` metres across.
///
/// The heightmap has `next_power_of_two(size / 2) + 1` samples per side and
/// the splat maps one fewer cell.
pub fn resolutions_for_size(size: u32) -> (usize, usize) {
    let splat = ((size / 2).max(1) as usize).next_power_of_two();
    (splat + 1, splat)
}

/// A flat map `size` metres across: land and water at half height, grass,
/// temperate biome, fully visible, no topology.
pub fn empty_map(size: u32, height_scale: f32) -> Result<MapInfo, WorldError> {
    let (height_res, splat_res) = resolutions_for_size(size);
    let layers = SplatLayers::uniform(
        splat_res,
        GroundTexture::Grass.index(),
        BiomeTexture::Temperate.index(),
        MiscTexture::Active.index(),
    )?;
    info!("Created empty {size}m map, heightmap {height_res}, splat {splat_res}");
    Ok(MapInfo {
        size: Vec3::new(size as f32, height_scale, size as f32),
        land: Heightfield::new(height_res, height_res, EMPTY_MAP_HEIGHT),
        water: Heightfield::new(height_res, height_res, EMPTY_MAP_HEIGHT),
        layers,
        prefabs: Vec::new(),
        paths: Vec::new(),
    })
}

/// [`empty_map`] encoded as a [`WorldData`] with the default height scale.
pub fn empty_world(size: u32) -> Result<WorldData, WorldError> {
    terrain_to_world(&empty_map(size, DEFAULT_HEIGHT_SCALE)?)
}
