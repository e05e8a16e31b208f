//! The editing session over one loaded map.

use std::path::Path;

use glam::Vec3;
use rustmap_layers::heightmap_ops::{self, EdgeSides};
use rustmap_layers::paint::{self, PaintRange};
use rustmap_layers::{
    AreaSelector, BulkOutcome, ConditionContext, Conditions, Heightfield, LayerError, LayerKind,
    LayerStore, ProgressReporter, RasterLayer, Rotation, ScaledSampler, TerrainDisplay,
    TerrainQuery, Topology, for_each_topology, paint_conditional, rotate_heightfield,
    rotate_raster,
};
use rustmap_world::{
    MapCodec, MapInfo, PathData, PrefabData, empty_map, rotate_objects, terrain_to_world,
    world_to_terrain,
};
use tracing::{info, warn};

use crate::error::EditorError;
use crate::settings::SessionSettings;

const LOAD_TITLE: &str = "Loading map";
const SAVE_TITLE: &str = "Saving map";

/// Heightfields and objects of the loaded map. Splat rasters live in the
/// [`LayerStore`].
struct Terrain {
    size: Vec3,
    land: Heightfield,
    water: Heightfield,
    prefabs: Vec<PrefabData>,
    paths: Vec<PathData>,
}

/// One map open for editing.
///
/// Layer operations replace the target raster in the store and re-push it to
/// the display when it is the layer on show. Heightmap operations take metres
/// and re-push both heightfields. Nothing changes when an operation fails.
pub struct MapSession {
    store: LayerStore,
    terrain: Option<Terrain>,
    display: Box<dyn TerrainDisplay>,
    progress: Box<dyn ProgressReporter>,
    settings: SessionSettings,
}

impl MapSession {
    /// An empty session; nothing is editable until a map is loaded or created.
    pub fn new(
        display: Box<dyn TerrainDisplay>,
        progress: Box<dyn ProgressReporter>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store: LayerStore::new(),
            terrain: None,
            display,
            progress,
            settings,
        }
    }

    /// Settings the session was created with.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Splat layers of the open map.
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// `true` once a map has been loaded or created.
    pub fn is_loaded(&self) -> bool {
        self.terrain.is_some()
    }

    fn terrain(&self) -> Result<&Terrain, EditorError> {
        self.terrain.as_ref().ok_or(EditorError::Layer(LayerError::NotLoaded))
    }

    fn terrain_mut(&mut self) -> Result<&mut Terrain, EditorError> {
        self.terrain.as_mut().ok_or(EditorError::Layer(LayerError::NotLoaded))
    }

    /// Terrain extent in metres; `y` is the height scale.
    pub fn size(&self) -> Result<Vec3, EditorError> {
        Ok(self.terrain()?.size)
    }

    /// Normalised land heights.
    pub fn land(&self) -> Result<&Heightfield, EditorError> {
        Ok(&self.terrain()?.land)
    }

    /// Normalised water heights.
    pub fn water(&self) -> Result<&Heightfield, EditorError> {
        Ok(&self.terrain()?.water)
    }

    /// Placed prefabs.
    pub fn prefabs(&self) -> Result<&[PrefabData], EditorError> {
        Ok(&self.terrain()?.prefabs)
    }

    /// Road, river and power line paths.
    pub fn paths(&self) -> Result<&[PathData], EditorError> {
        Ok(&self.terrain()?.paths)
    }

    /// Raster of `kind`.
    pub fn layer(&self, kind: LayerKind) -> Result<&RasterLayer, EditorError> {
        Ok(self.store.get(kind)?)
    }

    /// Land height in metres at normalised coordinates.
    pub fn height_at(&self, x_norm: f32, z_norm: f32) -> Result<f32, EditorError> {
        let terrain = self.terrain()?;
        Ok(TerrainQuery::new(&terrain.land, terrain.size).height_norm(x_norm, z_norm))
    }

    /// Land steepness in degrees at normalised coordinates.
    pub fn slope_at(&self, x_norm: f32, z_norm: f32) -> Result<f32, EditorError> {
        let terrain = self.terrain()?;
        Ok(TerrainQuery::new(&terrain.land, terrain.size).steepness_norm(x_norm, z_norm))
    }

    // -----------------------------------------------------------------------
    // Map lifecycle
    // -----------------------------------------------------------------------

    /// Reads and opens the map at `path`, replacing any open map.
    pub fn load(&mut self, path: &Path, codec: &dyn MapCodec) -> Result<(), EditorError> {
        self.progress.report(LOAD_TITLE, "Reading file", 0.0);
        let result = codec.load(path).and_then(|world| {
            self.progress.report(LOAD_TITLE, "Decoding layers", 0.3);
            world_to_terrain(&world)
        });
        let info = match result {
            Ok(info) => info,
            Err(e) => {
                self.progress.clear();
                return Err(e.into());
            }
        };
        self.progress.report(LOAD_TITLE, "Loading layers", 0.8);
        let loaded = self.load_map_info(info);
        self.progress.clear();
        loaded?;
        info!("Opened {}", path.display());
        Ok(())
    }

    /// Opens an already decoded map, replacing any open map.
    pub fn load_map_info(&mut self, info: MapInfo) -> Result<(), EditorError> {
        let MapInfo {
            size,
            land,
            water,
            layers,
            prefabs,
            paths,
        } = info;
        self.store.load(layers)?;
        self.display.push_heightmaps(&land, &water);
        self.terrain = Some(Terrain {
            size,
            land,
            water,
            prefabs,
            paths,
        });
        self.store.refresh_display(self.display.as_mut())?;
        info!(
            "Map loaded: {}m, splat {:?}",
            size.x,
            self.store.resolution()?
        );
        Ok(())
    }

    /// Snapshot of the open map, including edits still held by the display.
    pub fn to_map_info(&mut self) -> Result<MapInfo, EditorError> {
        self.store.commit_display_edits(self.display.as_mut());
        let terrain = self.terrain()?;
        Ok(MapInfo {
            size: terrain.size,
            land: terrain.land.clone(),
            water: terrain.water.clone(),
            layers: self.store.layers()?.clone(),
            prefabs: terrain.prefabs.clone(),
            paths: terrain.paths.clone(),
        })
    }

    /// Writes the open map to `path`.
    pub fn save(&mut self, path: &Path, codec: &dyn MapCodec) -> Result<(), EditorError> {
        self.progress.report(SAVE_TITLE, "Collecting layers", 0.4);
        let result = self
            .to_map_info()
            .and_then(|info| terrain_to_world(&info).map_err(EditorError::from))
            .and_then(|world| {
                self.progress.report(SAVE_TITLE, "Writing file", 0.8);
                codec.save(path, &world).map_err(EditorError::from)
            });
        self.progress.clear();
        result?;
        info!("Saved {}", path.display());
        Ok(())
    }

    /// Opens a flat map `size` metres across, painted with the configured
    /// textures and raised to the configured minimum height.
    pub fn create_new_map(&mut self, size: u32) -> Result<(), EditorError> {
        let info = empty_map(size, self.settings.height_scale)?;
        self.load_map_info(info)?;
        let SessionSettings {
            alpha_texture,
            biome_texture,
            ground_texture,
            new_map_min_height,
            ..
        } = self.settings;
        self.paint_layer(LayerKind::Alpha, alpha_texture)?;
        self.paint_layer(LayerKind::Biome, biome_texture)?;
        self.paint_layer(LayerKind::Ground, ground_texture)?;
        self.set_minimum_height(new_map_min_height)?;
        info!("Created new {size}m map");
        Ok(())
    }

    /// Puts `kind` on display.
    pub fn activate_layer(&mut self, kind: LayerKind) -> Result<(), EditorError> {
        Ok(self.store.activate(kind, self.display.as_mut())?)
    }

    // -----------------------------------------------------------------------
    // Heightmaps
    // -----------------------------------------------------------------------

    fn metres_to_normalised(&self, metres: f32) -> Result<f32, EditorError> {
        let scale = self.terrain()?.size.y;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EditorError::InvalidHeightScale(scale));
        }
        Ok(metres / scale)
    }

    fn push_heightmaps(&mut self) {
        if let Some(terrain) = &self.terrain {
            self.display.push_heightmaps(&terrain.land, &terrain.water);
        }
    }

    fn edit_land(&mut self, f: impl FnOnce(&Heightfield) -> Heightfield) -> Result<(), EditorError> {
        let terrain = self.terrain_mut()?;
        terrain.land = f(&terrain.land);
        self.push_heightmaps();
        Ok(())
    }

    /// Raises or lowers the land, and the water too when `include_water` is
    /// set, by `metres`. With `check` set, an offset that would push any sample
    /// out of range is rejected as a whole; otherwise samples clamp.
    pub fn offset_heightmap(
        &mut self,
        metres: f32,
        include_water: bool,
        check: bool,
    ) -> Result<(), EditorError> {
        let delta = self.metres_to_normalised(metres)?;
        let terrain = self.terrain_mut()?;
        let result = if include_water {
            heightmap_ops::offset_all(&[&terrain.land, &terrain.water], delta, check)
        } else {
            heightmap_ops::offset(&terrain.land, delta, check).map(|land| vec![land])
        };
        let mut fields = match result {
            Ok(fields) => fields.into_iter(),
            Err(e) => {
                warn!("Offset of {metres}m rejected: {e}");
                return Err(e.into());
            }
        };
        if let Some(land) = fields.next() {
            terrain.land = land;
        }
        if let Some(water) = fields.next() {
            terrain.water = water;
        }
        self.push_heightmaps();
        Ok(())
    }

    /// Remaps land heights onto normalised `[low, high]`.
    pub fn normalise_heightmap(&mut self, low: f32, high: f32) -> Result<(), EditorError> {
        self.edit_land(|land| heightmap_ops::normalize(land, low, high))
    }

    /// Raises land below `metres` up to it.
    pub fn set_minimum_height(&mut self, metres: f32) -> Result<(), EditorError> {
        let threshold = self.metres_to_normalised(metres)?;
        self.edit_land(|land| heightmap_ops::set_minimum(land, threshold))
    }

    /// Lowers land above `metres` down to it.
    pub fn set_maximum_height(&mut self, metres: f32) -> Result<(), EditorError> {
        let threshold = self.metres_to_normalised(metres)?;
        self.edit_land(|land| heightmap_ops::set_maximum(land, threshold))
    }

    /// Sets the selected land borders to `metres`.
    pub fn set_edge_height(&mut self, metres: f32, sides: EdgeSides) -> Result<(), EditorError> {
        let value = self.metres_to_normalised(metres)?;
        self.edit_land(|land| heightmap_ops::set_edge_pixels(land, value, sides))
    }

    /// Raises water below `metres` up to it.
    pub fn raise_water_level(&mut self, metres: f32) -> Result<(), EditorError> {
        let minimum = self.metres_to_normalised(metres)?;
        let terrain = self.terrain_mut()?;
        terrain.water = heightmap_ops::raise_water_level(&terrain.water, minimum);
        self.push_heightmaps();
        Ok(())
    }

    /// Flips the land upside down.
    pub fn invert_heightmap(&mut self) -> Result<(), EditorError> {
        self.edit_land(heightmap_ops::invert)
    }

    /// Quarter-turns land and water together.
    pub fn rotate_heightmaps(&mut self, rotation: Rotation) -> Result<(), EditorError> {
        let terrain = self.terrain_mut()?;
        let land = rotate_heightfield(&terrain.land, rotation)?;
        let water = rotate_heightfield(&terrain.water, rotation)?;
        terrain.land = land;
        terrain.water = water;
        self.push_heightmaps();
        Ok(())
    }

    /// Quarter-turns prefabs and paths about the map centre.
    pub fn rotate_objects(&mut self, rotation: Rotation) -> Result<(), EditorError> {
        let terrain = self.terrain_mut()?;
        rotate_objects(
            &mut terrain.prefabs,
            &mut terrain.paths,
            rotation == Rotation::Clockwise,
        );
        Ok(())
    }

    /// Quarter-turns the whole map: every layer, both heightmaps and all
    /// objects.
    ///
    /// Topologies turn first. If that step is cancelled the layers already
    /// turned are turned back and the map is left as it was.
    pub fn rotate_map(&mut self, rotation: Rotation) -> Result<BulkOutcome, EditorError> {
        let outcome = self.rotate_topologies(Topology::ALL, rotation)?;
        if outcome.cancelled {
            self.restore_topologies(&Topology::ALL[..outcome.processed], rotation)?;
            warn!("Map rotation cancelled, {} topology layers turned back", outcome.processed);
            return Ok(outcome);
        }
        for kind in [LayerKind::Ground, LayerKind::Biome, LayerKind::Alpha] {
            self.rotate_layer(kind, rotation)?;
        }
        self.rotate_heightmaps(rotation)?;
        self.rotate_objects(rotation)?;
        Ok(outcome)
    }

    fn restore_topologies(
        &mut self,
        turned: &[Topology],
        rotation: Rotation,
    ) -> Result<(), EditorError> {
        for topology in turned {
            let kind = LayerKind::Topology(*topology);
            let restored = rotate_raster(self.store.get(kind)?, rotation.inverse())?;
            self.store.set(kind, restored)?;
        }
        if let LayerKind::Topology(active) = self.store.active()
            && turned.contains(&active)
        {
            self.store.refresh_display(self.display.as_mut())?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Layers
    // -----------------------------------------------------------------------

    /// Commits brush edits held by the display to the active layer.
    fn pull_display_edits(&mut self) {
        self.store.commit_display_edits(self.display.as_mut());
    }

    fn commit(&mut self, kind: LayerKind, raster: RasterLayer) -> Result<(), EditorError> {
        self.store.set(kind, raster)?;
        if self.store.is_active(kind) {
            self.store.refresh_display(self.display.as_mut())?;
        }
        Ok(())
    }

    fn edit_layer(
        &mut self,
        kind: LayerKind,
        f: impl FnOnce(&RasterLayer) -> Result<RasterLayer, LayerError>,
    ) -> Result<(), EditorError> {
        self.pull_display_edits();
        let edited = f(self.store.get(kind)?)?;
        self.commit(kind, edited)
    }

    /// Paints `texture` over the whole of `kind`.
    pub fn paint_layer(&mut self, kind: LayerKind, texture: usize) -> Result<(), EditorError> {
        self.edit_layer(kind, |raster| paint::paint_layer(raster, texture))
    }

    /// Resets `kind` to its inactive state.
    pub fn clear_layer(&mut self, kind: LayerKind) -> Result<(), EditorError> {
        self.edit_layer(kind, |raster| paint::clear_layer(raster, kind.is_alpha()))
    }

    /// Swaps active and inactive cells of a two-texture layer.
    pub fn invert_layer(&mut self, kind: LayerKind) -> Result<(), EditorError> {
        self.edit_layer(kind, paint::invert_layer)
    }

    /// Paints `texture` inside `area` of `kind`.
    pub fn paint_area(
        &mut self,
        kind: LayerKind,
        area: AreaSelector,
        texture: usize,
    ) -> Result<(), EditorError> {
        self.edit_layer(kind, |raster| paint::paint_area(raster, area, texture))
    }

    /// Paints `texture` where the land lies in `range`, in metres.
    pub fn paint_by_height(
        &mut self,
        kind: LayerKind,
        range: PaintRange,
        texture: usize,
    ) -> Result<(), EditorError> {
        self.pull_display_edits();
        let terrain = self.terrain()?;
        let query = TerrainQuery::new(&terrain.land, terrain.size);
        let edited = paint::paint_by_height(self.store.get(kind)?, &query.heights(), range, texture)?;
        self.commit(kind, edited)
    }

    /// Paints `texture` where the land steepness lies in `range`, in degrees.
    pub fn paint_by_slope(
        &mut self,
        kind: LayerKind,
        range: PaintRange,
        texture: usize,
    ) -> Result<(), EditorError> {
        self.pull_display_edits();
        let terrain = self.terrain()?;
        let query = TerrainQuery::new(&terrain.land, terrain.size);
        let edited = paint::paint_by_slope(self.store.get(kind)?, &query.slopes(), range, texture)?;
        self.commit(kind, edited)
    }

    /// Paints `texture` where water stands above the configured river level.
    pub fn paint_river(
        &mut self,
        kind: LayerKind,
        above_terrain_only: bool,
        texture: usize,
    ) -> Result<(), EditorError> {
        self.pull_display_edits();
        let terrain = self.terrain()?;
        let water = ScaledSampler::new(&terrain.water, terrain.size.y);
        let land = ScaledSampler::new(&terrain.land, terrain.size.y);
        let edited = paint::paint_river(
            self.store.get(kind)?,
            &water,
            &land,
            self.settings.river_water_level,
            above_terrain_only,
            texture,
        )?;
        self.commit(kind, edited)
    }

    /// Paints `texture` on `kind` wherever every enabled condition holds.
    pub fn paint_conditional(
        &mut self,
        kind: LayerKind,
        texture: usize,
        conditions: &Conditions,
    ) -> Result<(), EditorError> {
        self.pull_display_edits();
        let terrain = self.terrain()?;
        let query = TerrainQuery::new(&terrain.land, terrain.size);
        let context = ConditionContext::prepare(&self.store, &query, conditions)?;
        let edited = paint_conditional(self.store.get(kind)?, texture, &context)?;
        self.commit(kind, edited)
    }

    /// Paints `dst_texture` on `dst` wherever `src` carries `src_texture`.
    pub fn copy_texture(
        &mut self,
        src: LayerKind,
        src_texture: usize,
        dst: LayerKind,
        dst_texture: usize,
    ) -> Result<(), EditorError> {
        self.pull_display_edits();
        let edited = paint::copy_texture(
            self.store.get(src)?,
            self.store.get(dst)?,
            src_texture,
            dst_texture,
        )?;
        self.commit(dst, edited)
    }

    /// Quarter-turns one layer.
    pub fn rotate_layer(&mut self, kind: LayerKind, rotation: Rotation) -> Result<(), EditorError> {
        self.edit_layer(kind, |raster| rotate_raster(raster, rotation))
    }

    // -----------------------------------------------------------------------
    // Topology bulk operations
    // -----------------------------------------------------------------------

    fn bulk_topology<F>(
        &mut self,
        selection: &[Topology],
        title: &str,
        mut op: F,
    ) -> Result<BulkOutcome, EditorError>
    where
        F: FnMut(&RasterLayer) -> Result<RasterLayer, LayerError>,
    {
        if let LayerKind::Topology(active) = self.store.active()
            && selection.contains(&active)
        {
            self.store.commit_display_edits(self.display.as_mut());
        }
        let store = &mut self.store;
        let outcome = for_each_topology(selection, title, self.progress.as_mut(), |topology| {
            let kind = LayerKind::Topology(topology);
            let edited = op(store.get(kind)?)?;
            store.set(kind, edited)
        })?;
        if let LayerKind::Topology(active) = self.store.active()
            && selection.contains(&active)
        {
            self.store.refresh_display(self.display.as_mut())?;
        }
        Ok(outcome)
    }

    /// Quarter-turns each selected topology layer.
    pub fn rotate_topologies(
        &mut self,
        selection: &[Topology],
        rotation: Rotation,
    ) -> Result<BulkOutcome, EditorError> {
        self.bulk_topology(selection, "Rotating topologies", |raster| {
            rotate_raster(raster, rotation)
        })
    }

    /// Paints `texture` over each selected topology layer.
    pub fn paint_topologies(
        &mut self,
        selection: &[Topology],
        texture: usize,
    ) -> Result<BulkOutcome, EditorError> {
        self.bulk_topology(selection, "Painting topologies", |raster| {
            paint::paint_layer(raster, texture)
        })
    }

    /// Resets each selected topology layer to inactive.
    pub fn clear_topologies(&mut self, selection: &[Topology]) -> Result<BulkOutcome, EditorError> {
        self.bulk_topology(selection, "Clearing topologies", |raster| {
            paint::clear_layer(raster, false)
        })
    }

    /// Inverts each selected topology layer.
    pub fn invert_topologies(&mut self, selection: &[Topology]) -> Result<BulkOutcome, EditorError> {
        self.bulk_topology(selection, "Inverting topologies", paint::invert_layer)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
