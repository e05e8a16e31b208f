//! The in-memory layers of the loaded map and which one is on display.

use tracing::{debug, info};

use crate::catalog::{LayerKind, MiscTexture, TOPOLOGY_COUNT, Topology};
use crate::display::TerrainDisplay;
use crate::error::LayerError;
use crate::raster::{RasterLayer, Shape};

/// Every splat raster of one map.
///
/// All rasters cover the same `rows x cols` cells; each kind has its fixed
/// channel count and `topology` holds one raster per catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatLayers {
    /// Ground textures.
    pub ground: RasterLayer,
    /// Biome textures.
    pub biome: RasterLayer,
    /// Terrain visibility.
    pub alpha: RasterLayer,
    /// One raster per [`Topology`], in catalog order.
    pub topology: Vec<RasterLayer>,
}

impl SplatLayers {
    /// Layers of a `resolution x resolution` map painted uniformly, with every
    /// topology inactive.
    pub fn uniform(
        resolution: usize,
        ground: usize,
        biome: usize,
        alpha: usize,
    ) -> Result<Self, LayerError> {
        let topology = RasterLayer::for_kind(
            LayerKind::Topology(Topology::Field),
            resolution,
            resolution,
            MiscTexture::Inactive.index(),
        )?;
        Ok(Self {
            ground: RasterLayer::for_kind(LayerKind::Ground, resolution, resolution, ground)?,
            biome: RasterLayer::for_kind(LayerKind::Biome, resolution, resolution, biome)?,
            alpha: RasterLayer::for_kind(LayerKind::Alpha, resolution, resolution, alpha)?,
            topology: vec![topology; TOPOLOGY_COUNT],
        })
    }

    /// Rows and columns shared by every raster.
    pub fn resolution(&self) -> (usize, usize) {
        (self.ground.rows(), self.ground.cols())
    }

    /// Checks every raster has its kind's channel count and the shared cell grid.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.topology.len() != TOPOLOGY_COUNT {
            return Err(LayerError::InvalidLayerKind(format!(
                "expected {TOPOLOGY_COUNT} topology layers, got {}",
                self.topology.len()
            )));
        }
        let (rows, cols) = self.resolution();
        for (kind, raster) in self.iter() {
            raster.check_shape(Shape::new(rows, cols, kind.texture_count()))?;
        }
        Ok(())
    }

    /// Every raster with its kind.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &RasterLayer)> {
        [
            (LayerKind::Ground, &self.ground),
            (LayerKind::Biome, &self.biome),
            (LayerKind::Alpha, &self.alpha),
        ]
        .into_iter()
        .chain(
            Topology::ALL
                .iter()
                .zip(&self.topology)
                .map(|(t, raster)| (LayerKind::Topology(*t), raster)),
        )
    }

    /// Raster of `kind`.
    pub fn get(&self, kind: LayerKind) -> Result<&RasterLayer, LayerError> {
        match kind {
            LayerKind::Ground => Ok(&self.ground),
            LayerKind::Biome => Ok(&self.biome),
            LayerKind::Alpha => Ok(&self.alpha),
            LayerKind::Topology(t) => self
                .topology
                .get(t.index())
                .ok_or_else(|| LayerError::InvalidLayerKind(kind.to_string())),
        }
    }

    fn slot_mut(&mut self, kind: LayerKind) -> Result<&mut RasterLayer, LayerError> {
        match kind {
            LayerKind::Ground => Ok(&mut self.ground),
            LayerKind::Biome => Ok(&mut self.biome),
            LayerKind::Alpha => Ok(&mut self.alpha),
            LayerKind::Topology(t) => self
                .topology
                .get_mut(t.index())
                .ok_or_else(|| LayerError::InvalidLayerKind(kind.to_string())),
        }
    }
}

/// Owns the loaded map's rasters and tracks the active layer.
#[derive(Debug, Default)]
pub struct LayerStore {
    layers: Option<SplatLayers>,
    active: Option<LayerKind>,
}

impl LayerStore {
    /// An empty store with no map loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every raster with a newly loaded map's.
    ///
    /// The active layer is kept; callers refresh the display afterwards.
    pub fn load(&mut self, layers: SplatLayers) -> Result<(), LayerError> {
        layers.validate()?;
        let (rows, cols) = layers.resolution();
        info!("Loaded splat layers at {rows}x{cols}");
        self.layers = Some(layers);
        Ok(())
    }

    /// `true` once a map is loaded.
    pub fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    /// All rasters of the loaded map.
    pub fn layers(&self) -> Result<&SplatLayers, LayerError> {
        self.layers.as_ref().ok_or(LayerError::NotLoaded)
    }

    /// Rows and columns of the loaded map's rasters.
    pub fn resolution(&self) -> Result<(usize, usize), LayerError> {
        self.layers().map(SplatLayers::resolution)
    }

    /// Fixed texture count of `kind`.
    pub fn texture_count(kind: LayerKind) -> usize {
        kind.texture_count()
    }

    /// Raster of `kind`.
    pub fn get(&self, kind: LayerKind) -> Result<&RasterLayer, LayerError> {
        self.layers()?.get(kind)
    }

    /// Raster of the topology at catalog `index`.
    pub fn get_topology(&self, index: usize) -> Result<&RasterLayer, LayerError> {
        self.get(LayerKind::topology_index(index)?)
    }

    /// Weight of `texture` at column `x`, row `z` of `kind`.
    pub fn texture(
        &self,
        kind: LayerKind,
        texture: usize,
        x: usize,
        z: usize,
    ) -> Result<f32, LayerError> {
        let raster = self.get(kind)?;
        raster.check_texture(texture)?;
        if z >= raster.rows() || x >= raster.cols() {
            return Err(LayerError::DimensionMismatch {
                expected: Shape::new(raster.rows(), raster.cols(), raster.channels()),
                actual: Shape::new(z + 1, x + 1, raster.channels()),
            });
        }
        Ok(raster.get(z, x, texture))
    }

    /// Replaces the raster of `kind`.
    ///
    /// # Errors
    ///
    /// [`LayerError::DimensionMismatch`] unless `raster` matches the loaded
    /// map's resolution and `kind`'s texture count. Nothing changes on error.
    pub fn set(&mut self, kind: LayerKind, raster: RasterLayer) -> Result<(), LayerError> {
        let layers = self.layers.as_mut().ok_or(LayerError::NotLoaded)?;
        let (rows, cols) = layers.resolution();
        raster.check_shape(Shape::new(rows, cols, kind.texture_count()))?;
        *layers.slot_mut(kind)? = raster;
        Ok(())
    }

    /// The layer on display, defaulting to ground.
    pub fn active(&self) -> LayerKind {
        self.active.unwrap_or(LayerKind::Ground)
    }

    /// `true` if `kind` is on display.
    pub fn is_active(&self, kind: LayerKind) -> bool {
        self.active() == kind
    }

    /// Puts `kind` on display.
    ///
    /// Edits the display holds for the outgoing layer are committed first,
    /// then the new raster and its texture bindings are pushed.
    pub fn activate(
        &mut self,
        kind: LayerKind,
        display: &mut dyn TerrainDisplay,
    ) -> Result<(), LayerError> {
        if !self.is_loaded() {
            self.active = Some(kind);
            debug!("Active layer set to {kind} with no map loaded");
            return Ok(());
        }
        self.commit_display_edits(display);
        self.active = Some(kind);
        self.push(display)?;
        info!("Active layer: {kind}");
        Ok(())
    }

    /// Re-pushes the active raster, e.g. after it was replaced.
    pub fn refresh_display(&self, display: &mut dyn TerrainDisplay) -> Result<(), LayerError> {
        self.push(display)
    }

    fn push(&self, display: &mut dyn TerrainDisplay) -> Result<(), LayerError> {
        let kind = self.active();
        let raster = self.get(kind)?;
        display.push_texture_bindings(kind, &kind.texture_names());
        display.push_alphamaps(raster);
        Ok(())
    }

    /// Pulls brush edits held by the display back into the active raster.
    pub fn commit_display_edits(&mut self, display: &mut dyn TerrainDisplay) {
        let Some(edited) = display.fetch_alphamaps() else {
            return;
        };
        let outgoing = self.active();
        match self.set(outgoing, edited) {
            Ok(()) => debug!("Committed display edits to {outgoing}"),
            Err(e) => debug!("Discarded display edits for {outgoing}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GroundTexture;
    use crate::heightfield::Heightfield;

    #[derive(Default)]
    struct Recorder {
        bindings: Vec<(LayerKind, Vec<String>)>,
        pushed: Vec<RasterLayer>,
        heights: usize,
        pending: Option<RasterLayer>,
    }

    impl TerrainDisplay for Recorder {
        fn push_alphamaps(&mut self, raster: &RasterLayer) {
            self.pushed.push(raster.clone());
        }

        fn push_texture_bindings(&mut self, kind: LayerKind, names: &[&str]) {
            self.bindings
                .push((kind, names.iter().map(|n| n.to_string()).collect()));
        }

        fn push_heightmaps(&mut self, _land: &Heightfield, _water: &Heightfield) {
            self.heights += 1;
        }

        fn fetch_alphamaps(&mut self) -> Option<RasterLayer> {
            self.pending.take()
        }
    }

    fn loaded(resolution: usize) -> LayerStore {
        let mut store = LayerStore::new();
        store
            .load(SplatLayers::uniform(resolution, GroundTexture::Grass.index(), 1, 0).unwrap())
            .unwrap();
        store
    }

    #[test]
    fn test_get_before_load() {
        let store = LayerStore::new();
        assert_eq!(store.get(LayerKind::Ground), Err(LayerError::NotLoaded));
        assert_eq!(store.resolution(), Err(LayerError::NotLoaded));
    }

    #[test]
    fn test_get_topology_index_out_of_range() {
        let store = loaded(2);
        assert!(store.get_topology(30).is_ok());
        assert!(matches!(
            store.get_topology(31),
            Err(LayerError::InvalidLayerKind(_))
        ));
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let mut store = loaded(4);
        let wrong_size = RasterLayer::filled(3, 3, 8, 0).unwrap();
        let wrong_channels = RasterLayer::filled(4, 4, 4, 0).unwrap();
        assert!(matches!(
            store.set(LayerKind::Ground, wrong_size),
            Err(LayerError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            store.set(LayerKind::Ground, wrong_channels),
            Err(LayerError::DimensionMismatch { .. })
        ));
        assert_eq!(store.get(LayerKind::Ground).unwrap().dominant(0, 0), 4);

        let sand = RasterLayer::filled(4, 4, 8, GroundTexture::Sand.index()).unwrap();
        store.set(LayerKind::Ground, sand.clone()).unwrap();
        assert_eq!(store.get(LayerKind::Ground).unwrap(), &sand);
    }

    #[test]
    fn test_load_rejects_inconsistent_layers() {
        let mut layers = SplatLayers::uniform(4, 0, 0, 0).unwrap();
        layers.biome = RasterLayer::filled(2, 2, 4, 0).unwrap();
        let mut store = LayerStore::new();
        assert!(store.load(layers).is_err());
        assert!(!store.is_loaded());

        let mut layers = SplatLayers::uniform(4, 0, 0, 0).unwrap();
        layers.topology.pop();
        assert!(matches!(
            store.load(layers),
            Err(LayerError::InvalidLayerKind(_))
        ));
    }

    #[test]
    fn test_texture_lookup() {
        let store = loaded(3);
        assert_eq!(store.texture(LayerKind::Ground, 4, 2, 1), Ok(1.0));
        assert_eq!(store.texture(LayerKind::Ground, 0, 2, 1), Ok(0.0));
        assert!(store.texture(LayerKind::Ground, 8, 0, 0).is_err());
        assert!(store.texture(LayerKind::Ground, 0, 3, 0).is_err());
    }

    #[test]
    fn test_activate_pushes_bindings_and_weights() {
        let mut store = loaded(2);
        let mut display = Recorder::default();
        let kind = LayerKind::Topology(Topology::Beach);
        store.activate(kind, &mut display).unwrap();

        assert_eq!(store.active(), kind);
        assert_eq!(display.bindings.len(), 1);
        assert_eq!(display.bindings[0].1, vec!["Active", "Inactive"]);
        assert_eq!(display.pushed[0].channels(), 2);
        assert_eq!(display.heights, 0);
    }

    #[test]
    fn test_activate_commits_display_edits_to_outgoing_layer() {
        let mut store = loaded(2);
        let mut display = Recorder::default();
        store.activate(LayerKind::Biome, &mut display).unwrap();

        display.pending = Some(RasterLayer::filled(2, 2, 4, 3).unwrap());
        store.activate(LayerKind::Alpha, &mut display).unwrap();
        assert_eq!(store.get(LayerKind::Biome).unwrap().dominant(1, 1), 3);

        // Edits of the wrong shape are dropped.
        display.pending = Some(RasterLayer::filled(5, 5, 2, 1).unwrap());
        store.activate(LayerKind::Ground, &mut display).unwrap();
        assert_eq!(store.get(LayerKind::Alpha).unwrap().dominant(0, 0), 0);
    }

    #[test]
    fn test_activate_without_map_only_records() {
        let mut store = LayerStore::new();
        let mut display = Recorder::default();
        store.activate(LayerKind::Alpha, &mut display).unwrap();
        assert_eq!(store.active(), LayerKind::Alpha);
        assert!(display.pushed.is_empty());
    }
}
