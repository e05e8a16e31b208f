//! The terrain display the store keeps in sync with the active layer.

use crate::catalog::LayerKind;
use crate::heightfield::Heightfield;
use crate::raster::RasterLayer;

/// Whatever renders the terrain: an editor viewport, a preview window, or
/// nothing at all for headless use.
///
/// Calls are best-effort notifications; a display cannot fail an edit.
pub trait TerrainDisplay {
    /// Shows `raster` as the terrain's splat weights.
    fn push_alphamaps(&mut self, raster: &RasterLayer);

    /// Binds the named textures, in channel order, for `kind`.
    fn push_texture_bindings(&mut self, kind: LayerKind, names: &[&str]);

    /// Shows new land and water heights.
    fn push_heightmaps(&mut self, _land: &Heightfield, _water: &Heightfield) {}

    /// Splat weights edited directly on the display since the last push,
    /// if the display supports editing.
    fn fetch_alphamaps(&mut self) -> Option<RasterLayer> {
        None
    }
}

/// A display that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl TerrainDisplay for NullDisplay {
    fn push_alphamaps(&mut self, _raster: &RasterLayer) {}

    fn push_texture_bindings(&mut self, _kind: LayerKind, _names: &[&str]) {}
}
