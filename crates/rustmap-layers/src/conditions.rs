//! Conditional painting: paint a cell only where every enabled predicate holds.

use crate::catalog::{BiomeTexture, GroundTexture, LayerKind, MiscTexture, Topology};
use crate::error::LayerError;
use crate::heightfield::Heightfield;
use crate::query::TerrainQuery;
use crate::raster::{RasterLayer, Shape, one_hot};
use crate::store::LayerStore;

/// Default weight a ground, biome or topology texture needs to satisfy a condition.
pub const DEFAULT_MEMBERSHIP_THRESHOLD: f32 = 0.5;

/// Default weight an alpha texture needs to satisfy a condition.
pub const DEFAULT_ALPHA_THRESHOLD: f32 = 1.0;

/// Inclusive `[low, high]` interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    /// Lower bound.
    pub low: f32,
    /// Upper bound.
    pub high: f32,
}

impl ValueRange {
    /// A range from `low` to `high`.
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// `true` if `value` lies inside the range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.low && value <= self.high
    }
}

/// A conjunction of per-cell predicates.
///
/// Empty lists and `None` ranges are disabled. Texture lists require every
/// listed texture, not any one of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Conditions {
    /// Terrain height in metres.
    pub height: Option<ValueRange>,
    /// Terrain steepness in degrees.
    pub slope: Option<ValueRange>,
    /// Ground textures that must be present.
    pub ground: Vec<GroundTexture>,
    /// Biome textures that must be present.
    pub biome: Vec<BiomeTexture>,
    /// Topology layers whose `topology_texture` must be present.
    pub topology: Vec<Topology>,
    /// Texture checked on each listed topology layer.
    pub topology_texture: MiscTexture,
    /// Alpha texture that must be present.
    pub alpha: Option<MiscTexture>,
    /// Weight a ground, biome or topology texture needs.
    pub membership_threshold: f32,
    /// Weight the alpha texture needs.
    pub alpha_threshold: f32,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            height: None,
            slope: None,
            ground: Vec::new(),
            biome: Vec::new(),
            topology: Vec::new(),
            topology_texture: MiscTexture::Active,
            alpha: None,
            membership_threshold: DEFAULT_MEMBERSHIP_THRESHOLD,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
        }
    }
}

impl Conditions {
    /// `true` if no predicate is enabled, so every cell passes.
    pub fn is_empty(&self) -> bool {
        self.height.is_none()
            && self.slope.is_none()
            && self.ground.is_empty()
            && self.biome.is_empty()
            && self.topology.is_empty()
            && self.alpha.is_none()
    }
}

/// Reference rasters and materialised grids a [`Conditions`] set reads.
///
/// Heights and slopes are only computed when a range asks for them.
pub struct ConditionContext<'a> {
    conditions: &'a Conditions,
    ground: &'a RasterLayer,
    biome: &'a RasterLayer,
    alpha: &'a RasterLayer,
    topologies: Vec<&'a RasterLayer>,
    heights: Option<Heightfield>,
    slopes: Option<Heightfield>,
}

impl<'a> ConditionContext<'a> {
    /// Gathers everything `conditions` needs from the store.
    ///
    /// # Errors
    ///
    /// [`LayerError::NotLoaded`] if the store holds no map.
    pub fn prepare(
        store: &'a LayerStore,
        query: &TerrainQuery<'_>,
        conditions: &'a Conditions,
    ) -> Result<Self, LayerError> {
        let ground = store.get(LayerKind::Ground)?;
        let (rows, cols) = (ground.rows(), ground.cols());
        let topologies = conditions
            .topology
            .iter()
            .map(|t| store.get(LayerKind::Topology(*t)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            conditions,
            ground,
            biome: store.get(LayerKind::Biome)?,
            alpha: store.get(LayerKind::Alpha)?,
            topologies,
            heights: conditions.height.map(|_| query.height_grid(rows, cols)),
            slopes: conditions.slope.map(|_| query.slope_grid(rows, cols)),
        })
    }

    /// Evaluates every enabled predicate at a cell.
    pub fn passes(&self, row: usize, col: usize) -> bool {
        let c = self.conditions;
        if let (Some(range), Some(heights)) = (c.height, &self.heights)
            && !range.contains(heights.get(row, col))
        {
            return false;
        }
        if let (Some(range), Some(slopes)) = (c.slope, &self.slopes)
            && !range.contains(slopes.get(row, col))
        {
            return false;
        }
        let member = |raster: &RasterLayer, texture: usize| {
            raster.get(row, col, texture) >= c.membership_threshold
        };
        if !c.ground.iter().all(|t| member(self.ground, t.index())) {
            return false;
        }
        if !c.biome.iter().all(|t| member(self.biome, t.index())) {
            return false;
        }
        if !self
            .topologies
            .iter()
            .all(|&layer| member(layer, c.topology_texture.index()))
        {
            return false;
        }
        if let Some(alpha) = c.alpha
            && self.alpha.get(row, col, alpha.index()) < c.alpha_threshold
        {
            return false;
        }
        true
    }
}

/// Paints `texture` on every cell of `raster` where `context` passes.
///
/// # Errors
///
/// [`LayerError::TextureOutOfRange`] for a bad texture and
/// [`LayerError::DimensionMismatch`] if `raster` does not cover the same cells
/// as the reference layers.
pub fn paint_conditional(
    raster: &RasterLayer,
    texture: usize,
    context: &ConditionContext<'_>,
) -> Result<RasterLayer, LayerError> {
    raster.check_texture(texture)?;
    let expected = context.ground.shape();
    if (raster.rows(), raster.cols()) != (expected.rows, expected.cols) {
        return Err(LayerError::DimensionMismatch {
            expected: Shape::new(expected.rows, expected.cols, raster.channels()),
            actual: raster.shape(),
        });
    }
    let mut out = raster.clone();
    for (row, col, cell) in out.cells_mut() {
        if context.passes(row, col) {
            one_hot(cell, texture);
        }
    }
    Ok(out)
}
