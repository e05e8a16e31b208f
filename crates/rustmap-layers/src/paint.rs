//! Splat raster algorithms.
//!
//! Each function reads its inputs and returns a freshly painted raster of the
//! same shape. Committing the result to a store is the caller's job. Cells are
//! sampled at `x = col / cols`, `z = row / rows`, so a raster and the field it
//! reads may have different resolutions.

use crate::area::AreaSelector;
use crate::catalog::{LayerKind, MiscTexture};
use crate::error::LayerError;
use crate::heightfield::FieldSampler;
use crate::raster::{RasterLayer, Shape, one_hot};

/// Below this a blended cell's weights are treated as all zero.
const BLEND_EPSILON: f32 = 1e-6;

/// Water height, in metres, above which a cell counts as river.
pub const DEFAULT_RIVER_WATER_LEVEL: f32 = 500.0;

/// A fully painted interval with optional linear ramps on either side.
///
/// Values in `[low, high]` paint at full weight. Below that, values in
/// `(blend_low, low)` ramp up towards 1; above it, values in
/// `(high, blend_high)` ramp down towards 0. The ramp ends themselves are
/// outside the range and stay untouched. A ramp whose width is zero or
/// negative covers no values, so the transition is a hard edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintRange {
    /// Lower bound of the fully painted interval.
    pub low: f32,
    /// Upper bound of the fully painted interval.
    pub high: f32,
    /// Where the lower ramp starts.
    pub blend_low: Option<f32>,
    /// Where the upper ramp ends.
    pub blend_high: Option<f32>,
}

impl PaintRange {
    /// A hard-edged range.
    pub fn new(low: f32, high: f32) -> Self {
        Self {
            low,
            high,
            blend_low: None,
            blend_high: None,
        }
    }

    /// Adds ramps below `low` and above `high`.
    pub fn with_blend(mut self, blend_low: f32, blend_high: f32) -> Self {
        self.blend_low = Some(blend_low);
        self.blend_high = Some(blend_high);
        self
    }

    /// Target texture weight for `value`, or `None` if the cell is untouched.
    pub fn weight(&self, value: f32) -> Option<f32> {
        if value >= self.low && value <= self.high {
            return Some(1.0);
        }
        if let Some(blend_low) = self.blend_low
            && value > blend_low
            && value < self.low
        {
            return Some((value - blend_low) / (self.low - blend_low));
        }
        if let Some(blend_high) = self.blend_high
            && value > self.high
            && value < blend_high
        {
            return Some(1.0 - (value - self.high) / (blend_high - self.high));
        }
        None
    }
}

/// Blends `texture` into a cell at weight `w` and renormalises.
///
/// The target takes `w`, every other texture is scaled by `1 - w`, then the
/// cell is divided by its sum. A cell whose weights vanish keeps its old
/// values.
pub(crate) fn blend_cell(cell: &mut [f32], texture: usize, w: f32) {
    if w >= 1.0 {
        one_hot(cell, texture);
        return;
    }
    let keep = (1.0 - w).clamp(0.0, 1.0);
    let others: f32 = cell
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != texture)
        .map(|(_, weight)| weight)
        .sum();
    let sum = w + others * keep;
    if sum <= BLEND_EPSILON {
        return;
    }
    for (k, weight) in cell.iter_mut().enumerate() {
        if k == texture {
            *weight = w;
        } else {
            *weight *= keep;
        }
    }
    for weight in cell.iter_mut() {
        *weight /= sum;
    }
}

#[inline]
fn cell_coords(row: usize, col: usize, shape: Shape) -> (f32, f32) {
    (
        col as f32 / shape.cols as f32,
        row as f32 / shape.rows as f32,
    )
}

fn check_two_channel(raster: &RasterLayer) -> Result<(), LayerError> {
    raster.check_shape(Shape::new(
        raster.rows(),
        raster.cols(),
        LayerKind::MISC_TEXTURES,
    ))
}

/// Paints every cell fully `texture`.
pub fn paint_layer(raster: &RasterLayer, texture: usize) -> Result<RasterLayer, LayerError> {
    raster.check_texture(texture)?;
    let mut out = raster.clone();
    for (_, _, cell) in out.cells_mut() {
        one_hot(cell, texture);
    }
    Ok(out)
}

/// Resets a two-channel raster to its resting state: `Active` everywhere for
/// alpha, `Inactive` everywhere for a topology.
pub fn clear_layer(raster: &RasterLayer, is_alpha: bool) -> Result<RasterLayer, LayerError> {
    check_two_channel(raster)?;
    let texture = if is_alpha {
        MiscTexture::Active
    } else {
        MiscTexture::Inactive
    };
    paint_layer(raster, texture.index())
}

/// Flips every cell of a two-channel raster between `Active` and `Inactive`.
///
/// A cell counts as active when its channel 0 weight is at least 0.5.
pub fn invert_layer(raster: &RasterLayer) -> Result<RasterLayer, LayerError> {
    check_two_channel(raster)?;
    let mut out = raster.clone();
    for (_, _, cell) in out.cells_mut() {
        let texture = if cell[0] < 0.5 {
            MiscTexture::Active
        } else {
            MiscTexture::Inactive
        };
        one_hot(cell, texture.index());
    }
    Ok(out)
}

/// Paints `texture` inside a rectangle, clamped to the raster.
pub fn paint_area(
    raster: &RasterLayer,
    area: AreaSelector,
    texture: usize,
) -> Result<RasterLayer, LayerError> {
    raster.check_texture(texture)?;
    let mut out = raster.clone();
    let (rows, cols) = area.clamped(raster.rows(), raster.cols());
    for row in rows {
        for col in cols.clone() {
            out.paint_cell(row, col, texture);
        }
    }
    Ok(out)
}

/// Paints `texture` wherever `field` falls in `range`, blending on the ramps.
pub fn paint_by_field(
    raster: &RasterLayer,
    field: &dyn FieldSampler,
    range: PaintRange,
    texture: usize,
) -> Result<RasterLayer, LayerError> {
    raster.check_texture(texture)?;
    let shape = raster.shape();
    let mut out = raster.clone();
    for (row, col, cell) in out.cells_mut() {
        let (x, z) = cell_coords(row, col, shape);
        if let Some(w) = range.weight(field.sample(x, z)) {
            blend_cell(cell, texture, w);
        }
    }
    Ok(out)
}

/// Paints by terrain height. `heights` decides the units of `range`.
pub fn paint_by_height(
    raster: &RasterLayer,
    heights: &dyn FieldSampler,
    range: PaintRange,
    texture: usize,
) -> Result<RasterLayer, LayerError> {
    paint_by_field(raster, heights, range, texture)
}

/// Paints by terrain steepness in degrees.
pub fn paint_by_slope(
    raster: &RasterLayer,
    slopes: &dyn FieldSampler,
    range: PaintRange,
    texture: usize,
) -> Result<RasterLayer, LayerError> {
    paint_by_field(raster, slopes, range, texture)
}

/// Paints `texture` where the water surface is above `water_level` and,
/// when `above_terrain_only` is set, also above the land.
pub fn paint_river(
    raster: &RasterLayer,
    water: &dyn FieldSampler,
    land: &dyn FieldSampler,
    water_level: f32,
    above_terrain_only: bool,
    texture: usize,
) -> Result<RasterLayer, LayerError> {
    raster.check_texture(texture)?;
    let shape = raster.shape();
    let mut out = raster.clone();
    for (row, col, cell) in out.cells_mut() {
        let (x, z) = cell_coords(row, col, shape);
        let water_height = water.sample(x, z);
        if water_height <= water_level {
            continue;
        }
        if above_terrain_only && water_height <= land.sample(x, z) {
            continue;
        }
        one_hot(cell, texture);
    }
    Ok(out)
}

/// Paints `dst_texture` on `dst` wherever `src` carries any `src_texture`.
///
/// The rasters must cover the same cells; channel counts may differ.
pub fn copy_texture(
    src: &RasterLayer,
    dst: &RasterLayer,
    src_texture: usize,
    dst_texture: usize,
) -> Result<RasterLayer, LayerError> {
    src.check_texture(src_texture)?;
    dst.check_texture(dst_texture)?;
    if (src.rows(), src.cols()) != (dst.rows(), dst.cols()) {
        return Err(LayerError::DimensionMismatch {
            expected: Shape::new(dst.rows(), dst.cols(), src.channels()),
            actual: src.shape(),
        });
    }
    let mut out = dst.clone();
    for (row, col, cell) in out.cells_mut() {
        if src.get(row, col, src_texture) > 0.0 {
            one_hot(cell, dst_texture);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_full_range_inclusive() {
        let range = PaintRange::new(10.0, 20.0);
        assert_eq!(range.weight(10.0), Some(1.0));
        assert_eq!(range.weight(20.0), Some(1.0));
        assert_eq!(range.weight(9.99), None);
        assert_eq!(range.weight(20.01), None);
    }

    #[test]
    fn test_weight_ramps() {
        let range = PaintRange::new(10.0, 20.0).with_blend(0.0, 40.0);
        assert_eq!(range.weight(0.0), None);
        assert_eq!(range.weight(5.0), Some(0.5));
        assert_eq!(range.weight(30.0), Some(0.5));
        assert_eq!(range.weight(40.0), None);
        assert_eq!(range.weight(-1.0), None);
        assert_eq!(range.weight(41.0), None);
    }

    #[test]
    fn test_zero_width_ramp_is_hard_edge() {
        let range = PaintRange::new(10.0, 20.0).with_blend(10.0, 20.0);
        assert_eq!(range.weight(10.0), Some(1.0));
        assert_eq!(range.weight(9.0), None);
        assert_eq!(range.weight(21.0), None);
        for v in [9.999, 10.0, 20.0, 20.001] {
            assert!(range.weight(v).is_none_or(|w| w.is_finite()));
        }
    }

    #[test]
    fn test_blend_cell_renormalizes() {
        let mut cell = [0.0, 1.0, 0.0, 0.0];
        blend_cell(&mut cell, 0, 0.25);
        let sum: f32 = cell.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((cell[0] - 0.25).abs() < 1e-6);
        assert!((cell[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_blend_cell_zero_weight_keeps_cell() {
        let mut cell = [0.0, 0.0, 1.0];
        blend_cell(&mut cell, 0, 0.0);
        assert_eq!(cell, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_blend_cell_vanishing_sum_restores() {
        let mut cell = [0.0, 0.0];
        blend_cell(&mut cell, 1, 0.0);
        assert_eq!(cell, [0.0, 0.0]);
    }

    #[test]
    fn test_clear_and_invert_need_two_channels() {
        let ground = RasterLayer::filled(2, 2, 8, 0).unwrap();
        assert!(matches!(
            clear_layer(&ground, false),
            Err(LayerError::DimensionMismatch { .. })
        ));
        assert!(invert_layer(&ground).is_err());
    }

    #[test]
    fn test_clear_layer_patterns() {
        let raster = RasterLayer::filled(2, 2, 2, 0).unwrap();
        let topology = clear_layer(&raster, false).unwrap();
        assert_eq!(topology.cell(1, 1), &[0.0, 1.0]);
        let alpha = clear_layer(&topology, true).unwrap();
        assert_eq!(alpha.cell(0, 1), &[1.0, 0.0]);
    }

    #[test]
    fn test_invert_layer_flips_each_cell() {
        let raster = RasterLayer::from_vec(1, 3, 2, vec![1.0, 0.0, 0.0, 1.0, 0.5, 0.5]).unwrap();
        let inverted = invert_layer(&raster).unwrap();
        assert_eq!(inverted.as_slice(), &[0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_copy_texture() {
        let src = RasterLayer::from_vec(1, 2, 2, vec![0.1, 0.9, 0.0, 1.0]).unwrap();
        let dst = RasterLayer::filled(1, 2, 4, 3).unwrap();
        let copied = copy_texture(&src, &dst, 0, 1).unwrap();
        assert_eq!(copied.cell(0, 0), &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(copied.cell(0, 1), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_copy_texture_shape_mismatch() {
        let src = RasterLayer::filled(2, 2, 2, 0).unwrap();
        let dst = RasterLayer::filled(3, 3, 2, 1).unwrap();
        assert!(matches!(
            copy_texture(&src, &dst, 0, 0),
            Err(LayerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_texture_rejected_before_painting() {
        let raster = RasterLayer::filled(2, 2, 4, 0).unwrap();
        assert_eq!(
            paint_layer(&raster, 4),
            Err(LayerError::TextureOutOfRange {
                texture: 4,
                channels: 4
            })
        );
    }
}
