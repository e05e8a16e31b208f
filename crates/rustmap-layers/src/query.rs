//! Height and slope queries against the land heightfield.
//!
//! Heights come back in metres (normalised height times the terrain's
//! vertical size) and slopes in degrees, `0` for flat and `90` for vertical.

use glam::Vec3;

use crate::heightfield::{FieldSampler, Heightfield};

/// Samples a heightfield in world units.
#[derive(Clone, Copy, Debug)]
pub struct TerrainQuery<'a> {
    land: &'a Heightfield,
    size: Vec3,
}

impl<'a> TerrainQuery<'a> {
    /// Queries `land`, a terrain `size.x` wide, `size.y` tall and `size.z` deep.
    pub fn new(land: &'a Heightfield, size: Vec3) -> Self {
        Self { land, size }
    }

    /// The terrain's world size.
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Height in metres at a normalised coordinate.
    pub fn height_norm(&self, x_norm: f32, z_norm: f32) -> f32 {
        self.land.interpolated(x_norm, z_norm) * self.size.y
    }

    /// Steepness in degrees at a normalised coordinate.
    ///
    /// Uses a central difference one heightmap cell wide on each axis,
    /// falling back to a one-sided difference at the borders.
    pub fn steepness_norm(&self, x_norm: f32, z_norm: f32) -> f32 {
        let dx = self.gradient(x_norm, z_norm, self.land.cols(), self.size.x, true);
        let dz = self.gradient(x_norm, z_norm, self.land.rows(), self.size.z, false);
        dx.hypot(dz).atan().to_degrees()
    }

    fn gradient(&self, x_norm: f32, z_norm: f32, samples: usize, extent: f32, along_x: bool) -> f32 {
        if samples < 2 || extent <= 0.0 {
            return 0.0;
        }
        let step = 1.0 / (samples - 1) as f32;
        let centre = if along_x { x_norm } else { z_norm };
        let lo = (centre - step).clamp(0.0, 1.0);
        let hi = (centre + step).clamp(0.0, 1.0);
        let run = (hi - lo) * extent;
        if run <= 0.0 {
            return 0.0;
        }
        let (a, b) = if along_x {
            (self.height_norm(lo, z_norm), self.height_norm(hi, z_norm))
        } else {
            (self.height_norm(x_norm, lo), self.height_norm(x_norm, hi))
        };
        (b - a) / run
    }

    /// Height in metres under raster cell `(x, z)` of a `resolution` wide raster.
    pub fn height_at(&self, x: usize, z: usize, resolution: usize) -> f32 {
        let (xn, zn) = raster_norm(x, z, resolution);
        self.height_norm(xn, zn)
    }

    /// Steepness in degrees under raster cell `(x, z)` of a `resolution` wide raster.
    pub fn slope_at(&self, x: usize, z: usize, resolution: usize) -> f32 {
        let (xn, zn) = raster_norm(x, z, resolution);
        self.steepness_norm(xn, zn)
    }

    /// Heights for every cell of a `rows x cols` raster.
    pub fn height_grid(&self, rows: usize, cols: usize) -> Heightfield {
        materialize(rows, cols, |x, z| self.height_norm(x, z))
    }

    /// Slopes for every cell of a `rows x cols` raster.
    pub fn slope_grid(&self, rows: usize, cols: usize) -> Heightfield {
        materialize(rows, cols, |x, z| self.steepness_norm(x, z))
    }

    /// Sampler yielding heights in metres.
    pub fn heights(self) -> HeightSampler<'a> {
        HeightSampler(self)
    }

    /// Sampler yielding slopes in degrees.
    pub fn slopes(self) -> SlopeSampler<'a> {
        SlopeSampler(self)
    }
}

/// [`FieldSampler`] over terrain heights in metres.
#[derive(Clone, Copy, Debug)]
pub struct HeightSampler<'a>(TerrainQuery<'a>);

impl FieldSampler for HeightSampler<'_> {
    fn sample(&self, x_norm: f32, z_norm: f32) -> f32 {
        self.0.height_norm(x_norm, z_norm)
    }
}

/// [`FieldSampler`] over terrain steepness in degrees.
#[derive(Clone, Copy, Debug)]
pub struct SlopeSampler<'a>(TerrainQuery<'a>);

impl FieldSampler for SlopeSampler<'_> {
    fn sample(&self, x_norm: f32, z_norm: f32) -> f32 {
        self.0.steepness_norm(x_norm, z_norm)
    }
}

/// Scales a normalised heightfield into metres when sampled.
#[derive(Clone, Copy, Debug)]
pub struct ScaledSampler<'a> {
    field: &'a Heightfield,
    scale: f32,
}

impl<'a> ScaledSampler<'a> {
    /// Samples `field` multiplied by `scale`.
    pub fn new(field: &'a Heightfield, scale: f32) -> Self {
        Self { field, scale }
    }
}

impl FieldSampler for ScaledSampler<'_> {
    fn sample(&self, x_norm: f32, z_norm: f32) -> f32 {
        self.field.interpolated(x_norm, z_norm) * self.scale
    }
}

fn raster_norm(x: usize, z: usize, resolution: usize) -> (f32, f32) {
    let res = resolution.max(1) as f32;
    (x as f32 / res, z as f32 / res)
}

fn materialize(rows: usize, cols: usize, f: impl Fn(f32, f32) -> f32) -> Heightfield {
    let mut grid = Heightfield::new(rows, cols, 0.0);
    for row in 0..rows {
        let z = row as f32 / rows as f32;
        for col in 0..cols {
            grid.set(row, col, f(col as f32 / cols as f32, z));
        }
    }
    grid
}
