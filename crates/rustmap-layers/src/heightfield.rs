//! Scalar grids: land and water heightmaps, and materialised height/slope grids.

use crate::error::LayerError;
use crate::raster::Shape;

/// Anything that can be sampled at a normalised map coordinate.
///
/// `x_norm` runs along columns and `z_norm` along rows, both in `[0, 1]`.
/// Samplers resolve the coordinate against their own resolution, so a
/// raster and the field it reads from may differ in size.
pub trait FieldSampler {
    /// Value at the normalised coordinate.
    fn sample(&self, x_norm: f32, z_norm: f32) -> f32;
}

/// A `rows x cols` grid of `f32` samples, row-major.
///
/// Land and water heightmaps hold normalised heights in `[0, 1]`; grids built
/// by [`crate::TerrainQuery`] hold metres or degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Heightfield {
    /// A grid with every sample set to `value`.
    pub fn new(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wraps existing samples.
    ///
    /// # Errors
    ///
    /// [`LayerError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, LayerError> {
        if data.len() != rows * cols {
            return Err(LayerError::DimensionMismatch {
                expected: Shape::grid(rows, cols),
                actual: Shape::grid(data.len(), 1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a grid from nested rows. Ragged input is rejected.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, LayerError> {
        let cols = rows.first().map_or(0, Vec::len);
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::from_vec(rows.len(), cols, data)
    }

    /// Row count (Z).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count (X).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as a single-channel grid.
    pub fn shape(&self) -> Shape {
        Shape::grid(self.rows, self.cols)
    }

    /// `true` when rows equal columns.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Raw samples, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw samples, row-major.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the grid, returning its samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Sample at a grid point.
    ///
    /// # Panics
    ///
    /// Panics if the point is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "grid index out of range");
        self.data[row * self.cols + col]
    }

    /// Sets a grid point.
    ///
    /// # Panics
    ///
    /// Panics if the point is out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(row < self.rows && col < self.cols, "grid index out of range");
        self.data[row * self.cols + col] = value;
    }

    /// Smallest and largest sample, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Bilinearly interpolated sample at a normalised coordinate.
    ///
    /// Coordinates are clamped to `[0, 1]`; `1.0` lands exactly on the last
    /// row/column. An empty grid samples as `0.0`.
    pub fn interpolated(&self, x_norm: f32, z_norm: f32) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let (c0, c1, tx) = axis(x_norm, self.cols);
        let (r0, r1, tz) = axis(z_norm, self.rows);

        let top = lerp(self.get(r0, c0), self.get(r0, c1), tx);
        let bottom = lerp(self.get(r1, c0), self.get(r1, c1), tx);
        lerp(top, bottom, tz)
    }
}

impl FieldSampler for Heightfield {
    fn sample(&self, x_norm: f32, z_norm: f32) -> f32 {
        self.interpolated(x_norm, z_norm)
    }
}

/// Neighbouring indices and interpolation factor along one axis.
fn axis(norm: f32, len: usize) -> (usize, usize, f32) {
    if len <= 1 {
        return (0, 0, 0.0);
    }
    let pos = norm.clamp(0.0, 1.0) * (len - 1) as f32;
    let i0 = (pos.floor() as usize).min(len - 1);
    let i1 = (i0 + 1).min(len - 1);
    (i0, i1, pos - i0 as f32)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
