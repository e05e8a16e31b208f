//! Dense splat rasters: a weight vector per cell.
//!
//! A [`RasterLayer`] is a `rows x cols x channels` grid of `f32` weights stored
//! row-major with channels innermost. Rows run along the map's Z axis and
//! columns along X, matching how alphamaps are addressed (`[z, x, texture]`).
//! Outside of an in-progress blend every cell's weights sum to 1.

use std::fmt;

use crate::catalog::LayerKind;
use crate::error::LayerError;

/// Tolerance used when checking that a cell's weights sum to one.
pub const SIMPLEX_EPSILON: f32 = 1e-4;

/// Largest channel count any layer kind uses.
pub const MAX_CHANNELS: usize = LayerKind::GROUND_TEXTURES;

/// Dimensions of a raster or grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    /// Rows (Z axis).
    pub rows: usize,
    /// Columns (X axis).
    pub cols: usize,
    /// Channels per cell; 1 for scalar grids.
    pub channels: usize,
}

impl Shape {
    /// Shape of a raster.
    pub const fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
        }
    }

    /// Shape of a single-channel grid.
    pub const fn grid(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols, 1)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.rows, self.cols, self.channels)
    }
}

/// Per-cell texture weights for one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterLayer {
    rows: usize,
    cols: usize,
    channels: usize,
    data: Vec<f32>,
}

impl RasterLayer {
    /// A raster with every weight at zero. Callers must paint it before the
    /// weights form a valid distribution.
    pub fn zeroed(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
            data: vec![0.0; rows * cols * channels],
        }
    }

    /// A raster where every cell is fully `texture`.
    ///
    /// # Errors
    ///
    /// [`LayerError::TextureOutOfRange`] if `texture >= channels`.
    pub fn filled(
        rows: usize,
        cols: usize,
        channels: usize,
        texture: usize,
    ) -> Result<Self, LayerError> {
        let mut raster = Self::zeroed(rows, cols, channels);
        raster.check_texture(texture)?;
        for cell in raster.data.chunks_exact_mut(channels) {
            cell[texture] = 1.0;
        }
        Ok(raster)
    }

    /// A raster sized for `kind`, fully painted with `texture`.
    pub fn for_kind(
        kind: LayerKind,
        rows: usize,
        cols: usize,
        texture: usize,
    ) -> Result<Self, LayerError> {
        Self::filled(rows, cols, kind.texture_count(), texture)
    }

    /// Wraps existing weights.
    ///
    /// # Errors
    ///
    /// [`LayerError::DimensionMismatch`] if `data.len() != rows * cols * channels`.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, LayerError> {
        if data.len() != rows * cols * channels {
            return Err(LayerError::DimensionMismatch {
                expected: Shape::new(rows, cols, channels),
                actual: Shape::new(data.len(), 1, 1),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    /// Row count (Z).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count (X).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Textures per cell.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Full shape.
    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols, self.channels)
    }

    /// `true` when rows equal columns.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Raw weights, row-major with channels innermost.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the raster, returning its weights.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        (row * self.cols + col) * self.channels
    }

    /// Weight of `texture` at a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell or texture is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize, texture: usize) -> f32 {
        assert!(texture < self.channels, "texture index out of range");
        self.data[self.offset(row, col) + texture]
    }

    /// Sets the weight of `texture` at a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell or texture is out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, texture: usize, value: f32) {
        assert!(texture < self.channels, "texture index out of range");
        let offset = self.offset(row, col);
        self.data[offset + texture] = value;
    }

    /// All weights of a cell.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &[f32] {
        let offset = self.offset(row, col);
        &self.data[offset..offset + self.channels]
    }

    /// Mutable weights of a cell.
    #[inline]
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut [f32] {
        let offset = self.offset(row, col);
        let channels = self.channels;
        &mut self.data[offset..offset + channels]
    }

    /// Iterates `(row, col, weights)` in row-major order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut [f32])> {
        let cols = self.cols.max(1);
        self.data
            .chunks_exact_mut(self.channels.max(1))
            .enumerate()
            .map(move |(i, cell)| (i / cols, i % cols, cell))
    }

    /// Makes a cell fully `texture`.
    #[inline]
    pub fn paint_cell(&mut self, row: usize, col: usize, texture: usize) {
        one_hot(self.cell_mut(row, col), texture);
    }

    /// Checks that `texture` is one of this raster's channels.
    pub fn check_texture(&self, texture: usize) -> Result<(), LayerError> {
        if texture < self.channels {
            Ok(())
        } else {
            Err(LayerError::TextureOutOfRange {
                texture,
                channels: self.channels,
            })
        }
    }

    /// Checks this raster has exactly `expected` shape.
    pub fn check_shape(&self, expected: Shape) -> Result<(), LayerError> {
        if self.shape() == expected {
            Ok(())
        } else {
            Err(LayerError::DimensionMismatch {
                expected,
                actual: self.shape(),
            })
        }
    }

    /// `true` if every cell's weights sum to one within [`SIMPLEX_EPSILON`]
    /// and no weight is negative.
    pub fn is_normalized(&self) -> bool {
        self.data.chunks_exact(self.channels.max(1)).all(|cell| {
            cell.iter().all(|w| *w >= 0.0) && (cell.iter().sum::<f32>() - 1.0).abs() <= SIMPLEX_EPSILON
        })
    }

    /// Texture with the highest weight in a cell; ties resolve to the lowest index.
    pub fn dominant(&self, row: usize, col: usize) -> usize {
        let cell = self.cell(row, col);
        let mut best = 0;
        for (k, w) in cell.iter().enumerate() {
            if *w > cell[best] {
                best = k;
            }
        }
        best
    }
}

/// Writes a one-hot vector at `texture` into `cell`.
#[inline]
pub(crate) fn one_hot(cell: &mut [f32], texture: usize) {
    cell.fill(0.0);
    cell[texture] = 1.0;
}
