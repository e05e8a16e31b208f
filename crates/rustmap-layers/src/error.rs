//! Error type shared by the store and the raster algorithms.

use crate::raster::Shape;

/// Errors raised by layer lookups and raster algorithms.
///
/// Every variant is returned before any state is touched; a failed operation
/// leaves the store and its inputs exactly as they were.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    /// The layer name or topology index does not name a layer.
    #[error("invalid layer kind: {0}")]
    InvalidLayerKind(String),

    /// No map has been loaded into the store yet.
    #[error("no map is loaded")]
    NotLoaded,

    /// A raster or grid does not have the shape the operation requires.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Shape the operation required.
        expected: Shape,
        /// Shape that was supplied.
        actual: Shape,
    },

    /// A height operation would move a sample outside `[0, 1]`.
    #[error("sample at ({row}, {col}) would become {value}, outside [0, 1]")]
    OutOfRange {
        /// Row of the first offending sample.
        row: usize,
        /// Column of the first offending sample.
        col: usize,
        /// The value the sample would have taken.
        value: f32,
    },

    /// Rotation is only defined for square grids.
    #[error("cannot rotate a non-square grid of {rows}x{cols}")]
    NonSquare {
        /// Row count of the grid.
        rows: usize,
        /// Column count of the grid.
        cols: usize,
    },

    /// A texture index is not below the raster's channel count.
    #[error("texture {texture} out of range for a layer with {channels} textures")]
    TextureOutOfRange {
        /// The requested texture index.
        texture: usize,
        /// Channel count of the raster.
        channels: usize,
    },
}
