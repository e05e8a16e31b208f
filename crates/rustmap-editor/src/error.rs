//! Editor session errors.

use rustmap_layers::LayerError;
use rustmap_world::WorldError;

/// Errors raised by a [`MapSession`](crate::MapSession) operation.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A layer lookup or raster algorithm failed.
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// Reading, writing or converting the map failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Metre conversions need a positive, finite map height.
    #[error("height scale {0} m is not a positive finite number")]
    InvalidHeightScale(f32),
}
