//! Splat layer data model and raster editing: the layer catalog, the layer
//! store, heightfields, height/slope queries and the paint algorithms.
//!
//! Algorithms are plain functions over [`RasterLayer`] and [`Heightfield`]
//! values that return new grids; [`LayerStore`] owns the loaded map's rasters
//! and keeps a [`TerrainDisplay`] in step with the active layer.

mod area;
mod bulk;
mod catalog;
mod conditions;
mod display;
mod error;
mod heightfield;
mod progress;
mod query;
mod raster;
mod rotate;
mod store;

pub mod heightmap_ops;
pub mod paint;

pub use area::AreaSelector;
pub use bulk::{BulkOutcome, for_each_topology};
pub use catalog::{BiomeTexture, GroundTexture, LayerKind, MiscTexture, TOPOLOGY_COUNT, Topology};
pub use conditions::{
    ConditionContext, Conditions, DEFAULT_ALPHA_THRESHOLD, DEFAULT_MEMBERSHIP_THRESHOLD,
    ValueRange, paint_conditional,
};
pub use display::{NullDisplay, TerrainDisplay};
pub use error::LayerError;
pub use heightfield::{FieldSampler, Heightfield};
pub use heightmap_ops::EdgeSides;
pub use paint::{DEFAULT_RIVER_WATER_LEVEL, PaintRange};
pub use progress::{LogProgress, NullProgress, ProgressReporter};
pub use query::{HeightSampler, ScaledSampler, SlopeSampler, TerrainQuery};
pub use raster::{MAX_CHANNELS, RasterLayer, SIMPLEX_EPSILON, Shape};
pub use rotate::{Rotation, rotate_heightfield, rotate_raster};
pub use store::{LayerStore, SplatLayers};
