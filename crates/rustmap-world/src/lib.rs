//! Map persistence for the editor: the stored map model, byte-map encodings,
//! conversion to and from editable layers, and the on-disk file format.

mod codec;
mod convert;
mod data;
mod encoding;
mod error;

pub use codec::{BinaryMapCodec, MapCodec};
pub use convert::{
    DEFAULT_HEIGHT_SCALE, EMPTY_MAP_HEIGHT, MapInfo, empty_map, empty_world, resolutions_for_size,
    terrain_to_world, world_to_terrain,
};
pub use data::{
    ALPHA_MAP, BIOME_MAP, HEIGHT_MAP, MapData, PathData, PrefabData, SPLAT_MAP, TERRAIN_MAP,
    TOPOLOGY_MAP, WATER_MAP, WorldData, rotate_objects,
};
pub use encoding::{
    decode_alpha, decode_heights, decode_splat, decode_topology, encode_alpha, encode_heights,
    encode_splat, encode_topology,
};
pub use error::WorldError;
