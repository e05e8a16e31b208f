//! World conversion and map file errors.

use rustmap_layers::LayerError;

/// Errors raised while reading, writing or converting a map.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Reading or writing the map file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The map body could not be (de)serialised.
    #[error("serialization error: {0}")]
    Postcard(#[from] postcard::Error),

    /// The compressed map body is corrupt.
    #[error("LZ4 decompression failed: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    /// The file does not start with the map magic bytes.
    #[error("invalid magic bytes")]
    InvalidMagic,

    /// The file was written by a newer format version.
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// The header carries an unknown compression flag.
    #[error("unknown compression flag: {0:#04x}")]
    UnknownFlag(u8),

    /// The file is shorter than its header.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// A required byte map is absent.
    #[error("map `{0}` is missing")]
    MissingMap(String),

    /// A byte map's length does not describe a square grid.
    #[error("map `{name}` is malformed: {reason}")]
    MalformedMap {
        /// Name of the byte map.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Splat maps disagree on their resolution.
    #[error("map `{name}` has resolution {actual}, expected {expected}")]
    ResolutionMismatch {
        /// Name of the byte map.
        name: String,
        /// Resolution of the other splat maps.
        expected: usize,
        /// Resolution of this map.
        actual: usize,
    },

    /// Decoded layers were rejected.
    #[error(transparent)]
    Layer(#[from] LayerError),
}
