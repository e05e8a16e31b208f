//! Map file format.
//!
//! ## Binary Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Magic bytes `"RMAP"` |
//! | 4 | 1 | Format version (`u8`, currently 1) |
//! | 5 | 1 | Compression flag (`0x00` none, `0x01` LZ4) |
//! | 6 | N | postcard-encoded [`WorldData`], LZ4 size-prepended if flagged |

use std::path::Path;

use tracing::{debug, info};

use crate::data::WorldData;
use crate::error::WorldError;

/// Magic bytes identifying a map file.
const MAGIC: [u8; 4] = *b"RMAP";

/// Current format version.
const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = 6;

const COMPRESSION_FLAG_NONE: u8 = 0x00;
const COMPRESSION_FLAG_LZ4: u8 = 0x01;

/// Reads and writes whole maps.
pub trait MapCodec {
    /// Reads the map at `path`.
    fn load(&self, path: &Path) -> Result<WorldData, WorldError>;

    /// Writes `world` to `path`, creating parent directories as needed.
    fn save(&self, path: &Path, world: &WorldData) -> Result<(), WorldError>;
}

/// The native binary map format.
#[derive(Clone, Copy, Debug)]
pub struct BinaryMapCodec {
    /// LZ4-compress the body on save. Loading accepts either form.
    pub compress: bool,
}

impl Default for BinaryMapCodec {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl BinaryMapCodec {
    /// A codec that compresses on save when `compress` is set.
    pub fn new(compress: bool) -> Self {
        Self { compress }
    }

    /// Encodes `world` with header.
    pub fn encode(&self, world: &WorldData) -> Result<Vec<u8>, WorldError> {
        let body = postcard::to_allocvec(world)?;
        let (flag, body) = if self.compress {
            (COMPRESSION_FLAG_LZ4, lz4_flex::compress_prepend_size(&body))
        } else {
            (COMPRESSION_FLAG_NONE, body)
        };
        let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
        buf.extend_from_slice(&MAGIC);
        buf.push(FORMAT_VERSION);
        buf.push(flag);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Decodes bytes produced by [`BinaryMapCodec::encode`].
    pub fn decode(&self, data: &[u8]) -> Result<WorldData, WorldError> {
        if data.len() < MAGIC.len() || data[..MAGIC.len()] != MAGIC {
            return Err(WorldError::InvalidMagic);
        }
        if data.len() < HEADER_LEN {
            return Err(WorldError::Truncated {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }
        let version = data[4];
        if version != FORMAT_VERSION {
            return Err(WorldError::UnsupportedVersion(version));
        }
        let body = &data[HEADER_LEN..];
        let world = match data[5] {
            COMPRESSION_FLAG_NONE => postcard::from_bytes(body)?,
            COMPRESSION_FLAG_LZ4 => {
                let raw = lz4_flex::decompress_size_prepended(body)?;
                postcard::from_bytes(&raw)?
            }
            flag => return Err(WorldError::UnknownFlag(flag)),
        };
        Ok(world)
    }
}

impl MapCodec for BinaryMapCodec {
    fn load(&self, path: &Path) -> Result<WorldData, WorldError> {
        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        let world = self.decode(&bytes)?;
        info!(
            "Loaded map {} ({} maps, {} prefabs, {} paths)",
            path.display(),
            world.maps.len(),
            world.prefabs.len(),
            world.paths.len()
        );
        Ok(world)
    }

    fn save(&self, path: &Path, world: &WorldData) -> Result<(), WorldError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.encode(world)?;
        std::fs::write(path, &bytes)?;
        info!("Saved map {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HEIGHT_MAP;

    fn sample_world() -> WorldData {
        let mut world = WorldData {
            size: glam::Vec3::new(16.0, 1000.0, 16.0),
            ..Default::default()
        };
        world.set_map(HEIGHT_MAP, vec![7; 512]);
        world
    }

    #[test]
    fn test_encode_decode_both_flags() {
        let world = sample_world();
        for compress in [false, true] {
            let codec = BinaryMapCodec::new(compress);
            let bytes = codec.encode(&world).unwrap();
            assert_eq!(&bytes[..4], b"RMAP");
            assert_eq!(bytes[5], compress as u8);
            // Either codec reads either flag.
            assert_eq!(BinaryMapCodec::new(!compress).decode(&bytes).unwrap(), world);
        }
    }

    #[test]
    fn test_compression_shrinks_repetitive_maps() {
        let world = sample_world();
        let plain = BinaryMapCodec::new(false).encode(&world).unwrap();
        let packed = BinaryMapCodec::new(true).encode(&world).unwrap();
        assert!(packed.len() < plain.len());
    }

    #[test]
    fn test_header_errors() {
        let codec = BinaryMapCodec::default();
        assert!(matches!(codec.decode(b"RM"), Err(WorldError::InvalidMagic)));
        assert!(matches!(codec.decode(b"NOPE\x01\x00"), Err(WorldError::InvalidMagic)));
        assert!(matches!(
            codec.decode(b"RMAP\x01"),
            Err(WorldError::Truncated { expected: 6, actual: 5 })
        ));
        assert!(matches!(
            codec.decode(b"RMAP\x09\x00"),
            Err(WorldError::UnsupportedVersion(9))
        ));
        assert!(matches!(
            codec.decode(b"RMAP\x01\x07"),
            Err(WorldError::UnknownFlag(0x07))
        ));
    }

    #[test]
    fn test_corrupt_body() {
        let codec = BinaryMapCodec::new(true);
        let mut bytes = codec.encode(&sample_world()).unwrap();
        bytes.truncate(HEADER_LEN + 6);
        assert!(codec.decode(&bytes).is_err());
    }
}
