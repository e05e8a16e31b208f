//! Byte encodings of heightmaps and splat maps.
//!
//! | Map | Sample | Layout |
//! |-----|--------|--------|
//! | height, water | `u16` LE, `/ u16::MAX` | row-major |
//! | splat, biome | `u8`, `/ 255` | channel-major: `[(k * res + z) * res + x]` |
//! | alpha | `u8`, non-zero is active | row-major |
//! | topology | `u32` LE bitmask | row-major, bit `i` is topology `i` |
//!
//! Every map is square; its resolution is recovered from its length.

use rustmap_layers::{Heightfield, LayerKind, MiscTexture, RasterLayer, TOPOLOGY_COUNT, Topology};

use crate::error::WorldError;

/// Weight at or above which a two-channel cell counts as active on save.
const ACTIVE_THRESHOLD: f32 = 0.5;

fn malformed(name: &str, reason: impl Into<String>) -> WorldError {
    WorldError::MalformedMap {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Resolution of a square map of `len` bytes with `sample_bytes` per cell.
fn square_resolution(name: &str, len: usize, sample_bytes: usize) -> Result<usize, WorldError> {
    if !len.is_multiple_of(sample_bytes) {
        return Err(malformed(
            name,
            format!("{len} bytes is not a whole number of {sample_bytes}-byte samples"),
        ));
    }
    let cells = len / sample_bytes;
    let res = (cells as f64).sqrt().round() as usize;
    if res * res != cells {
        return Err(malformed(name, format!("{cells} samples do not form a square")));
    }
    Ok(res)
}

// ---------------------------------------------------------------------------
// Heightmaps
// ---------------------------------------------------------------------------

/// Decodes a `u16` heightmap into normalised heights.
pub fn decode_heights(name: &str, bytes: &[u8]) -> Result<Heightfield, WorldError> {
    let res = square_resolution(name, bytes.len(), 2)?;
    let data = bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]) as f32 / u16::MAX as f32)
        .collect();
    Ok(Heightfield::from_vec(res, res, data)?)
}

/// Encodes normalised heights as `u16`, clamping to `[0, 1]`.
pub fn encode_heights(field: &Heightfield) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.as_slice().len() * 2);
    for h in field.as_slice() {
        let sample = (h.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16;
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

// ---------------------------------------------------------------------------
// Splat maps
// ---------------------------------------------------------------------------

/// Decodes a channel-major `u8` splat map with `channels` textures.
///
/// Each cell is renormalised; a cell with no weight at all becomes fully
/// texture 0.
pub fn decode_splat(name: &str, bytes: &[u8], channels: usize) -> Result<RasterLayer, WorldError> {
    let res = square_resolution(name, bytes.len(), channels)?;
    let plane = res * res;
    let mut raster = RasterLayer::zeroed(res, res, channels);
    for (row, col, cell) in raster.cells_mut() {
        let offset = row * res + col;
        for (k, weight) in cell.iter_mut().enumerate() {
            *weight = bytes[k * plane + offset] as f32 / 255.0;
        }
        let sum: f32 = cell.iter().sum();
        if sum > 0.0 {
            for weight in cell.iter_mut() {
                *weight /= sum;
            }
        } else {
            cell[0] = 1.0;
        }
    }
    Ok(raster)
}

/// Encodes a splat raster channel-major, quantising weights to bytes.
pub fn encode_splat(raster: &RasterLayer) -> Vec<u8> {
    let (rows, cols, channels) = (raster.rows(), raster.cols(), raster.channels());
    let plane = rows * cols;
    let mut out = vec![0u8; plane * channels];
    for row in 0..rows {
        for col in 0..cols {
            for (k, weight) in raster.cell(row, col).iter().enumerate() {
                out[k * plane + row * cols + col] = (weight.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Alpha
// ---------------------------------------------------------------------------

/// Decodes the one-byte alpha map into an Active/Inactive raster.
pub fn decode_alpha(name: &str, bytes: &[u8]) -> Result<RasterLayer, WorldError> {
    let res = square_resolution(name, bytes.len(), 1)?;
    let mut raster = RasterLayer::zeroed(res, res, LayerKind::MISC_TEXTURES);
    for ((_, _, cell), byte) in raster.cells_mut().zip(bytes) {
        let texture = if *byte > 0 {
            MiscTexture::Active
        } else {
            MiscTexture::Inactive
        };
        cell[texture.index()] = 1.0;
    }
    Ok(raster)
}

/// Encodes an alpha raster: `255` where active, `0` elsewhere.
pub fn encode_alpha(raster: &RasterLayer) -> Vec<u8> {
    raster
        .as_slice()
        .chunks_exact(raster.channels().max(1))
        .map(|cell| if is_active(cell) { u8::MAX } else { 0 })
        .collect()
}

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

/// Decodes the `u32` topology bitmask into one raster per category.
pub fn decode_topology(name: &str, bytes: &[u8]) -> Result<Vec<RasterLayer>, WorldError> {
    let res = square_resolution(name, bytes.len(), 4)?;
    let inactive = RasterLayer::filled(
        res,
        res,
        LayerKind::MISC_TEXTURES,
        MiscTexture::Inactive.index(),
    )?;
    let mut layers = vec![inactive; TOPOLOGY_COUNT];
    for (i, b) in bytes.chunks_exact(4).enumerate() {
        let mask = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        if mask == 0 {
            continue;
        }
        let (row, col) = (i / res, i % res);
        for topology in Topology::from_mask(mask) {
            layers[topology.index()].paint_cell(row, col, MiscTexture::Active.index());
        }
    }
    Ok(layers)
}

/// Encodes per-category rasters into a `u32` bitmask per cell.
///
/// # Errors
///
/// [`WorldError::ResolutionMismatch`] if the rasters differ in size.
pub fn encode_topology(layers: &[RasterLayer]) -> Result<Vec<u8>, WorldError> {
    let Some(first) = layers.first() else {
        return Ok(Vec::new());
    };
    let (rows, cols) = (first.rows(), first.cols());
    let mut masks = vec![0u32; rows * cols];
    for (topology, raster) in Topology::ALL.iter().zip(layers) {
        if (raster.rows(), raster.cols()) != (rows, cols) {
            return Err(WorldError::ResolutionMismatch {
                name: LayerKind::Topology(*topology).to_string(),
                expected: rows,
                actual: raster.rows(),
            });
        }
        let cells = raster.as_slice().chunks_exact(raster.channels().max(1));
        for (mask, cell) in masks.iter_mut().zip(cells) {
            if is_active(cell) {
                *mask |= topology.bit();
            }
        }
    }
    Ok(masks.iter().flat_map(|m| m.to_le_bytes()).collect())
}

fn is_active(cell: &[f32]) -> bool {
    cell[MiscTexture::Active.index()] >= ACTIVE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: &str = "height";

    #[test]
    fn test_heights_quantise() {
        let field = Heightfield::from_rows(&[vec![0.0, 1.0], vec![0.5, 1.5]]).unwrap();
        let bytes = encode_heights(&field);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..2], &[0, 0]);
        assert_eq!(&bytes[2..4], &[0xFF, 0xFF]);
        // Out-of-range heights clamp.
        assert_eq!(&bytes[6..8], &[0xFF, 0xFF]);

        let decoded = decode_heights(HEIGHT, &bytes).unwrap();
        assert_eq!(decoded.rows(), 2);
        assert!((decoded.get(1, 0) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_non_square_rejected() {
        assert!(matches!(
            decode_heights(HEIGHT, &[0; 6]),
            Err(WorldError::MalformedMap { .. })
        ));
        assert!(matches!(
            decode_heights(HEIGHT, &[0; 5]),
            Err(WorldError::MalformedMap { .. })
        ));
        assert!(decode_splat("biome", &[0; 4 * 5], 4).is_err());
    }

    #[test]
    fn test_splat_is_channel_major() {
        // 2x2 cells, 2 channels. Channel 0 plane then channel 1 plane.
        let bytes = [255, 0, 0, 51, 0, 255, 255, 204];
        let raster = decode_splat("splat", &bytes, 2).unwrap();
        assert_eq!(raster.cell(0, 0), &[1.0, 0.0]);
        assert_eq!(raster.cell(0, 1), &[0.0, 1.0]);
        assert_eq!(raster.cell(1, 0), &[0.0, 1.0]);
        assert!((raster.get(1, 1, 0) - 0.2).abs() < 1e-6);
        assert_eq!(encode_splat(&raster), bytes);
    }

    #[test]
    fn test_splat_renormalises_and_fills_empty_cells() {
        let bytes = [100, 0, 100, 0];
        let raster = decode_splat("biome", &bytes, 4).unwrap();
        assert_eq!(raster.cell(0, 0), &[0.5, 0.0, 0.5, 0.0]);

        let empty = decode_splat("biome", &[0; 4], 4).unwrap();
        assert_eq!(empty.cell(0, 0), &[1.0, 0.0, 0.0, 0.0]);
        assert!(empty.is_normalized());
    }

    #[test]
    fn test_alpha() {
        let raster = decode_alpha("alpha", &[0, 255, 1, 0]).unwrap();
        assert_eq!(raster.cell(0, 0), &[0.0, 1.0]);
        assert_eq!(raster.cell(0, 1), &[1.0, 0.0]);
        assert_eq!(raster.cell(1, 0), &[1.0, 0.0]);
        assert_eq!(encode_alpha(&raster), vec![0, 255, 255, 0]);
    }

    #[test]
    fn test_topology_bitmask() {
        let beach_and_field = Topology::mask_of(&[Topology::Beach, Topology::Field]);
        let river = Topology::River.bit();
        let mut bytes = Vec::new();
        for mask in [beach_and_field, 0, river, 0] {
            bytes.extend_from_slice(&mask.to_le_bytes());
        }

        let layers = decode_topology("topology", &bytes).unwrap();
        assert_eq!(layers.len(), TOPOLOGY_COUNT);
        assert_eq!(layers[Topology::Beach.index()].cell(0, 0), &[1.0, 0.0]);
        assert_eq!(layers[Topology::Field.index()].cell(0, 0), &[1.0, 0.0]);
        assert_eq!(layers[Topology::River.index()].cell(1, 0), &[1.0, 0.0]);
        assert_eq!(layers[Topology::Beach.index()].cell(1, 0), &[0.0, 1.0]);

        assert_eq!(encode_topology(&layers).unwrap(), bytes);
    }

    #[test]
    fn test_topology_resolution_mismatch() {
        let a = RasterLayer::filled(2, 2, 2, 1).unwrap();
        let b = RasterLayer::filled(3, 3, 2, 1).unwrap();
        assert!(matches!(
            encode_topology(&[a, b]),
            Err(WorldError::ResolutionMismatch { .. })
        ));
    }
}
