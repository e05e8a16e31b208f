//! Quarter-turn rotation of rasters and heightfields.
//!
//! Rotation is only defined for square grids. For an `n x n` grid:
//! - clockwise: `new[i, j] = old[j, n - 1 - i]`
//! - counter-clockwise: `new[i, j] = old[n - 1 - j, i]`
//!
//! Every channel of a cell moves together.

use crate::error::LayerError;
use crate::heightfield::Heightfield;
use crate::raster::RasterLayer;

/// Rotation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// A quarter turn clockwise.
    Clockwise,
    /// A quarter turn counter-clockwise.
    CounterClockwise,
}

impl Rotation {
    /// `Clockwise` when `cw` is set.
    pub fn from_cw(cw: bool) -> Self {
        if cw {
            Rotation::Clockwise
        } else {
            Rotation::CounterClockwise
        }
    }

    /// The turn that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }

    /// Source cell `(row, col)` that lands at `(i, j)` in an `n x n` grid.
    #[inline]
    fn source(self, i: usize, j: usize, n: usize) -> (usize, usize) {
        match self {
            Rotation::Clockwise => (j, n - 1 - i),
            Rotation::CounterClockwise => (n - 1 - j, i),
        }
    }
}

fn check_square(rows: usize, cols: usize) -> Result<(), LayerError> {
    if rows == cols {
        Ok(())
    } else {
        Err(LayerError::NonSquare { rows, cols })
    }
}

/// Rotates a raster by a quarter turn.
///
/// # Errors
///
/// [`LayerError::NonSquare`] if the raster is not square.
pub fn rotate_raster(raster: &RasterLayer, rotation: Rotation) -> Result<RasterLayer, LayerError> {
    check_square(raster.rows(), raster.cols())?;
    let n = raster.rows();
    let mut out = RasterLayer::zeroed(n, n, raster.channels());
    for (i, j, cell) in out.cells_mut() {
        let (r, c) = rotation.source(i, j, n);
        cell.copy_from_slice(raster.cell(r, c));
    }
    Ok(out)
}

/// Rotates a heightfield by a quarter turn.
///
/// # Errors
///
/// [`LayerError::NonSquare`] if the grid is not square.
pub fn rotate_heightfield(
    field: &Heightfield,
    rotation: Rotation,
) -> Result<Heightfield, LayerError> {
    check_square(field.rows(), field.cols())?;
    let n = field.rows();
    let mut out = Heightfield::new(n, n, 0.0);
    for i in 0..n {
        for j in 0..n {
            let (r, c) = rotation.source(i, j, n);
            out.set(i, j, field.get(r, c));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Heightfield {
        Heightfield::from_vec(n, n, (0..n * n).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn test_inverse_undoes_a_turn() {
        let field = numbered(4);
        for rotation in [Rotation::Clockwise, Rotation::CounterClockwise] {
            let turned = rotate_heightfield(&field, rotation).unwrap();
            assert_eq!(rotate_heightfield(&turned, rotation.inverse()).unwrap(), field);
        }
    }

    #[test]
    fn test_clockwise_index_mapping() {
        // 0 1 2        2 5 8
        // 3 4 5   ->   1 4 7
        // 6 7 8        0 3 6
        let rotated = rotate_heightfield(&numbered(3), Rotation::Clockwise).unwrap();
        assert_eq!(
            rotated.as_slice(),
            &[2.0, 5.0, 8.0, 1.0, 4.0, 7.0, 0.0, 3.0, 6.0]
        );
    }

    #[test]
    fn test_counter_clockwise_index_mapping() {
        let rotated = rotate_heightfield(&numbered(3), Rotation::CounterClockwise).unwrap();
        assert_eq!(
            rotated.as_slice(),
            &[6.0, 3.0, 0.0, 7.0, 4.0, 1.0, 8.0, 5.0, 2.0]
        );
    }

    #[test]
    fn test_raster_channels_move_together() {
        let mut raster = RasterLayer::filled(2, 2, 2, 1).unwrap();
        raster.paint_cell(0, 0, 0);
        let rotated = rotate_raster(&raster, Rotation::Clockwise).unwrap();
        // Top-left moves to bottom-left under new[i, j] = old[j, n - 1 - i].
        assert_eq!(rotated.cell(1, 0), &[1.0, 0.0]);
        assert_eq!(rotated.cell(0, 0), &[0.0, 1.0]);
    }

    #[test]
    fn test_non_square_rejected() {
        let raster = RasterLayer::filled(2, 3, 2, 0).unwrap();
        assert_eq!(
            rotate_raster(&raster, Rotation::Clockwise),
            Err(LayerError::NonSquare { rows: 2, cols: 3 })
        );
        let field = Heightfield::new(1, 2, 0.5);
        assert!(rotate_heightfield(&field, Rotation::CounterClockwise).is_err());
    }
}
