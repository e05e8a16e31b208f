//! Rectangular selections in raster space.

use std::ops::Range;

/// A rectangle of cells, `x` along columns and `z` along rows.
///
/// Bounds are half-open: `x0..x1` and `z0..z1`. Selections are clamped to the
/// raster before use, so oversized or negative bounds are harmless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaSelector {
    /// First column.
    pub x0: i64,
    /// One past the last column.
    pub x1: i64,
    /// First row.
    pub z0: i64,
    /// One past the last row.
    pub z1: i64,
}

impl AreaSelector {
    /// A selection from `(x0, x1, z0, z1)`.
    pub const fn new(x0: i64, x1: i64, z0: i64, z1: i64) -> Self {
        Self { x0, x1, z0, z1 }
    }

    /// A selection covering a whole `rows x cols` raster.
    pub fn full(rows: usize, cols: usize) -> Self {
        Self::new(0, cols as i64, 0, rows as i64)
    }

    /// Row and column ranges after clamping to a `rows x cols` raster.
    ///
    /// Inverted bounds yield empty ranges.
    pub fn clamped(&self, rows: usize, cols: usize) -> (Range<usize>, Range<usize>) {
        let clamp = |v: i64, len: usize| v.clamp(0, len as i64) as usize;
        let z0 = clamp(self.z0, rows);
        let z1 = clamp(self.z1, rows).max(z0);
        let x0 = clamp(self.x0, cols);
        let x1 = clamp(self.x1, cols).max(x0);
        (z0..z1, x0..x1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_inside() {
        let (rows, cols) = AreaSelector::new(1, 3, 1, 3).clamped(4, 4);
        assert_eq!(rows, 1..3);
        assert_eq!(cols, 1..3);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let (rows, cols) = AreaSelector::new(-5, 100, 2, 50).clamped(4, 8);
        assert_eq!(rows, 2..4);
        assert_eq!(cols, 0..8);
    }

    #[test]
    fn test_inverted_is_empty() {
        let (rows, cols) = AreaSelector::new(3, 1, 0, 4).clamped(4, 4);
        assert!(cols.is_empty());
        assert_eq!(rows, 0..4);
    }

    #[test]
    fn test_full() {
        assert_eq!(AreaSelector::full(2, 5), AreaSelector::new(0, 5, 0, 2));
    }
}
