//! Heightfield algorithms.
//!
//! All functions take normalised heights and return a new grid; the input is
//! never modified. Conversions from metres happen in the editor session.

use crate::area::AreaSelector;
use crate::error::LayerError;
use crate::heightfield::Heightfield;

/// Which borders [`set_edge_pixels`] writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeSides {
    /// Row 0.
    pub top: bool,
    /// Last column.
    pub right: bool,
    /// Last row.
    pub bottom: bool,
    /// Column 0.
    pub left: bool,
}

impl EdgeSides {
    /// Every side.
    pub const ALL: EdgeSides = EdgeSides {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };
}

/// `1 - h` for every sample.
pub fn invert(field: &Heightfield) -> Heightfield {
    map(field, |h| 1.0 - h)
}

/// `1 - h` inside `area` only.
pub fn invert_area(field: &Heightfield, area: AreaSelector) -> Heightfield {
    map_area(field, area, |h| 1.0 - h)
}

/// Sets every sample inside `area` to `value`.
pub fn set_values(field: &Heightfield, value: f32, area: AreaSelector) -> Heightfield {
    map_area(field, area, |_| value)
}

/// Linearly remaps the grid from its own `[min, max]` onto `[low, high]`.
///
/// A flat grid has no range to remap and is returned unchanged.
pub fn normalize(field: &Heightfield, low: f32, high: f32) -> Heightfield {
    let Some((min, max)) = field.min_max() else {
        return field.clone();
    };
    let range = max - min;
    if range <= 0.0 {
        tracing::warn!(min, "Normalise skipped: heightfield is flat");
        return field.clone();
    }
    let scale = (high - low) / range;
    map(field, |h| low + (h - min) * scale)
}

/// Adds `delta` to every sample.
///
/// With `check` set the offset is all-or-nothing: if any sample would leave
/// `[0, 1]` the first offender is reported and no grid is produced. Without
/// it, samples are clamped into range.
pub fn offset(field: &Heightfield, delta: f32, check: bool) -> Result<Heightfield, LayerError> {
    if check {
        check_offset(field, delta)?;
        Ok(map(field, |h| h + delta))
    } else {
        Ok(map(field, |h| (h + delta).clamp(0.0, 1.0)))
    }
}

/// Offsets several grids as one operation. With `check` set, either every
/// grid is offset or none is.
pub fn offset_all(
    fields: &[&Heightfield],
    delta: f32,
    check: bool,
) -> Result<Vec<Heightfield>, LayerError> {
    if check {
        for field in fields {
            check_offset(field, delta)?;
        }
    }
    fields.iter().map(|f| offset(f, delta, check)).collect()
}

fn check_offset(field: &Heightfield, delta: f32) -> Result<(), LayerError> {
    let cols = field.cols().max(1);
    for (i, h) in field.as_slice().iter().enumerate() {
        let value = h + delta;
        if !(0.0..=1.0).contains(&value) {
            return Err(LayerError::OutOfRange {
                row: i / cols,
                col: i % cols,
                value,
            });
        }
    }
    Ok(())
}

/// Raises every sample below `threshold` to `threshold`.
pub fn set_minimum(field: &Heightfield, threshold: f32) -> Heightfield {
    map(field, |h| h.max(threshold))
}

/// Lowers every sample above `threshold` to `threshold`.
pub fn set_maximum(field: &Heightfield, threshold: f32) -> Heightfield {
    map(field, |h| h.min(threshold))
}

/// Sets the selected border rows and columns to `value`.
pub fn set_edge_pixels(field: &Heightfield, value: f32, sides: EdgeSides) -> Heightfield {
    let mut out = field.clone();
    let (rows, cols) = (field.rows(), field.cols());
    if rows == 0 || cols == 0 {
        return out;
    }
    for col in 0..cols {
        if sides.top {
            out.set(0, col, value);
        }
        if sides.bottom {
            out.set(rows - 1, col, value);
        }
    }
    for row in 0..rows {
        if sides.left {
            out.set(row, 0, value);
        }
        if sides.right {
            out.set(row, cols - 1, value);
        }
    }
    out
}

/// Raises water below `minimum` up to it. Used to give a map a sea level.
pub fn raise_water_level(water: &Heightfield, minimum: f32) -> Heightfield {
    set_minimum(water, minimum)
}

fn map(field: &Heightfield, f: impl Fn(f32) -> f32) -> Heightfield {
    let mut out = field.clone();
    for h in out.as_mut_slice() {
        *h = f(*h);
    }
    out
}

fn map_area(field: &Heightfield, area: AreaSelector, f: impl Fn(f32) -> f32) -> Heightfield {
    let mut out = field.clone();
    let (rows, cols) = area.clamped(field.rows(), field.cols());
    for row in rows {
        for col in cols.clone() {
            out.set(row, col, f(field.get(row, col)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn grid(rows: &[&[f32]]) -> Heightfield {
        Heightfield::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    fn assert_close(actual: &Heightfield, expected: &[f32]) {
        assert_eq!(actual.as_slice().len(), expected.len());
        for (a, e) in actual.as_slice().iter().zip(expected) {
            assert!((a - e).abs() < EPSILON, "{a} != {e}");
        }
    }

    #[test]
    fn test_invert() {
        let field = grid(&[&[0.0, 0.25], &[0.5, 1.0]]);
        assert_close(&invert(&field), &[1.0, 0.75, 0.5, 0.0]);
    }

    #[test]
    fn test_invert_area_leaves_outside_alone() {
        let field = Heightfield::new(2, 2, 0.2);
        let inverted = invert_area(&field, AreaSelector::new(1, 2, 0, 2));
        assert_close(&inverted, &[0.2, 0.8, 0.2, 0.8]);
    }

    #[test]
    fn test_normalize_scenario() {
        let field = grid(&[&[0.2, 0.4], &[0.6, 0.8]]);
        let normalized = normalize(&field, 0.0, 1.0);
        assert_close(&normalized, &[0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn test_normalize_flat_is_noop() {
        let field = Heightfield::new(3, 3, 0.4);
        assert_eq!(normalize(&field, 0.0, 1.0), field);
    }

    #[test]
    fn test_offset_unchecked_clamps() {
        let field = grid(&[&[0.1, 0.95]]);
        let shifted = offset(&field, 0.1, false).unwrap();
        assert_close(&shifted, &[0.2, 1.0]);
    }

    #[test]
    fn test_offset_checked_rejects_and_reports_first_offender() {
        let field = grid(&[&[0.1, 0.2], &[0.95, 0.3]]);
        let err = offset(&field, 0.1, true).unwrap_err();
        match err {
            LayerError::OutOfRange { row, col, value } => {
                assert_eq!((row, col), (1, 0));
                assert!((value - 1.05).abs() < EPSILON);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_offset_all_is_atomic() {
        let land = Heightfield::new(2, 2, 0.5);
        let water = Heightfield::new(2, 2, 0.95);
        assert!(offset_all(&[&land, &water], 0.1, true).is_err());

        let shifted = offset_all(&[&land, &water], -0.1, true).unwrap();
        assert_close(&shifted[0], &[0.4; 4]);
        assert_close(&shifted[1], &[0.85; 4]);
    }

    #[test]
    fn test_set_minimum_and_maximum() {
        let field = grid(&[&[0.1, 0.5, 0.9]]);
        assert_close(&set_minimum(&field, 0.5), &[0.5, 0.5, 0.9]);
        assert_close(&set_maximum(&field, 0.5), &[0.1, 0.5, 0.5]);
    }

    #[test]
    fn test_set_values_in_area() {
        let field = Heightfield::new(3, 3, 0.0);
        let set = set_values(&field, 1.0, AreaSelector::new(0, 1, 1, 3));
        assert_close(&set, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_set_edge_pixels() {
        let field = Heightfield::new(3, 3, 0.5);
        let edged = set_edge_pixels(
            &field,
            0.0,
            EdgeSides {
                top: true,
                left: true,
                ..Default::default()
            },
        );
        assert_close(&edged, &[0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.5, 0.5]);

        let all = set_edge_pixels(&field, 1.0, EdgeSides::ALL);
        assert_eq!(all.get(1, 1), 0.5);
        assert_eq!(all.get(2, 2), 1.0);
        assert_eq!(all.get(1, 2), 1.0);
    }

    #[test]
    fn test_raise_water_level() {
        let water = grid(&[&[0.3, 0.6]]);
        assert_close(&raise_water_level(&water, 0.5), &[0.5, 0.6]);
    }
}
