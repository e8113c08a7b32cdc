use crate::types::{Axis, Frame, Rect, Size};

use super::group::group_by_overlap;

/// Pixel margin absorbing sub-pixel and rounding noise from the host layout engine.
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// Positions are whole pixels after ceiling; anything closer than this is the same line.
const SAME_LINE_EPSILON: f64 = 0.5;

/// Union extent of a group on `axis`.
fn union_extent<F: Frame>(group: &[Rect<F>], axis: Axis) -> f64 {
    let start = group
        .iter()
        .map(|r| r.start(axis))
        .fold(f64::INFINITY, f64::min);
    let end = group
        .iter()
        .map(|r| r.end(axis))
        .fold(f64::NEG_INFINITY, f64::max);
    if start.is_finite() && end.is_finite() {
        end - start
    } else {
        0.0
    }
}

/// Whether the fragment set, taken together, selects an entire row or column.
///
/// Fragments are grouped transitively by vertical overlap; any row group whose
/// union spans the sheet width (minus `tolerance`) is a full row. Column
/// groups are checked the same way against the sheet height.
pub fn is_full_row_or_column<F: Frame>(rects: &[Rect<F>], sheet: Size, tolerance: f64) -> bool {
    if rects.is_empty() {
        return false;
    }

    let full_row = group_by_overlap(rects, Axis::Y, tolerance)
        .iter()
        .any(|group| union_extent(group, Axis::X) >= sheet.width - tolerance);
    if full_row {
        return true;
    }

    group_by_overlap(rects, Axis::X, tolerance)
        .iter()
        .any(|group| union_extent(group, Axis::Y) >= sheet.height - tolerance)
}

/// Fragments that on their own span the full sheet width or height.
pub fn full_span_fragments<F: Frame>(rects: &[Rect<F>], sheet: Size, tolerance: f64) -> Vec<Rect<F>> {
    rects
        .iter()
        .filter(|r| r.width >= sheet.width - tolerance || r.height >= sheet.height - tolerance)
        .copied()
        .collect()
}

fn same_line(a: f64, b: f64) -> bool {
    (a - b).abs() < SAME_LINE_EPSILON
}

/// Drop every fragment sitting on the same row (or column) as a full-span fragment.
///
/// A full span wider than tall is a row: fragments with the same `y` and
/// `height` are removed. Otherwise it is a column and fragments with the same
/// `x` and `width` are removed. The full-span fragments themselves match and
/// are removed as well.
pub fn exclude_full_span_duplicates<F: Frame>(rects: &[Rect<F>], full: &[Rect<F>]) -> Vec<Rect<F>> {
    rects
        .iter()
        .filter(|rect| {
            !full.iter().any(|span| {
                if span.height < span.width {
                    same_line(rect.y, span.y) && same_line(rect.height, span.height)
                } else {
                    same_line(rect.x, span.x) && same_line(rect.width, span.width)
                }
            })
        })
        .copied()
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::GridRect;

    const SHEET: Size = Size {
        width: 1000.0,
        height: 600.0,
    };

    #[test]
    fn adjacent_fragments_spanning_width_are_a_full_row() {
        // Shift+Space on a sheet with a frozen column: the row arrives as two fragments.
        let rects = [
            GridRect::new(0.0, 42.0, 120.0, 21.0),
            GridRect::new(120.0, 42.0, 880.0, 21.0),
        ];
        assert!(is_full_row_or_column(&rects, SHEET, DEFAULT_TOLERANCE));
    }

    #[test]
    fn stacked_fragments_spanning_height_are_a_full_column() {
        let rects = [
            GridRect::new(200.0, 0.0, 100.0, 300.0),
            GridRect::new(200.0, 301.0, 100.0, 299.0),
        ];
        assert!(is_full_row_or_column(&rects, SHEET, DEFAULT_TOLERANCE));
    }

    #[test]
    fn block_selection_is_not_full() {
        let rects = [GridRect::new(100.0, 100.0, 400.0, 200.0)];
        assert!(!is_full_row_or_column(&rects, SHEET, DEFAULT_TOLERANCE));
    }

    #[test]
    fn tolerance_accepts_span_short_by_rounding() {
        let rects = [GridRect::new(0.0, 0.0, 998.5, 21.0)];
        assert!(is_full_row_or_column(&rects, SHEET, DEFAULT_TOLERANCE));
        assert!(!is_full_row_or_column(&rects, SHEET, 0.0));
    }

    #[test]
    fn empty_set_is_not_full() {
        assert!(!is_full_row_or_column::<crate::types::GridLocal>(
            &[],
            SHEET,
            DEFAULT_TOLERANCE
        ));
    }

    #[test]
    fn full_width_fragment_removes_its_row_mates() {
        let row = GridRect::new(0.0, 42.0, 1000.0, 21.0);
        let same_row = GridRect::new(300.0, 42.0, 100.0, 21.0);
        let other = GridRect::new(300.0, 84.0, 100.0, 21.0);
        let rects = [row, same_row, other];

        let full = full_span_fragments(&rects, SHEET, DEFAULT_TOLERANCE);
        assert_eq!(full, vec![row]);

        let kept = exclude_full_span_duplicates(&rects, &full);
        assert_eq!(kept, vec![other]);
    }

    #[test]
    fn full_height_fragment_removes_its_column_mates() {
        let column = GridRect::new(200.0, 0.0, 100.0, 600.0);
        let same_column = GridRect::new(200.0, 300.0, 100.0, 21.0);
        let other = GridRect::new(500.0, 300.0, 100.0, 21.0);
        let rects = [column, same_column, other];

        let full = full_span_fragments(&rects, SHEET, DEFAULT_TOLERANCE);
        let kept = exclude_full_span_duplicates(&rects, &full);
        assert_eq!(kept, vec![other]);
    }
}
