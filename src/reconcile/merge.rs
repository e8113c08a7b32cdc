use crate::types::{Axis, Frame, Rect};

/// Merge rectangles that overlap or touch on `axis` into bands.
///
/// Sorts by start on `axis` and sweeps once; a rectangle whose start lies at
/// or before the running band's end extends that band to the union's extent.
/// The output is sorted, pairwise non-overlapping on `axis`, and covers the
/// same union of extents as the input. Cross-axis fields come from the first
/// rectangle of each band.
pub fn merge_adjacent<F: Frame>(rects: &[Rect<F>], axis: Axis) -> Vec<Rect<F>> {
    let mut sorted = rects.to_vec();
    sorted.sort_by(|a, b| a.start(axis).total_cmp(&b.start(axis)));

    let mut merged: Vec<Rect<F>> = Vec::with_capacity(sorted.len());
    for rect in sorted {
        match merged.last_mut() {
            Some(band) if rect.start(axis) <= band.end(axis) => {
                let start = band.start(axis);
                let end = band.end(axis).max(rect.end(axis));
                *band = band.with_extent(axis, start, end - start);
            }
            _ => merged.push(rect),
        }
    }
    merged
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

    #[test]
    fn empty_input_yields_no_bands() {
        assert!(merge_adjacent::<crate::types::GridLocal>(&[], Axis::Y).is_empty());
    }

    #[test]
    fn touching_rows_merge_into_one_band() {
        let rects = [
            GridRect::new(0.0, 21.0, 100.0, 21.0),
            GridRect::new(0.0, 0.0, 100.0, 21.0),
        ];
        let bands = merge_adjacent(&rects, Axis::Y);
        assert_eq!(bands.len(), 1);
        assert_eq!((bands[0].y, bands[0].height), (0.0, 42.0));
    }

    #[test]
    fn contained_rect_does_not_shrink_band() {
        let rects = [
            GridRect::new(0.0, 0.0, 50.0, 100.0),
            GridRect::new(0.0, 10.0, 50.0, 5.0),
        ];
        let bands = merge_adjacent(&rects, Axis::Y);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].height, 100.0);
    }

    #[test]
    fn gap_starts_new_band() {
        let rects = [
            GridRect::new(0.0, 0.0, 10.0, 10.0),
            GridRect::new(11.0, 0.0, 10.0, 10.0),
        ];
        let bands = merge_adjacent(&rects, Axis::X);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1].x, 11.0);
    }

    #[test]
    fn merge_axis_ignores_cross_axis_position() {
        // Two cells in the same row but different columns collapse into one row band.
        let rects = [
            GridRect::new(0.0, 42.0, 100.0, 21.0),
            GridRect::new(300.0, 42.0, 100.0, 21.0),
        ];
        assert_eq!(merge_adjacent(&rects, Axis::Y).len(), 1);
        assert_eq!(merge_adjacent(&rects, Axis::X).len(), 2);
    }
}
