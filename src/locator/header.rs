//! Header gutter lookup by spatial overlap.
//!
//! Header cells carry no stable identifier, so the lookup scans every element
//! under the header container and scores it against the active cell. This is
//! a best-effort approximation tuned per host layout: overlap with the active
//! cell on the header's axis is the primary score, proximity to the sheet
//! edge breaks ties, and the narrower element wins after that. When nothing
//! qualifies the highlight falls back to a band just outside the sheet
//! container, sized from the active cell.

use serde::{Deserialize, Serialize};

use crate::types::{HeaderAxis, HeaderHighlight, PageRect};

/// Constants for the header heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderTuning {
    /// Overlaps (and proximities) closer than this are considered equal.
    pub tie_epsilon: f64,
    /// Candidates further than this from the sheet edge are ignored.
    pub max_proximity: f64,
    /// Height of the fallback column-header band, before capping to the active cell.
    pub fallback_thickness: f64,
    /// Width of the row-number gutter, used by the fallback row-header band.
    pub row_gutter_width: f64,
}

impl Default for HeaderTuning {
    fn default() -> Self {
        Self {
            tie_epsilon: 0.5,
            max_proximity: 48.0,
            fallback_thickness: 24.0,
            row_gutter_width: 46.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    rect: PageRect,
    overlap: f64,
    proximity: f64,
    /// Candidate extent on the overlap axis
    span: f64,
}

impl Scored {
    fn beats(&self, other: &Self, epsilon: f64) -> bool {
        if (self.overlap - other.overlap).abs() > epsilon {
            return self.overlap > other.overlap;
        }
        if (self.proximity - other.proximity).abs() > epsilon {
            return self.proximity < other.proximity;
        }
        self.span < other.span
    }
}

/// Distance from a candidate's inner edge to the sheet edge it borders.
fn proximity(candidate: &PageRect, sheet: &PageRect, axis: HeaderAxis) -> f64 {
    match axis {
        HeaderAxis::Column => (sheet.y - candidate.bottom()).abs(),
        HeaderAxis::Row => (sheet.x - candidate.right()).abs(),
    }
}

/// Best header element for the active cell, or `None` when no candidate qualifies.
///
/// The returned highlight spans the active cell on the header axis and the
/// chosen element on the other axis.
pub fn locate_header(
    candidates: &[PageRect],
    cell: &PageRect,
    sheet: &PageRect,
    axis: HeaderAxis,
    tuning: &HeaderTuning,
) -> Option<PageRect> {
    let overlap_axis = axis.overlap_axis();

    let best = candidates
        .iter()
        .filter(|candidate| !candidate.is_degenerate())
        .filter_map(|candidate| {
            let scored = Scored {
                rect: *candidate,
                overlap: candidate.overlap(cell, overlap_axis),
                proximity: proximity(candidate, sheet, axis),
                span: candidate.extent(overlap_axis),
            };
            (scored.overlap > 0.0 && scored.proximity <= tuning.max_proximity).then_some(scored)
        })
        .reduce(|best, next| {
            if next.beats(&best, tuning.tie_epsilon) {
                next
            } else {
                best
            }
        })?;

    Some(match axis {
        HeaderAxis::Column => PageRect::new(cell.x, best.rect.y, cell.width, best.rect.height),
        HeaderAxis::Row => PageRect::new(best.rect.x, cell.y, best.rect.width, cell.height),
    })
}

/// Container-relative band used when no header element qualifies.
pub fn fallback_header(
    cell: &PageRect,
    sheet: &PageRect,
    axis: HeaderAxis,
    tuning: &HeaderTuning,
) -> PageRect {
    match axis {
        HeaderAxis::Column => {
            let height = tuning.fallback_thickness.min(cell.height);
            PageRect::new(cell.x, sheet.y - height, cell.width, height)
        }
        HeaderAxis::Row => {
            let width = tuning.row_gutter_width;
            PageRect::new(sheet.x - width, cell.y, width, cell.height)
        }
    }
}

/// Header highlight for one gutter, falling back when the lookup fails.
///
/// `candidates` is `None` when the header container itself is missing.
pub fn header_highlight(
    candidates: Option<&[PageRect]>,
    cell: &PageRect,
    sheet: &PageRect,
    axis: HeaderAxis,
    tuning: &HeaderTuning,
) -> HeaderHighlight {
    let rect = candidates
        .and_then(|candidates| locate_header(candidates, cell, sheet, axis, tuning))
        .unwrap_or_else(|| {
            tracing::trace!(?axis, "header lookup fell back to container band");
            fallback_header(cell, sheet, axis, tuning)
        });
    HeaderHighlight { axis, rect }
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

    fn sheet() -> PageRect {
        PageRect::new(46.0, 144.0, 1200.0, 700.0)
    }

    /// Active cell C3 on a 100x21 grid.
    fn cell() -> PageRect {
        PageRect::new(246.0, 186.0, 100.0, 21.0)
    }

    fn column_headers() -> Vec<PageRect> {
        (0..6)
            .map(|i| PageRect::new(46.0 + f64::from(i) * 100.0, 120.0, 100.0, 24.0))
            .collect()
    }

    #[test]
    fn picks_column_header_over_active_cell() {
        let tuning = HeaderTuning::default();
        let rect =
            locate_header(&column_headers(), &cell(), &sheet(), HeaderAxis::Column, &tuning).unwrap();
        assert_eq!(rect, PageRect::new(246.0, 120.0, 100.0, 24.0));
    }

    #[test]
    fn strip_background_loses_tie_to_narrower_cell() {
        let mut candidates = vec![PageRect::new(46.0, 120.0, 1200.0, 24.0)];
        candidates.extend(column_headers());
        let tuning = HeaderTuning::default();
        let rect =
            locate_header(&candidates, &cell(), &sheet(), HeaderAxis::Column, &tuning).unwrap();
        assert_eq!(rect.y, 120.0);
        assert_eq!(rect.height, 24.0);
    }

    #[test]
    fn nearer_candidate_wins_equal_overlap() {
        // A frozen-pane duplicate header further up the page overlaps just as much.
        let far = PageRect::new(246.0, 80.0, 100.0, 18.0);
        let near = PageRect::new(246.0, 121.0, 100.0, 22.0);
        let tuning = HeaderTuning::default();
        let rect =
            locate_header(&[far, near], &cell(), &sheet(), HeaderAxis::Column, &tuning).unwrap();
        assert_eq!((rect.y, rect.height), (121.0, 22.0));
    }

    #[test]
    fn larger_overlap_beats_proximity() {
        let sliver = PageRect::new(340.0, 120.0, 100.0, 24.0);
        let main = PageRect::new(240.0, 100.0, 100.0, 24.0);
        let tuning = HeaderTuning::default();
        let rect =
            locate_header(&[sliver, main], &cell(), &sheet(), HeaderAxis::Column, &tuning).unwrap();
        assert_eq!(rect.y, 100.0);
    }

    #[test]
    fn row_header_spans_cell_height() {
        let rows: Vec<PageRect> = (0..10)
            .map(|i| PageRect::new(0.0, 144.0 + f64::from(i) * 21.0, 46.0, 21.0))
            .collect();
        let tuning = HeaderTuning::default();
        let rect = locate_header(&rows, &cell(), &sheet(), HeaderAxis::Row, &tuning).unwrap();
        assert_eq!(rect, PageRect::new(0.0, 186.0, 46.0, 21.0));
    }

    #[test]
    fn no_overlap_means_no_candidate() {
        let candidates = [PageRect::new(900.0, 120.0, 100.0, 24.0)];
        let tuning = HeaderTuning::default();
        assert!(locate_header(&candidates, &cell(), &sheet(), HeaderAxis::Column, &tuning).is_none());
    }

    #[test]
    fn fallback_caps_column_band_at_cell_height() {
        let tuning = HeaderTuning::default();
        let short_cell = PageRect::new(246.0, 186.0, 100.0, 12.0);
        let highlight = header_highlight(None, &short_cell, &sheet(), HeaderAxis::Column, &tuning);
        assert_eq!(highlight.rect, PageRect::new(246.0, 132.0, 100.0, 12.0));

        let highlight = header_highlight(Some(&[][..]), &cell(), &sheet(), HeaderAxis::Row, &tuning);
        assert_eq!(highlight.rect, PageRect::new(0.0, 186.0, 46.0, 21.0));
    }
}
