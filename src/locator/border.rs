//! Active cell geometry from the four border indicators the host draws around it.

use serde::{Deserialize, Serialize};

use crate::types::PageRect;

/// Which line of each border indicator counts as the cell edge.
///
/// Only pixel alignment depends on this choice. Hosts that draw the
/// indicator outside the cell want `InnerEdge`; hosts that center it on the
/// grid line want `CenterLine`, which keeps the band on the grid line however
/// thick the indicator is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeConvention {
    /// Inner edge of each border (left border's right edge, and so on)
    #[default]
    InnerEdge,
    /// Center line of each border
    CenterLine,
}

fn pick(rects: &[PageRect], better: impl Fn(&PageRect, &PageRect) -> bool) -> Option<PageRect> {
    rects
        .iter()
        .copied()
        .reduce(|best, rect| if better(&rect, &best) { rect } else { best })
}

/// Compute the active cell from exactly four border rectangles (browser frame).
///
/// Borders are split into horizontal (`width >= height`) and vertical
/// (`height > width`) groups. With at least two of each, the top/bottom
/// edges come from the horizontal group and left/right from the vertical
/// group; otherwise all four extremes are taken over the whole set, which
/// copes with zoom levels where the host reports square or collapsed borders.
/// Returns `None` unless exactly four borders are given.
pub fn active_rect_from_borders(
    borders: &[PageRect],
    convention: EdgeConvention,
) -> Option<PageRect> {
    if borders.len() != 4 {
        return None;
    }

    let horizontal: Vec<PageRect> = borders
        .iter()
        .copied()
        .filter(PageRect::is_horizontal)
        .collect();
    let vertical: Vec<PageRect> = borders
        .iter()
        .copied()
        .filter(|r| r.height > r.width)
        .collect();

    let split = horizontal.len() >= 2 && vertical.len() >= 2;
    let (rows, cols): (&[PageRect], &[PageRect]) = if split {
        (horizontal.as_slice(), vertical.as_slice())
    } else {
        (borders, borders)
    };

    let top = pick(rows, |a, b| a.y < b.y)?;
    let bottom = pick(rows, |a, b| a.bottom() > b.bottom())?;
    let left = pick(cols, |a, b| a.x < b.x)?;
    let right = pick(cols, |a, b| a.right() > b.right())?;

    let (left_line, top_line, right_line, bottom_line) = match convention {
        EdgeConvention::InnerEdge => (left.right(), top.bottom(), right.x, bottom.y),
        EdgeConvention::CenterLine => (
            left.center_x(),
            top.center_y(),
            right.center_x(),
            bottom.center_y(),
        ),
    };

    Some(PageRect::from_edges(left_line, top_line, right_line, bottom_line))
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

    /// Borders of thickness `t` drawn just outside the cell `(x, y, w, h)`.
    fn outside_borders(x: f64, y: f64, w: f64, h: f64, t: f64) -> Vec<PageRect> {
        vec![
            PageRect::new(x - t, y - t, w + 2.0 * t, t),
            PageRect::new(x - t, y + h, w + 2.0 * t, t),
            PageRect::new(x - t, y, t, h),
            PageRect::new(x + w, y, t, h),
        ]
    }

    /// Borders of thickness `t` centered on the cell's grid lines.
    fn centered_borders(x: f64, y: f64, w: f64, h: f64, t: f64) -> Vec<PageRect> {
        let half = t / 2.0;
        vec![
            PageRect::new(x - half, y - half, w + t, t),
            PageRect::new(x - half, y + h - half, w + t, t),
            PageRect::new(x - half, y - half, t, h + t),
            PageRect::new(x + w - half, y - half, t, h + t),
        ]
    }

    #[test]
    fn inner_edges_recover_cell_exactly() {
        let borders = outside_borders(0.0, 0.0, 20.0, 15.0, 2.0);
        let rect = active_rect_from_borders(&borders, EdgeConvention::InnerEdge).unwrap();
        assert!(rect.approx_eq(&PageRect::new(0.0, 0.0, 20.0, 15.0), 1e-9));
    }

    #[test]
    fn center_lines_recover_cell_exactly() {
        let borders = centered_borders(0.0, 0.0, 20.0, 15.0, 3.0);
        let rect = active_rect_from_borders(&borders, EdgeConvention::CenterLine).unwrap();
        assert!(rect.approx_eq(&PageRect::new(0.0, 0.0, 20.0, 15.0), 1e-9));
    }

    #[test]
    fn conventions_differ_by_at_most_border_thickness() {
        let borders = outside_borders(10.0, 10.0, 20.0, 15.0, 2.0);
        let inner = active_rect_from_borders(&borders, EdgeConvention::InnerEdge).unwrap();
        let center = active_rect_from_borders(&borders, EdgeConvention::CenterLine).unwrap();
        assert!(inner.approx_eq(&center, 2.0));
    }

    #[test]
    fn order_of_borders_does_not_matter() {
        let mut borders = outside_borders(0.0, 0.0, 20.0, 15.0, 2.0);
        borders.reverse();
        let rect = active_rect_from_borders(&borders, EdgeConvention::InnerEdge).unwrap();
        assert!(rect.approx_eq(&PageRect::new(0.0, 0.0, 20.0, 15.0), 1e-9));
    }

    #[test]
    fn square_borders_fall_back_to_undivided_extremes() {
        // A 2x2 cell at high zoom-out: every border reports as a square.
        let borders = vec![
            PageRect::new(0.0, 0.0, 2.0, 2.0),
            PageRect::new(0.0, 4.0, 2.0, 2.0),
            PageRect::new(4.0, 0.0, 2.0, 2.0),
            PageRect::new(4.0, 4.0, 2.0, 2.0),
        ];
        let rect = active_rect_from_borders(&borders, EdgeConvention::InnerEdge).unwrap();
        assert!(rect.approx_eq(&PageRect::new(2.0, 2.0, 2.0, 2.0), 1e-9));
    }

    #[test]
    fn wrong_border_count_is_none() {
        let mut borders = outside_borders(0.0, 0.0, 20.0, 15.0, 2.0);
        borders.pop();
        assert!(active_rect_from_borders(&borders, EdgeConvention::InnerEdge).is_none());
        assert!(active_rect_from_borders(&[], EdgeConvention::CenterLine).is_none());
    }
}
