//! Band planning.
//!
//! Turns one cycle's locator output and the current config into positioned
//! band tasks. Nothing here touches the DOM, so the whole layout is testable
//! natively; [`super::HighlightRenderer`] only applies the result.

use std::fmt;

use serde::Serialize;

use crate::config::{RenderConfig, RenderPolicy};
use crate::dom::StyleDecl;
use crate::locator::{ActiveCellLocator, HeaderClamp};
use crate::reconcile::merge_adjacent;
use crate::types::{BandKind, GridRect, HeaderAxis, HeaderHighlight, HighlightBand, PageRect, Size};

/// Rects closer than this are the same cell (fragments are ceiled, the active cell is not).
const SAME_CELL_EPSILON: f64 = 1.0;

/// A CSS length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// What a band element draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Top and bottom border only
    Row,
    /// Left and right border only
    Column,
    /// All four borders around the active cell
    Intersection,
}

impl From<BandKind> for TaskKind {
    fn from(kind: BandKind) -> Self {
        match kind {
            BandKind::Row => Self::Row,
            BandKind::Column => Self::Column,
        }
    }
}

/// One positioned band element, grid-local.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandTask {
    pub kind: TaskKind,
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

/// Merged bands for the enabled axes, rows first.
pub fn desired_bands(rects: &[GridRect], config: &RenderConfig) -> Vec<HighlightBand> {
    let mut bands = Vec::new();
    for (kind, enabled) in [
        (BandKind::Row, config.row_enabled),
        (BandKind::Column, config.column_enabled),
    ] {
        if enabled {
            bands.extend(
                merge_adjacent(rects, kind.merge_axis())
                    .into_iter()
                    .map(|rect| HighlightBand { kind, rect }),
            );
        }
    }
    bands
}

/// Offset a band's start by half the border and shrink its extent by the
/// whole border, so the borders sit on the grid lines.
fn inset(start: f64, extent: f64, thickness: f64) -> (f64, f64) {
    (
        (start - thickness / 2.0).max(0.0),
        (extent - thickness).max(0.0),
    )
}

/// A full-width row band or full-height column band.
pub fn band_task(band: &HighlightBand, thickness: f64) -> BandTask {
    let rect = &band.rect;
    match band.kind {
        BandKind::Row => {
            let (top, height) = inset(rect.y, rect.height, thickness);
            BandTask {
                kind: TaskKind::Row,
                left: Length::Px(0.0),
                top: Length::Px(top),
                width: Length::Percent(100.0),
                height: Length::Px(height),
            }
        }
        BandKind::Column => {
            let (left, width) = inset(rect.x, rect.width, thickness);
            BandTask {
                kind: TaskKind::Column,
                left: Length::Px(left),
                top: Length::Px(0.0),
                width: Length::Px(width),
                height: Length::Percent(100.0),
            }
        }
    }
}

pub fn plan_full_bands(rects: &[GridRect], config: &RenderConfig) -> Vec<BandTask> {
    desired_bands(rects, config)
        .iter()
        .map(|band| band_task(band, config.line_thickness))
        .collect()
}

/// Row and column split around the active cell, plus the optional
/// intersection outline. Empty segments are skipped.
pub fn plan_segments(active: &GridRect, sheet: Size, config: &RenderConfig) -> Vec<BandTask> {
    let t = config.line_thickness;
    let mut tasks = Vec::new();

    if config.row_enabled {
        let (top, height) = inset(active.y, active.height, t);
        let spans = [
            (0.0, active.x),
            (active.right(), sheet.width - active.right()),
        ];
        tasks.extend(spans.into_iter().filter(|&(_, len)| len > 0.0).map(|(left, len)| BandTask {
            kind: TaskKind::Row,
            left: Length::Px(left),
            top: Length::Px(top),
            width: Length::Px(len),
            height: Length::Px(height),
        }));
    }

    if config.column_enabled {
        let (left, width) = inset(active.x, active.width, t);
        let spans = [
            (0.0, active.y),
            (active.bottom(), sheet.height - active.bottom()),
        ];
        tasks.extend(spans.into_iter().filter(|&(_, len)| len > 0.0).map(|(top, len)| BandTask {
            kind: TaskKind::Column,
            left: Length::Px(left),
            top: Length::Px(top),
            width: Length::Px(width),
            height: Length::Px(len),
        }));
    }

    if config.emphasize_intersection && (config.row_enabled || config.column_enabled) {
        let (left, width) = inset(active.x, active.width, t);
        let (top, height) = inset(active.y, active.height, t);
        tasks.push(BandTask {
            kind: TaskKind::Intersection,
            left: Length::Px(left),
            top: Length::Px(top),
            width: Length::Px(width),
            height: Length::Px(height),
        });
    }

    tasks
}

/// Everything one cycle reads from the locator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameInput {
    pub rects: Vec<GridRect>,
    pub active: Option<GridRect>,
    pub sheet: Option<PageRect>,
    pub container_style: Vec<StyleDecl>,
    pub headers: Vec<HeaderHighlight>,
    pub header_clamp: HeaderClamp,
}

impl FrameInput {
    /// Query the locator once for everything the renderer needs.
    ///
    /// Header bands are skipped when the selection list is empty while an
    /// active cell exists: the host is already showing a full row or column
    /// selection in its own headers.
    pub fn capture<L: ActiveCellLocator + ?Sized>(locator: &L) -> Self {
        let rects = locator.highlight_rect_list();
        let active = locator.active_cell_rect();
        let headers = if rects.is_empty() && active.is_some() {
            Vec::new()
        } else {
            locator.header_highlight_rect_list()
        };
        Self {
            header_clamp: locator.header_clamp(active.as_ref()),
            container_style: locator.sheet_container_style(),
            sheet: locator.sheet_container_rect(),
            rects,
            active,
            headers,
        }
    }

    /// The active cell when it is the whole selection.
    fn lone_active_cell(&self) -> Option<&GridRect> {
        let active = self.active.as_ref()?;
        match self.rects.as_slice() {
            [only] if only.approx_eq(active, SAME_CELL_EPSILON) => Some(active),
            _ => None,
        }
    }

    /// Band tasks under the configured policy.
    ///
    /// The segmented policy only applies to a single active cell; any
    /// multi-cell selection falls back to full bands.
    pub fn plan_bands(&self, config: &RenderConfig) -> Vec<BandTask> {
        if config.render_policy == RenderPolicy::Segmented {
            if let (Some(active), Some(sheet)) = (self.lone_active_cell(), self.sheet) {
                return plan_segments(active, sheet.size(), config);
            }
        }
        plan_full_bands(&self.rects, config)
    }

    /// Header bands scaled by the config and capped by the host clamp.
    pub fn plan_headers(&self, config: &RenderConfig) -> Vec<HeaderHighlight> {
        self.headers
            .iter()
            .map(|header| {
                let rect = header.rect;
                let scaled = match header.axis {
                    HeaderAxis::Column => {
                        PageRect::new(rect.x, rect.y, rect.width, rect.height * config.header_col_scale)
                    }
                    HeaderAxis::Row => {
                        PageRect::new(rect.x, rect.y, rect.width * config.header_row_scale, rect.height)
                    }
                };
                HeaderHighlight {
                    axis: header.axis,
                    rect: self.header_clamp.apply(header.axis, scaled),
                }
            })
            .collect()
    }
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

    fn config() -> RenderConfig {
        RenderConfig {
            line_thickness: 2.0,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn lengths_render_as_css() {
        assert_eq!(Length::Px(1.75).to_string(), "1.75px");
        assert_eq!(Length::Px(0.0).to_string(), "0px");
        assert_eq!(Length::Percent(100.0).to_string(), "100%");
    }

    #[test]
    fn row_band_is_inset_by_border() {
        let band = HighlightBand {
            kind: BandKind::Row,
            rect: GridRect::new(30.0, 42.0, 100.0, 21.0),
        };
        let task = band_task(&band, 2.0);
        assert_eq!(task.top, Length::Px(41.0));
        assert_eq!(task.height, Length::Px(19.0));
        assert_eq!(task.left, Length::Px(0.0));
        assert_eq!(task.width, Length::Percent(100.0));
    }

    #[test]
    fn band_at_origin_does_not_go_negative() {
        let band = HighlightBand {
            kind: BandKind::Column,
            rect: GridRect::new(0.0, 0.0, 1.0, 21.0),
        };
        let task = band_task(&band, 3.0);
        assert_eq!(task.left, Length::Px(0.0));
        assert_eq!(task.width, Length::Px(0.0));
    }

    #[test]
    fn disabled_axes_produce_no_bands() {
        let rects = [GridRect::new(0.0, 0.0, 10.0, 10.0)];
        let config = RenderConfig {
            column_enabled: false,
            ..config()
        };
        let bands = desired_bands(&rects, &config);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].kind, BandKind::Row);
    }

    #[test]
    fn segments_skip_empty_sides() {
        // Cell in the first column: no left segment.
        let active = GridRect::new(0.0, 21.0, 100.0, 21.0);
        let tasks = plan_segments(&active, Size::new(500.0, 300.0), &config());
        let rows: Vec<_> = tasks.iter().filter(|t| t.kind == TaskKind::Row).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].left, Length::Px(100.0));
        assert_eq!(rows[0].width, Length::Px(400.0));
        let columns: Vec<_> = tasks.iter().filter(|t| t.kind == TaskKind::Column).collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].top, Length::Px(42.0));
        assert_eq!(columns[1].height, Length::Px(258.0));
    }

    #[test]
    fn intersection_is_optional() {
        let active = GridRect::new(100.0, 21.0, 100.0, 21.0);
        let config = RenderConfig {
            emphasize_intersection: true,
            ..config()
        };
        let tasks = plan_segments(&active, Size::new(500.0, 300.0), &config);
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks.last().unwrap().kind, TaskKind::Intersection);
    }

    #[test]
    fn headers_scale_then_clamp() {
        let frame = FrameInput {
            headers: vec![
                HeaderHighlight {
                    axis: HeaderAxis::Column,
                    rect: PageRect::new(0.0, 0.0, 100.0, 20.0),
                },
                HeaderHighlight {
                    axis: HeaderAxis::Row,
                    rect: PageRect::new(0.0, 0.0, 40.0, 21.0),
                },
            ],
            header_clamp: HeaderClamp {
                max_column_header_height: Some(15.0),
                max_row_header_width: None,
            },
            ..FrameInput::default()
        };
        let headers = frame.plan_headers(&RenderConfig::default());
        assert_eq!(headers[0].rect.height, 15.0);
        assert!((headers[1].rect.width - 46.0).abs() < 1e-9);
    }
}
