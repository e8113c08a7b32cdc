//! Per-host selectors and the DOM queries both locators share.

use serde::{Deserialize, Serialize};

use super::border::{active_rect_from_borders, EdgeConvention};
use super::header::{header_highlight, HeaderTuning};
use crate::dom::{HostDocument, HostElement};
use crate::reconcile::{
    exclude_full_span_duplicates, full_span_fragments, is_full_row_or_column, DEFAULT_TOLERANCE,
};
use crate::types::{GridRect, HeaderAxis, HeaderHighlight, PageRect};

/// The host's CSS hooks. These are the only coupling points to the host's
/// markup and have to be revalidated whenever the host changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSelectors {
    /// Id of the scrolling grid container (the grid-local origin)
    pub container_id: String,
    /// Class of the four border indicators around the active cell
    pub active_border_class: String,
    /// Class of selection fragments
    pub selection_class: String,
    /// Class of the column-letter header container
    pub column_header_class: String,
    /// Class of the row-number header container
    pub row_header_class: String,
}

/// Caps applied to header bands after scaling, so they do not bleed into
/// neighbouring frozen panes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderClamp {
    pub max_column_header_height: Option<f64>,
    pub max_row_header_width: Option<f64>,
}

impl HeaderClamp {
    /// Cap `rect` according to which gutter it belongs to.
    pub fn apply(&self, axis: HeaderAxis, rect: PageRect) -> PageRect {
        match axis {
            HeaderAxis::Column => match self.max_column_header_height {
                Some(max) => PageRect::new(rect.x, rect.y, rect.width, rect.height.min(max)),
                None => rect,
            },
            HeaderAxis::Row => match self.max_row_header_width {
                Some(max) => PageRect::new(rect.x, rect.y, rect.width.min(max), rect.height),
                None => rect,
            },
        }
    }
}

/// Everything a locator needs to know about one host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostProfile {
    pub selectors: HostSelectors,
    pub edge_convention: EdgeConvention,
    pub header_tuning: HeaderTuning,
    /// Pixel tolerance for full row/column detection
    pub tolerance: f64,
}

impl HostProfile {
    pub fn new(selectors: HostSelectors, edge_convention: EdgeConvention) -> Self {
        Self {
            selectors,
            edge_convention,
            header_tuning: HeaderTuning::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn container_rect<D: HostDocument>(&self, document: &D) -> Option<PageRect> {
        document
            .element_by_id(&self.selectors.container_id)
            .map(|element| element.bounding_rect())
    }

    /// Active cell in browser frame. `None` without the container or with
    /// anything other than exactly four border indicators.
    pub fn active_cell_page<D: HostDocument>(&self, document: &D) -> Option<PageRect> {
        self.container_rect(document)?;
        let borders: Vec<PageRect> = document
            .elements_by_class(&self.selectors.active_border_class)
            .iter()
            .map(HostElement::bounding_rect)
            .collect();
        if borders.len() != 4 {
            tracing::trace!(count = borders.len(), "active cell borders not found");
            return None;
        }
        active_rect_from_borders(&borders, self.edge_convention)
    }

    pub fn active_cell<D: HostDocument>(&self, document: &D) -> Option<GridRect> {
        let sheet = self.container_rect(document)?;
        self.active_cell_page(document)
            .map(|cell| cell.to_grid_local(&sheet))
    }

    /// Rectangles to highlight, in grid-local frame.
    ///
    /// With visible selection fragments this is the fragment list minus
    /// full row/column artifacts (empty when the whole set is a full row or
    /// column). Without fragments it is the active cell alone.
    pub fn highlight_rects<D: HostDocument>(&self, document: &D) -> Vec<GridRect> {
        let fragments: Vec<PageRect> = document
            .elements_by_class(&self.selectors.selection_class)
            .iter()
            .filter(|element| element.is_displayed())
            .map(HostElement::bounding_rect)
            .collect();

        if fragments.is_empty() {
            return self.active_cell(document).into_iter().collect();
        }

        let Some(sheet) = self.container_rect(document) else {
            return Vec::new();
        };
        highlight_rects_from_fragments(&fragments, &sheet, self.tolerance)
    }

    fn header_candidates<D: HostDocument>(&self, document: &D, class: &str) -> Option<Vec<PageRect>> {
        let containers = document.elements_by_class(class);
        if containers.is_empty() {
            return None;
        }
        Some(
            containers
                .iter()
                .flat_map(|container| document.descendants(container))
                .map(|element| element.bounding_rect())
                .collect(),
        )
    }

    /// Column-header then row-header highlight for the active cell.
    pub fn header_highlights<D: HostDocument>(&self, document: &D) -> Vec<HeaderHighlight> {
        let (Some(sheet), Some(cell)) = (
            self.container_rect(document),
            self.active_cell_page(document),
        ) else {
            return Vec::new();
        };

        [
            (HeaderAxis::Column, &self.selectors.column_header_class),
            (HeaderAxis::Row, &self.selectors.row_header_class),
        ]
        .into_iter()
        .map(|(axis, class)| {
            let candidates = self.header_candidates(document, class);
            header_highlight(
                candidates.as_deref(),
                &cell,
                &sheet,
                axis,
                &self.header_tuning,
            )
        })
        .collect()
    }
}

/// Convert fragments to grid-local whole pixels and drop full row/column artifacts.
pub fn highlight_rects_from_fragments(
    fragments: &[PageRect],
    sheet: &PageRect,
    tolerance: f64,
) -> Vec<GridRect> {
    let local: Vec<GridRect> = fragments
        .iter()
        .map(|fragment| fragment.to_grid_local(sheet).ceil())
        .collect();
    let size = sheet.size();

    if is_full_row_or_column(&local, size, tolerance) {
        tracing::trace!(fragments = local.len(), "full row/column selection");
        return Vec::new();
    }

    let full = full_span_fragments(&local, size, tolerance);
    exclude_full_span_duplicates(&local, &full)
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

    #[test]
    fn clamp_caps_only_its_axis() {
        let clamp = HeaderClamp {
            max_column_header_height: Some(21.0),
            max_row_header_width: Some(40.0),
        };
        let column = clamp.apply(HeaderAxis::Column, PageRect::new(0.0, 0.0, 100.0, 30.0));
        assert_eq!((column.width, column.height), (100.0, 21.0));
        let row = clamp.apply(HeaderAxis::Row, PageRect::new(0.0, 0.0, 55.0, 30.0));
        assert_eq!((row.width, row.height), (40.0, 30.0));
        assert_eq!(
            HeaderClamp::default().apply(HeaderAxis::Row, row),
            row
        );
    }

    #[test]
    fn fragments_are_ceiled_in_grid_frame() {
        let sheet = PageRect::new(10.5, 100.25, 1000.0, 600.0);
        let fragments = [PageRect::new(110.6, 142.0, 99.2, 20.5)];
        let rects = highlight_rects_from_fragments(&fragments, &sheet, DEFAULT_TOLERANCE);
        assert_eq!(rects, vec![GridRect::new(101.0, 42.0, 100.0, 21.0)]);
    }
}
