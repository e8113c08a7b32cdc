//! Active-cell locators.
//!
//! A locator reads the host page and answers where the active cell, the
//! selection fragments and the header gutters are. Two hosts are modeled,
//! each with its own selectors and pixel conventions:
//! - [`SheetsLocator`]: Google Sheets
//! - [`ExcelLocator`]: Excel for the web
//!
//! Every query re-reads the DOM. Missing anchors produce empty results, never
//! errors.

pub mod border;
pub mod excel;
pub mod header;
pub mod profile;
pub mod sheets;

pub use border::{active_rect_from_borders, EdgeConvention};
pub use excel::{excel_key, excel_profile, ExcelLocator, EXCEL_ROW_GUTTER_WIDTH};
pub use header::{fallback_header, header_highlight, locate_header, HeaderTuning};
pub use profile::{highlight_rects_from_fragments, HeaderClamp, HostProfile, HostSelectors};
pub use sheets::{sheets_key, sheets_profile, SheetsLocator};

use serde::{Deserialize, Serialize};

use crate::dom::{HostDocument, PageLocation, StyleDecl};
use crate::types::{GridRect, HeaderHighlight, PageRect};

/// Which host application the page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    Sheets,
    Excel,
}

impl HostKind {
    /// Google Sheets on `docs.google.com`; anything else the content script
    /// is injected into is Excel for the web.
    pub fn detect(location: &PageLocation) -> Self {
        if location.host() == "docs.google.com" {
            Self::Sheets
        } else {
            Self::Excel
        }
    }
}

/// Queries every host locator answers.
pub trait ActiveCellLocator {
    fn host_kind(&self) -> HostKind;

    /// Rectangles to highlight, grid-local. Empty for full row/column selections.
    fn highlight_rect_list(&self) -> Vec<GridRect>;

    /// The active cell, grid-local.
    fn active_cell_rect(&self) -> Option<GridRect>;

    /// Column-header then row-header highlight, page frame.
    fn header_highlight_rect_list(&self) -> Vec<HeaderHighlight>;

    /// The sheet container in page frame; the grid-local origin.
    fn sheet_container_rect(&self) -> Option<PageRect>;

    /// Absolute-position style placing the band container over the sheet
    /// container. Empty when the container is missing.
    fn sheet_container_style(&self) -> Vec<StyleDecl> {
        self.sheet_container_rect()
            .map(|rect| {
                vec![
                    ("left", format!("{}px", rect.x)),
                    ("top", format!("{}px", rect.y)),
                    ("width", format!("{}px", rect.width)),
                    ("height", format!("{}px", rect.height)),
                ]
            })
            .unwrap_or_default()
    }

    /// Stable per-document id derived from the page URL.
    fn sheet_key(&self) -> String;

    /// Caps for scaled header bands, given the current active cell.
    fn header_clamp(&self, active: Option<&GridRect>) -> HeaderClamp;
}

/// The locator chosen for this page.
pub enum Locator<D> {
    Sheets(SheetsLocator<D>),
    Excel(ExcelLocator<D>),
}

impl<D: HostDocument> Locator<D> {
    /// Pick the locator for the page `document` is showing.
    pub fn for_host(document: D) -> Self {
        match HostKind::detect(&document.location()) {
            HostKind::Sheets => Self::Sheets(SheetsLocator::new(document)),
            HostKind::Excel => Self::Excel(ExcelLocator::new(document)),
        }
    }

    pub fn document(&self) -> &D {
        match self {
            Self::Sheets(l) => l.document(),
            Self::Excel(l) => l.document(),
        }
    }

    pub fn document_mut(&mut self) -> &mut D {
        match self {
            Self::Sheets(l) => l.document_mut(),
            Self::Excel(l) => l.document_mut(),
        }
    }

    pub fn profile_mut(&mut self) -> &mut HostProfile {
        match self {
            Self::Sheets(l) => l.profile_mut(),
            Self::Excel(l) => l.profile_mut(),
        }
    }
}

impl<D: HostDocument> ActiveCellLocator for Locator<D> {
    fn host_kind(&self) -> HostKind {
        match self {
            Self::Sheets(l) => l.host_kind(),
            Self::Excel(l) => l.host_kind(),
        }
    }

    fn highlight_rect_list(&self) -> Vec<GridRect> {
        match self {
            Self::Sheets(l) => l.highlight_rect_list(),
            Self::Excel(l) => l.highlight_rect_list(),
        }
    }

    fn active_cell_rect(&self) -> Option<GridRect> {
        match self {
            Self::Sheets(l) => l.active_cell_rect(),
            Self::Excel(l) => l.active_cell_rect(),
        }
    }

    fn header_highlight_rect_list(&self) -> Vec<HeaderHighlight> {
        match self {
            Self::Sheets(l) => l.header_highlight_rect_list(),
            Self::Excel(l) => l.header_highlight_rect_list(),
        }
    }

    fn sheet_container_rect(&self) -> Option<PageRect> {
        match self {
            Self::Sheets(l) => l.sheet_container_rect(),
            Self::Excel(l) => l.sheet_container_rect(),
        }
    }

    fn sheet_key(&self) -> String {
        match self {
            Self::Sheets(l) => l.sheet_key(),
            Self::Excel(l) => l.sheet_key(),
        }
    }

    fn header_clamp(&self, active: Option<&GridRect>) -> HeaderClamp {
        match self {
            Self::Sheets(l) => l.header_clamp(active),
            Self::Excel(l) => l.header_clamp(active),
        }
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
    use crate::dom::MemoryDocument;

    #[test]
    fn detects_host_from_location() {
        let sheets = PageLocation::new("https://docs.google.com/spreadsheets/d/x/edit");
        assert_eq!(HostKind::detect(&sheets), HostKind::Sheets);
        let excel = PageLocation::new("https://contoso.sharepoint.com/:x:/r/Doc.aspx");
        assert_eq!(HostKind::detect(&excel), HostKind::Excel);
    }

    #[test]
    fn missing_container_gives_empty_style() {
        let locator = Locator::for_host(MemoryDocument::new("https://docs.google.com/"));
        assert!(locator.sheet_container_style().is_empty());
        assert!(locator.active_cell_rect().is_none());
        assert!(locator.highlight_rect_list().is_empty());
        assert!(locator.header_highlight_rect_list().is_empty());
    }
}
