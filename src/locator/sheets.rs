//! Google Sheets locator.

use std::sync::OnceLock;

use regex::Regex;

use super::border::EdgeConvention;
use super::profile::{HeaderClamp, HostProfile, HostSelectors};
use super::{ActiveCellLocator, HostKind};
use crate::dom::HostDocument;
use crate::types::{GridRect, HeaderHighlight, PageRect};

/// Selectors and conventions of the Sheets grid ("waffle").
pub fn sheets_profile() -> HostProfile {
    HostProfile::new(
        HostSelectors {
            container_id: "waffle-grid-container".to_string(),
            active_border_class: "active-cell-border".to_string(),
            selection_class: "selection".to_string(),
            column_header_class: "column-headers-background".to_string(),
            row_header_class: "row-headers-background".to_string(),
        },
        EdgeConvention::InnerEdge,
    )
}

fn document_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"/d/([^/]+)").ok())
        .as_ref()
}

/// Document id from a Sheets path (`/spreadsheets/d/<id>/edit`), else the path itself.
pub fn sheets_key(pathname: &str) -> String {
    document_id_pattern()
        .and_then(|pattern| pattern.captures(pathname))
        .and_then(|captures| captures.get(1))
        .map_or_else(|| pathname.to_owned(), |id| id.as_str().to_owned())
}

pub struct SheetsLocator<D> {
    document: D,
    profile: HostProfile,
}

impl<D: HostDocument> SheetsLocator<D> {
    pub fn new(document: D) -> Self {
        Self::with_profile(document, sheets_profile())
    }

    pub fn with_profile(document: D, profile: HostProfile) -> Self {
        Self { document, profile }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn profile_mut(&mut self) -> &mut HostProfile {
        &mut self.profile
    }
}

impl<D: HostDocument> ActiveCellLocator for SheetsLocator<D> {
    fn host_kind(&self) -> HostKind {
        HostKind::Sheets
    }

    fn highlight_rect_list(&self) -> Vec<GridRect> {
        self.profile.highlight_rects(&self.document)
    }

    fn active_cell_rect(&self) -> Option<GridRect> {
        self.profile.active_cell(&self.document)
    }

    fn header_highlight_rect_list(&self) -> Vec<HeaderHighlight> {
        self.profile.header_highlights(&self.document)
    }

    fn sheet_container_rect(&self) -> Option<PageRect> {
        self.profile.container_rect(&self.document)
    }

    fn sheet_key(&self) -> String {
        sheets_key(&self.document.location().pathname())
    }

    /// The column-letter band never grows taller than the active row.
    fn header_clamp(&self, active: Option<&GridRect>) -> HeaderClamp {
        HeaderClamp {
            max_column_header_height: active.map(|cell| cell.height),
            max_row_header_width: None,
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

    #[test]
    fn key_is_document_id() {
        assert_eq!(sheets_key("/spreadsheets/d/1AbC-xyz_9/edit"), "1AbC-xyz_9");
        assert_eq!(sheets_key("/spreadsheets/u/0/d/abc"), "abc");
    }

    #[test]
    fn key_falls_back_to_path() {
        assert_eq!(sheets_key("/spreadsheets/"), "/spreadsheets/");
        assert_eq!(sheets_key("/spreadsheets/d/"), "/spreadsheets/d/");
    }
}
