//! Excel for the web locator.

use super::border::EdgeConvention;
use super::profile::{HeaderClamp, HostProfile, HostSelectors};
use super::{ActiveCellLocator, HostKind};
use crate::dom::{HostDocument, PageLocation};
use crate::types::{GridRect, HeaderHighlight, PageRect};

/// Width of the row-number gutter in the Excel web renderer.
pub const EXCEL_ROW_GUTTER_WIDTH: f64 = 40.0;

/// Query parameters that identify a workbook, most specific first.
const KEY_PARAMS: [&str; 3] = ["sourcedoc", "resid", "docid"];

/// Selectors and conventions of the Excel web renderer.
pub fn excel_profile() -> HostProfile {
    let mut profile = HostProfile::new(
        HostSelectors {
            container_id: "m_excelWebRenderer_ewaCtl_sheetContentDiv".to_string(),
            active_border_class: "ewr-activecellborder".to_string(),
            selection_class: "ewr-selection".to_string(),
            column_header_class: "ewr-colheaders".to_string(),
            row_header_class: "ewr-rowheaders".to_string(),
        },
        EdgeConvention::CenterLine,
    );
    profile.header_tuning.row_gutter_width = EXCEL_ROW_GUTTER_WIDTH;
    profile
}

/// Workbook id from the page URL: the first of `sourcedoc`, `resid`, `docid`
/// present in the query (braces stripped), else the path.
pub fn excel_key(location: &PageLocation) -> String {
    let Ok(url) = url::Url::parse(&location.href) else {
        return location.pathname();
    };
    KEY_PARAMS
        .iter()
        .find_map(|wanted| {
            url.query_pairs()
                .find(|(name, value)| name.eq_ignore_ascii_case(wanted) && !value.is_empty())
                .map(|(_, value)| value.trim_matches(|c| c == '{' || c == '}').to_owned())
        })
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| url.path().to_owned())
}

pub struct ExcelLocator<D> {
    document: D,
    profile: HostProfile,
}

impl<D: HostDocument> ExcelLocator<D> {
    pub fn new(document: D) -> Self {
        Self::with_profile(document, excel_profile())
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

impl<D: HostDocument> ActiveCellLocator for ExcelLocator<D> {
    fn host_kind(&self) -> HostKind {
        HostKind::Excel
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
        excel_key(&self.document.location())
    }

    /// Column band capped at the active row height; row band capped at the
    /// fixed gutter width so scaling cannot spill into the grid.
    fn header_clamp(&self, active: Option<&GridRect>) -> HeaderClamp {
        HeaderClamp {
            max_column_header_height: active.map(|cell| cell.height),
            max_row_header_width: Some(EXCEL_ROW_GUTTER_WIDTH),
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
    fn key_prefers_sourcedoc() {
        let location = PageLocation::new(
            "https://contoso.sharepoint.com/:x:/r/sites/t/_layouts/15/Doc.aspx?resid=R1&sourcedoc=%7BABC-123%7D&action=edit",
        );
        assert_eq!(excel_key(&location), "ABC-123");
    }

    #[test]
    fn key_accepts_any_case_and_falls_back_to_resid() {
        let location = PageLocation::new("https://onedrive.live.com/edit.aspx?ResId=ABCD!105&cid=1");
        assert_eq!(excel_key(&location), "ABCD!105");
    }

    #[test]
    fn key_without_params_is_path() {
        let location = PageLocation::new("https://excel.cloud.microsoft/open/book.xlsx?sourcedoc=");
        assert_eq!(excel_key(&location), "/open/book.xlsx");
    }
}
