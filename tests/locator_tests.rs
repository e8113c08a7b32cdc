//! Locator tests against captured Sheets and Excel pages.
//!
//! Covers active-cell recovery from border indicators, selection fragments
//! in grid-local frame, full row/column suppression, header lookup with its
//! fallbacks, and per-document keys.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{cell, range, PageBuilder, EXCEL_HREF, SHEETS_HREF, SHEET_Y};
use sheetlight::dom::{MemoryDocument, PageLocation};
use sheetlight::locator::{ActiveCellLocator, HeaderClamp, HostKind, Locator};
use sheetlight::types::{GridRect, HeaderAxis, HeaderHighlight, PageRect};

fn locator(document: MemoryDocument) -> Locator<MemoryDocument> {
    Locator::for_host(document)
}

#[test]
fn host_is_detected_from_the_url() {
    assert_eq!(HostKind::detect(&PageLocation::new(SHEETS_HREF)), HostKind::Sheets);
    assert_eq!(HostKind::detect(&PageLocation::new(EXCEL_HREF)), HostKind::Excel);
    assert_eq!(locator(PageBuilder::excel().build()).host_kind(), HostKind::Excel);
}

#[test]
fn sheets_lone_active_cell_is_the_highlight() {
    let loc = locator(PageBuilder::sheets().active_cell(2, 2).build());
    let expected = GridRect::new(200.0, 42.0, 100.0, 21.0);

    assert_eq!(loc.host_kind(), HostKind::Sheets);
    assert_eq!(loc.active_cell_rect(), Some(expected));
    assert_eq!(loc.highlight_rect_list(), vec![expected]);
}

#[test]
fn excel_active_cell_from_centered_borders() {
    let loc = locator(PageBuilder::excel().active_cell(3, 5).build());
    let active = loc.active_cell_rect().unwrap();
    assert!(active.approx_eq(&GridRect::new(300.0, 105.0, 100.0, 21.0), 1e-9));
}

#[test]
fn active_cell_needs_exactly_four_borders() {
    let mut document = PageBuilder::sheets().active_cell(1, 1).build();
    document.elements.pop();
    let loc = locator(document);
    assert_eq!(loc.active_cell_rect(), None);
    assert!(loc.highlight_rect_list().is_empty());
    assert!(loc.header_highlight_rect_list().is_empty());
}

#[test]
fn missing_container_yields_nothing() {
    let mut document = PageBuilder::sheets()
        .active_cell(1, 1)
        .fragment(range(1, 1, 2, 2))
        .build();
    document.elements.remove(0);
    let loc = locator(document);

    assert_eq!(loc.sheet_container_rect(), None);
    assert_eq!(loc.active_cell_rect(), None);
    assert!(loc.highlight_rect_list().is_empty());
    assert!(loc.header_highlight_rect_list().is_empty());
    assert!(loc.sheet_container_style().is_empty());
}

#[test]
fn fragments_are_reported_grid_local() {
    let loc = locator(
        PageBuilder::sheets()
            .active_cell(1, 1)
            .fragment(range(1, 1, 3, 2))
            .fragment(cell(6, 9))
            .build(),
    );
    assert_eq!(
        loc.highlight_rect_list(),
        vec![
            GridRect::new(100.0, 21.0, 300.0, 42.0),
            GridRect::new(600.0, 189.0, 100.0, 21.0),
        ]
    );
}

#[test]
fn hidden_fragments_are_ignored() {
    let loc = locator(
        PageBuilder::sheets()
            .active_cell(4, 4)
            .hidden_fragment(range(0, 0, 3, 3))
            .build(),
    );
    // Only hidden fragments: behaves like a lone active cell.
    assert_eq!(
        loc.highlight_rect_list(),
        vec![GridRect::new(400.0, 84.0, 100.0, 21.0)]
    );
}

#[test]
fn full_row_selection_suppresses_highlight() {
    let row = PageRect::new(50.0, 192.0, 1000.0, 21.0);
    let loc = locator(PageBuilder::sheets().active_cell(2, 2).fragment(row).build());
    assert!(loc.highlight_rect_list().is_empty());
    assert!(loc.active_cell_rect().is_some());
}

#[test]
fn full_row_split_by_frozen_column_is_still_full() {
    let loc = locator(
        PageBuilder::excel()
            .active_cell(0, 2)
            .fragment(PageRect::new(50.0, 192.0, 200.0, 21.0))
            .fragment(PageRect::new(250.0, 192.0, 800.0, 21.0))
            .build(),
    );
    assert!(loc.highlight_rect_list().is_empty());
}

#[test]
fn full_column_selection_suppresses_highlight() {
    let column = PageRect::new(350.0, 150.0, 100.0, 600.0);
    let loc = locator(PageBuilder::sheets().active_cell(3, 0).fragment(column).build());
    assert!(loc.highlight_rect_list().is_empty());
}

#[test]
fn headers_are_found_by_overlap() {
    let loc = locator(PageBuilder::sheets().headers().active_cell(2, 2).build());
    assert_eq!(
        loc.header_highlight_rect_list(),
        vec![
            HeaderHighlight {
                axis: HeaderAxis::Column,
                rect: PageRect::new(250.0, 126.0, 100.0, 24.0),
            },
            HeaderHighlight {
                axis: HeaderAxis::Row,
                rect: PageRect::new(4.0, 192.0, 46.0, 21.0),
            },
        ]
    );
}

#[test]
fn headers_fall_back_next_to_the_container() {
    let loc = locator(PageBuilder::sheets().active_cell(2, 2).build());
    let headers = loc.header_highlight_rect_list();
    assert_eq!(headers.len(), 2);
    // Fallback column band is capped to the active cell height.
    assert_eq!(headers[0].axis, HeaderAxis::Column);
    assert_eq!(headers[0].rect, PageRect::new(250.0, SHEET_Y - 21.0, 100.0, 21.0));
    assert_eq!(headers[1].axis, HeaderAxis::Row);
    assert_eq!(headers[1].rect, PageRect::new(4.0, 192.0, 46.0, 21.0));
}

#[test]
fn excel_row_header_fallback_uses_its_gutter() {
    let loc = locator(PageBuilder::excel().active_cell(2, 2).build());
    let headers = loc.header_highlight_rect_list();
    let row = headers.iter().find(|h| h.axis == HeaderAxis::Row).unwrap();
    assert!(row.rect.approx_eq(&PageRect::new(10.0, 192.0, 40.0, 21.0), 1e-9));
}

#[test]
fn container_style_positions_band_container() {
    let loc = locator(PageBuilder::sheets().build());
    let style: Vec<(&str, String)> = loc.sheet_container_style();
    assert_eq!(
        style,
        vec![
            ("left", "50px".to_string()),
            ("top", "150px".to_string()),
            ("width", "1000px".to_string()),
            ("height", "600px".to_string()),
        ]
    );
}

#[test]
fn header_clamps_differ_per_host() {
    let active = GridRect::new(0.0, 0.0, 100.0, 21.0);
    assert_eq!(
        locator(PageBuilder::sheets().build()).header_clamp(Some(&active)),
        HeaderClamp {
            max_column_header_height: Some(21.0),
            max_row_header_width: None,
        }
    );
    assert_eq!(
        locator(PageBuilder::excel().build()).header_clamp(Some(&active)),
        HeaderClamp {
            max_column_header_height: Some(21.0),
            max_row_header_width: Some(40.0),
        }
    );
    assert_eq!(
        locator(PageBuilder::excel().build())
            .header_clamp(None)
            .max_column_header_height,
        None
    );
}

#[test]
fn sheet_keys() {
    assert_eq!(locator(PageBuilder::sheets().build()).sheet_key(), "sheet-1");
    assert_eq!(locator(PageBuilder::excel().build()).sheet_key(), "ABC-123");
}

#[test]
fn every_query_rereads_the_document() {
    let mut loc = locator(PageBuilder::sheets().active_cell(2, 2).build());
    assert_eq!(loc.active_cell_rect().unwrap().y, 42.0);

    for border in loc.document_mut().elements_with_class_mut("active-cell-border") {
        border.rect.y += 21.0;
    }
    assert_eq!(loc.active_cell_rect().unwrap().y, 63.0);
}

#[test]
fn profile_selectors_can_be_overridden() {
    let mut loc = locator(PageBuilder::sheets().active_cell(2, 2).build());
    loc.profile_mut().selectors.container_id = "renamed-grid".to_string();
    assert_eq!(loc.active_cell_rect(), None);
}
