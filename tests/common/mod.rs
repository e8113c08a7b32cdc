//! Common test utilities: builders for captured host pages.
//!
//! Pages are laid out on a fixed grid so expectations can be written in
//! cell coordinates. The sheet container sits at (50, 150) and is
//! 1000x600; every cell is 100x21. Column headers sit in a 24px strip just
//! above the container and row headers in a 46px gutter to its left.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use sheetlight::dom::{MemoryDocument, MemoryElement};
use sheetlight::locator::{excel_profile, sheets_profile, HostSelectors};
use sheetlight::types::PageRect;

pub const SHEETS_HREF: &str = "https://docs.google.com/spreadsheets/d/sheet-1/edit#gid=0";
pub const EXCEL_HREF: &str =
    "https://contoso.sharepoint.com/:x:/r/sites/team/_layouts/15/Doc.aspx?sourcedoc={ABC-123}&action=edit";

pub const SHEET_X: f64 = 50.0;
pub const SHEET_Y: f64 = 150.0;
pub const SHEET_WIDTH: f64 = 1000.0;
pub const SHEET_HEIGHT: f64 = 600.0;
pub const CELL_WIDTH: f64 = 100.0;
pub const CELL_HEIGHT: f64 = 21.0;
pub const HEADER_STRIP: f64 = 24.0;
pub const ROW_GUTTER: f64 = 46.0;
pub const BORDER: f64 = 2.0;

pub fn sheet_rect() -> PageRect {
    PageRect::new(SHEET_X, SHEET_Y, SHEET_WIDTH, SHEET_HEIGHT)
}

/// Page rect of the cell at zero-based `(col, row)`.
pub fn cell(col: u32, row: u32) -> PageRect {
    PageRect::new(
        SHEET_X + f64::from(col) * CELL_WIDTH,
        SHEET_Y + f64::from(row) * CELL_HEIGHT,
        CELL_WIDTH,
        CELL_HEIGHT,
    )
}

/// Page rect covering the cells from `(c0, r0)` to `(c1, r1)` inclusive.
pub fn range(c0: u32, r0: u32, c1: u32, r1: u32) -> PageRect {
    let start = cell(c0, r0);
    let end = cell(c1, r1);
    PageRect::from_edges(start.x, start.y, end.right(), end.bottom())
}

/// How the host draws the four indicators around the active cell.
#[derive(Debug, Clone, Copy)]
pub enum BorderStyle {
    /// Just outside the cell (Google Sheets)
    Outside,
    /// Centered on the grid lines (Excel for the web)
    Centered,
}

fn borders(cell: PageRect, style: BorderStyle) -> [PageRect; 4] {
    let (x, y, w, h, t) = (cell.x, cell.y, cell.width, cell.height, BORDER);
    match style {
        BorderStyle::Outside => [
            PageRect::new(x - t, y - t, w + 2.0 * t, t),
            PageRect::new(x - t, y + h, w + 2.0 * t, t),
            PageRect::new(x - t, y, t, h),
            PageRect::new(x + w, y, t, h),
        ],
        BorderStyle::Centered => {
            let half = t / 2.0;
            [
                PageRect::new(x - half, y - half, w + t, t),
                PageRect::new(x - half, y + h - half, w + t, t),
                PageRect::new(x - half, y - half, t, h + t),
                PageRect::new(x + w - half, y - half, t, h + t),
            ]
        }
    }
}

/// Builds a [`MemoryDocument`] that looks like one of the two hosts.
pub struct PageBuilder {
    document: MemoryDocument,
    selectors: HostSelectors,
    border_style: BorderStyle,
}

impl PageBuilder {
    /// Google Sheets page with its grid container.
    pub fn sheets() -> Self {
        Self::new(SHEETS_HREF, sheets_profile().selectors, BorderStyle::Outside).with_container()
    }

    /// Excel for the web page with its grid container.
    pub fn excel() -> Self {
        Self::new(EXCEL_HREF, excel_profile().selectors, BorderStyle::Centered).with_container()
    }

    fn new(href: &str, selectors: HostSelectors, border_style: BorderStyle) -> Self {
        Self {
            document: MemoryDocument::new(href),
            selectors,
            border_style,
        }
    }

    fn with_container(mut self) -> Self {
        self.document
            .add(MemoryElement::new(sheet_rect()).with_id(&self.selectors.container_id));
        self
    }

    pub fn href(mut self, href: &str) -> Self {
        self.document.href = href.to_owned();
        self
    }

    /// Four border indicators around `rect`.
    pub fn active(mut self, rect: PageRect) -> Self {
        for border in borders(rect, self.border_style) {
            self.document
                .add(MemoryElement::new(border).with_class(&self.selectors.active_border_class));
        }
        self
    }

    pub fn active_cell(self, col: u32, row: u32) -> Self {
        self.active(cell(col, row))
    }

    pub fn fragment(mut self, rect: PageRect) -> Self {
        self.document
            .add(MemoryElement::new(rect).with_class(&self.selectors.selection_class));
        self
    }

    /// A selection fragment the host keeps in the DOM but hides.
    pub fn hidden_fragment(mut self, rect: PageRect) -> Self {
        self.document
            .add(MemoryElement::new(rect).with_class(&self.selectors.selection_class).hidden());
        self
    }

    /// The column-letter strip with one header cell per column.
    pub fn column_headers(mut self) -> Self {
        let strip = PageRect::new(SHEET_X, SHEET_Y - HEADER_STRIP, SHEET_WIDTH, HEADER_STRIP);
        let parent = self
            .document
            .add(MemoryElement::new(strip).with_class(&self.selectors.column_header_class));
        for col in 0..10 {
            let x = SHEET_X + f64::from(col) * CELL_WIDTH;
            self.document.add(
                MemoryElement::new(PageRect::new(x, strip.y, CELL_WIDTH, HEADER_STRIP)).child_of(parent),
            );
        }
        self
    }

    /// The row-number gutter with one header cell per row.
    pub fn row_headers(mut self) -> Self {
        let gutter = PageRect::new(SHEET_X - ROW_GUTTER, SHEET_Y, ROW_GUTTER, SHEET_HEIGHT);
        let parent = self
            .document
            .add(MemoryElement::new(gutter).with_class(&self.selectors.row_header_class));
        for row in 0..28 {
            let y = SHEET_Y + f64::from(row) * CELL_HEIGHT;
            self.document.add(
                MemoryElement::new(PageRect::new(gutter.x, y, ROW_GUTTER, CELL_HEIGHT)).child_of(parent),
            );
        }
        self
    }

    pub fn headers(self) -> Self {
        self.column_headers().row_headers()
    }

    pub fn selectors(&self) -> &HostSelectors {
        &self.selectors
    }

    pub fn build(self) -> MemoryDocument {
        self.document
    }
}

/// A JSON object literal as a settings map.
pub fn items(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
