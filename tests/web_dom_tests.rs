//! Browser tests for the `web-sys` DOM bindings.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use sheetlight::config::RenderConfig;
use sheetlight::dom::web::{WebDocument, WebSurface};
use sheetlight::dom::{HostElement, OverlaySurface};
use sheetlight::locator::{ActiveCellLocator, SheetsLocator};
use sheetlight::render::{FrameInput, HighlightRenderer, APP_CONTAINER_ID};
use sheetlight::types::GridRect;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn absolute_div(doc: &Document, class: Option<&str>, id: Option<&str>, rect: (f64, f64, f64, f64)) -> HtmlElement {
    let element = doc
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    if let Some(class) = class {
        element.set_class_name(class);
    }
    if let Some(id) = id {
        element.set_id(id);
    }
    let (x, y, w, h) = rect;
    element
        .set_attribute(
            "style",
            &format!("position:absolute;margin:0;left:{x}px;top:{y}px;width:{w}px;height:{h}px"),
        )
        .unwrap();
    doc.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn locates_and_highlights_a_live_grid() {
    let doc = document();
    let container = absolute_div(&doc, None, Some("waffle-grid-container"), (50.0, 150.0, 1000.0, 600.0));
    // Active cell at (250, 192) 100x21, borders 2px just outside it.
    let borders = [
        (248.0, 190.0, 104.0, 2.0),
        (248.0, 213.0, 104.0, 2.0),
        (248.0, 192.0, 2.0, 21.0),
        (350.0, 192.0, 2.0, 21.0),
    ]
    .map(|rect| absolute_div(&doc, Some("active-cell-border"), None, rect));

    let locator = SheetsLocator::new(WebDocument::new().unwrap());
    let active = locator.active_cell_rect().unwrap();
    assert!(active.approx_eq(&GridRect::new(200.0, 42.0, 100.0, 21.0), 0.5));

    let mut renderer = HighlightRenderer::new(WebSurface::new().unwrap()).unwrap();
    let summary = renderer
        .render(&FrameInput::capture(&locator), &RenderConfig::default())
        .unwrap();
    assert_eq!(summary.bands.len(), 2);

    let band_container = doc.get_element_by_id(APP_CONTAINER_ID).unwrap();
    assert_eq!(band_container.child_element_count(), 2);

    band_container.remove();
    container.remove();
    for border in borders {
        border.remove();
    }
}

#[wasm_bindgen_test]
fn inline_display_none_hides_an_element() {
    let doc = document();
    let element = absolute_div(&doc, Some("selection"), None, (0.0, 0.0, 10.0, 10.0));
    assert!(element.is_displayed());

    let mut surface = WebSurface::new().unwrap();
    surface.set_style(&element, "display", "none").unwrap();
    assert!(!element.is_displayed());
    element.remove();
}
