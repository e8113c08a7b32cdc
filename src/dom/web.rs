//! `web-sys` implementations of the DOM traits (wasm32 only).

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use super::{HostDocument, HostElement, OverlaySurface, PageLocation};
use crate::error::{Result, SheetlightError};
use crate::types::PageRect;

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| SheetlightError::Dom("no window".to_string()))
}

fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| SheetlightError::Dom("no document".to_string()))
}

impl HostElement for Element {
    fn bounding_rect(&self) -> PageRect {
        let rect = self.get_bounding_client_rect();
        PageRect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn is_displayed(&self) -> bool {
        // Only the inline style is consulted; the host toggles selection
        // fragments through it.
        self.dyn_ref::<HtmlElement>()
            .map(|element| {
                element
                    .style()
                    .get_property_value("display")
                    .map(|display| display != "none")
                    .unwrap_or(true)
            })
            .unwrap_or(true)
    }
}

/// The live host page.
#[derive(Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    pub fn new() -> Result<Self> {
        Ok(Self {
            window: window()?,
            document: document()?,
        })
    }

    pub fn raw(&self) -> &Document {
        &self.document
    }
}

impl HostDocument for WebDocument {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_by_class(&self, class: &str) -> Vec<Element> {
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|index| collection.item(index))
            .collect()
    }

    fn descendants(&self, root: &Element) -> Vec<Element> {
        let Ok(list) = root.query_selector_all("*") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn location(&self) -> PageLocation {
        PageLocation::new(self.window.location().href().unwrap_or_default())
    }
}

/// Overlay nodes appended to the live document.
pub struct WebSurface {
    document: Document,
}

impl WebSurface {
    pub fn new() -> Result<Self> {
        Ok(Self {
            document: document()?,
        })
    }
}

impl OverlaySurface for WebSurface {
    type Node = HtmlElement;

    fn create_node(&mut self, parent: Option<&HtmlElement>, id: Option<&str>) -> Result<HtmlElement> {
        let element = self
            .document
            .create_element("div")
            .map_err(|e| SheetlightError::dom(&e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SheetlightError::Dom("div is not an HtmlElement".to_string()))?;
        if let Some(id) = id {
            element.set_id(id);
        }
        let parent: HtmlElement = match parent {
            Some(parent) => parent.clone(),
            None => self
                .document
                .body()
                .ok_or_else(|| SheetlightError::Dom("no document body".to_string()))?,
        };
        parent
            .append_child(&element)
            .map_err(|e| SheetlightError::dom(&e))?;
        Ok(element)
    }

    fn set_style(&mut self, node: &HtmlElement, property: &str, value: &str) -> Result<()> {
        node.style()
            .set_property(property, value)
            .map_err(|e| SheetlightError::dom(&e))
    }
}
