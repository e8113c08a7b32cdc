//! DOM access behind two narrow traits.
//!
//! The locators only ever read the host page (`HostDocument`), and the
//! renderer only ever creates and styles its own overlay nodes
//! (`OverlaySurface`). Keeping both behind traits lets the whole geometry
//! pipeline run natively against [`memory`] while the browser build uses
//! [`web`]:
//! - `memory`: in-memory elements with fixed rectangles, used by tests and the CLI
//! - `web`: `web-sys` bindings (wasm32 only)

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::error::Result;
use crate::types::PageRect;

pub use memory::{MemoryDocument, MemoryElement, MemoryNode, MemorySurface};

/// A single inline style declaration: CSS property name and value.
pub type StyleDecl = (&'static str, String);

/// Where the page is, as far as the locators care.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    /// Full URL
    pub href: String,
}

impl PageLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Host name, or empty when the URL does not parse.
    pub fn host(&self) -> String {
        url::Url::parse(&self.href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
            .unwrap_or_default()
    }

    /// Path component, or the raw href when the URL does not parse.
    pub fn pathname(&self) -> String {
        url::Url::parse(&self.href)
            .map(|url| url.path().to_owned())
            .unwrap_or_else(|_| self.href.clone())
    }
}

/// An element of the host page.
pub trait HostElement {
    /// Bounding box in browser frame.
    fn bounding_rect(&self) -> PageRect;

    /// False when the element's inline style hides it (`display: none`).
    fn is_displayed(&self) -> bool;
}

/// Read-only queries against the host page.
///
/// Every call re-queries; implementations must not cache host nodes because
/// the host re-renders its DOM out-of-band between update cycles.
pub trait HostDocument {
    type Element: HostElement;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn elements_by_class(&self, class: &str) -> Vec<Self::Element>;

    /// All descendants of `root`, in document order.
    fn descendants(&self, root: &Self::Element) -> Vec<Self::Element>;

    fn location(&self) -> PageLocation;
}

/// Creates and styles the overlay's own nodes.
pub trait OverlaySurface {
    type Node: Clone;

    /// Create a `div` appended to `parent`, or to the document body when `parent` is `None`.
    fn create_node(&mut self, parent: Option<&Self::Node>, id: Option<&str>) -> Result<Self::Node>;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> Result<()>;

    fn apply_style(&mut self, node: &Self::Node, decls: &[StyleDecl]) -> Result<()> {
        for (property, value) in decls {
            self.set_style(node, property, value)?;
        }
        Ok(())
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
    fn location_parts() {
        let location = PageLocation::new("https://docs.google.com/spreadsheets/d/abc123/edit#gid=0");
        assert_eq!(location.host(), "docs.google.com");
        assert_eq!(location.pathname(), "/spreadsheets/d/abc123/edit");
    }

    #[test]
    fn unparsable_location_falls_back_to_raw_href() {
        let location = PageLocation::new("not a url");
        assert_eq!(location.host(), "");
        assert_eq!(location.pathname(), "not a url");
    }
}
