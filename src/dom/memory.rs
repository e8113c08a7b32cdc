//! In-memory DOM used natively.
//!
//! `MemoryDocument` stands in for the host page: a flat list of elements with
//! ids, classes, parent links and fixed bounding boxes. It deserializes from
//! the JSON snapshots the CLI consumes. `MemorySurface` records the overlay
//! nodes the renderer creates and the inline styles it writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{HostDocument, HostElement, OverlaySurface, PageLocation};
use crate::error::{Result, SheetlightError};
use crate::types::PageRect;

fn default_displayed() -> bool {
    true
}

/// One element of the in-memory host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub rect: PageRect,
    #[serde(default = "default_displayed")]
    pub displayed: bool,
    /// Index of the parent element in the document's element list
    #[serde(default)]
    pub parent: Option<usize>,
}

impl MemoryElement {
    pub fn new(rect: PageRect) -> Self {
        Self {
            id: None,
            classes: Vec::new(),
            rect,
            displayed: true,
            parent: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    #[must_use]
    pub fn child_of(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Handle returned from queries: the element's index plus a copy of its data.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHandle {
    pub index: usize,
    pub element: MemoryElement,
}

impl HostElement for MemoryHandle {
    fn bounding_rect(&self) -> PageRect {
        self.element.rect
    }

    fn is_displayed(&self) -> bool {
        self.element.displayed
    }
}

/// In-memory host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub href: String,
    #[serde(default)]
    pub elements: Vec<MemoryElement>,
}

impl MemoryDocument {
    pub fn new(href: &str) -> Self {
        Self {
            href: href.to_owned(),
            elements: Vec::new(),
        }
    }

    /// Append an element and return its index (usable with [`MemoryElement::child_of`]).
    pub fn add(&mut self, element: MemoryElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Remove every element carrying `class`, re-pointing children of removed
    /// elements to nothing.
    pub fn remove_class(&mut self, class: &str) {
        let mut remap: Vec<Option<usize>> = Vec::with_capacity(self.elements.len());
        let mut next = 0;
        for element in &self.elements {
            if element.has_class(class) {
                remap.push(None);
            } else {
                remap.push(Some(next));
                next += 1;
            }
        }
        self.elements.retain(|element| !element.has_class(class));
        for element in &mut self.elements {
            element.parent = element
                .parent
                .and_then(|parent| remap.get(parent).copied().flatten());
        }
    }

    /// Mutable access to every element carrying `class`.
    pub fn elements_with_class_mut<'a>(
        &'a mut self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a mut MemoryElement> + 'a {
        self.elements.iter_mut().filter(move |e| e.has_class(class))
    }

    fn handle(&self, index: usize) -> Option<MemoryHandle> {
        self.elements.get(index).map(|element| MemoryHandle {
            index,
            element: element.clone(),
        })
    }

    fn is_descendant_of(&self, mut index: usize, root: usize) -> bool {
        // Parent chains longer than the element count mean a cycle in hand-written input.
        for _ in 0..self.elements.len() {
            match self.elements.get(index).and_then(|e| e.parent) {
                Some(parent) if parent == root => return true,
                Some(parent) => index = parent,
                None => return false,
            }
        }
        false
    }
}

impl HostDocument for MemoryDocument {
    type Element = MemoryHandle;

    fn element_by_id(&self, id: &str) -> Option<MemoryHandle> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))?;
        self.handle(index)
    }

    fn elements_by_class(&self, class: &str) -> Vec<MemoryHandle> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(class))
            .filter_map(|(index, _)| self.handle(index))
            .collect()
    }

    fn descendants(&self, root: &MemoryHandle) -> Vec<MemoryHandle> {
        (0..self.elements.len())
            .filter(|&index| self.is_descendant_of(index, root.index))
            .filter_map(|index| self.handle(index))
            .collect()
    }

    fn location(&self) -> PageLocation {
        PageLocation::new(self.href.clone())
    }
}

/// An overlay node recorded by [`MemorySurface`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    pub style: BTreeMap<String, String>,
}

impl MemoryNode {
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn is_hidden(&self) -> bool {
        self.style("display") == Some("none")
    }
}

/// Records overlay nodes and their inline styles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySurface {
    nodes: Vec<MemoryNode>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nodes ever created (nodes are never removed).
    pub fn created(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: usize) -> Option<&MemoryNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[MemoryNode] {
        &self.nodes
    }

    /// Indices of the direct children of `parent`, in creation order.
    pub fn children(&self, parent: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent == Some(parent))
            .map(|(index, _)| index)
            .collect()
    }
}

impl OverlaySurface for MemorySurface {
    type Node = usize;

    fn create_node(&mut self, parent: Option<&usize>, id: Option<&str>) -> Result<usize> {
        if let Some(&parent) = parent {
            if parent >= self.nodes.len() {
                return Err(SheetlightError::Dom(format!("no overlay node {parent}")));
            }
        }
        self.nodes.push(MemoryNode {
            id: id.map(str::to_owned),
            parent: parent.copied(),
            style: BTreeMap::new(),
        });
        Ok(self.nodes.len() - 1)
    }

    fn set_style(&mut self, node: &usize, property: &str, value: &str) -> Result<()> {
        let node = self
            .nodes
            .get_mut(*node)
            .ok_or_else(|| SheetlightError::Dom(format!("no overlay node {node}")))?;
        node.style.insert(property.to_owned(), value.to_owned());
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
    fn descendants_follow_parent_chain() {
        let mut doc = MemoryDocument::new("https://example.com/");
        let root = doc.add(MemoryElement::new(PageRect::new(0.0, 0.0, 100.0, 20.0)).with_class("headers"));
        let row = doc.add(MemoryElement::new(PageRect::new(0.0, 0.0, 100.0, 20.0)).child_of(root));
        doc.add(MemoryElement::new(PageRect::new(0.0, 0.0, 50.0, 20.0)).child_of(row));
        doc.add(MemoryElement::new(PageRect::new(0.0, 40.0, 50.0, 20.0)));

        let root_handle = doc.elements_by_class("headers").remove(0);
        let indices: Vec<usize> = doc.descendants(&root_handle).iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn remove_class_repoints_parents() {
        let mut doc = MemoryDocument::new("https://example.com/");
        doc.add(MemoryElement::new(PageRect::default()).with_class("gone"));
        let keep = doc.add(MemoryElement::new(PageRect::default()).with_id("keep"));
        doc.add(MemoryElement::new(PageRect::default()).child_of(keep));
        doc.remove_class("gone");
        assert_eq!(doc.elements.len(), 2);
        assert_eq!(doc.elements[1].parent, Some(0));
    }

    #[test]
    fn surface_rejects_unknown_parent() {
        let mut surface = MemorySurface::new();
        assert!(surface.create_node(Some(&3), None).is_err());
        let root = surface.create_node(None, Some("root")).unwrap();
        let child = surface.create_node(Some(&root), None).unwrap();
        surface.set_style(&child, "display", "none").unwrap();
        assert!(surface.node(child).unwrap().is_hidden());
        assert_eq!(surface.children(root), vec![child]);
    }

    #[test]
    fn snapshot_elements_default_to_displayed() {
        let doc: MemoryDocument = serde_json::from_str(
            r#"{"href":"https://docs.google.com/spreadsheets/d/k/edit",
                "elements":[{"classes":["selection"],"rect":{"x":1,"y":2,"width":3,"height":4}}]}"#,
        )
        .unwrap();
        assert!(doc.elements[0].displayed);
        assert_eq!(doc.elements[0].rect.width, 3.0);
    }
}
