//! Reusable overlay elements.
//!
//! An arena of node handles indexed by position. The pool grows when a cycle
//! needs more elements than it has and hides the surplus otherwise; it never
//! shrinks, so a selection that flickers between sizes reuses the same nodes.

use super::style::hidden_style;
use crate::dom::OverlaySurface;
use crate::error::Result;

/// What one reconcile did to the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolChange {
    pub created: usize,
    pub hidden: usize,
}

pub struct ElementPool<N> {
    parent: N,
    nodes: Vec<N>,
}

impl<N: Clone> ElementPool<N> {
    /// An empty pool whose elements are created under `parent`.
    pub fn new(parent: N) -> Self {
        Self {
            parent,
            nodes: Vec::new(),
        }
    }

    /// Total elements ever created.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Make at least `count` elements exist and hide every element past `count`.
    ///
    /// The first `count` elements are left for the caller to style (and show).
    pub fn reconcile<S>(&mut self, surface: &mut S, count: usize) -> Result<PoolChange>
    where
        S: OverlaySurface<Node = N>,
    {
        let mut change = PoolChange::default();
        while self.nodes.len() < count {
            let node = surface.create_node(Some(&self.parent), None)?;
            self.nodes.push(node);
            change.created += 1;
        }
        let hidden = hidden_style();
        for node in self.nodes.iter().skip(count) {
            surface.apply_style(node, &hidden)?;
            change.hidden += 1;
        }
        Ok(change)
    }

    /// The first `count` elements, for styling after [`Self::reconcile`].
    pub fn active(&self, count: usize) -> impl Iterator<Item = &N> {
        self.nodes.iter().take(count)
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
    use crate::dom::MemorySurface;

    #[test]
    fn grows_then_hides_surplus() {
        let mut surface = MemorySurface::new();
        let parent = surface.create_node(None, Some("root")).unwrap();
        let mut pool = ElementPool::new(parent);

        let change = pool.reconcile(&mut surface, 3).unwrap();
        assert_eq!(change, PoolChange { created: 3, hidden: 0 });

        let change = pool.reconcile(&mut surface, 1).unwrap();
        assert_eq!(change, PoolChange { created: 0, hidden: 2 });
        assert_eq!(pool.size(), 3);
        assert_eq!(surface.children(parent).len(), 3);
        assert!(surface.node(3).unwrap().is_hidden());
        assert!(!surface.node(1).unwrap().is_hidden());
    }
}
