//! Host-tree seam.
//!
//! The engine never touches a real DOM. Everything it needs from the host
//! tree goes through [`DomAdapter`]: reading bounding boxes, applying visual
//! transforms, toggling indicator attributes, and moving child nodes during
//! reconciliation.

use crate::geometry::Rect;

// =============================================================================
// Indicator Attributes
// =============================================================================

/// Positional indicator attributes mirrored onto host nodes.
///
/// `Index` is always re-applied; the others are set once and tracked by the
/// element record until flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Provisional index within the branch.
    Index,
    /// Dragged element is visually out of its slot.
    OutPos,
    /// Dragged element has left its container bounds.
    OutContainer,
    /// Element is the active dragged unit.
    Dragged,
}

impl Indicator {
    /// Attribute name on the host node.
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Index => "data-index",
            Indicator::OutPos => "data-dragged-out-position",
            Indicator::OutContainer => "data-dragged-out-container",
            Indicator::Dragged => "data-dragged",
        }
    }
}

// =============================================================================
// Adapter Contract
// =============================================================================

/// Narrow contract to the host tree.
///
/// Implementations must be cheap: the controller calls into the adapter once
/// per pointer-move sample.
pub trait DomAdapter {
    /// Current bounding box of a node, if the node exists.
    fn rect(&self, id: &str) -> Option<Rect>;

    /// Apply a visual x/y offset to a node.
    fn transform(&mut self, id: &str, x: f64, y: f64);

    fn set_attribute(&mut self, id: &str, attr: Indicator, value: &str);

    fn remove_attribute(&mut self, id: &str, attr: Indicator);

    /// Move `id` to sit immediately before `before` among `parent`'s children.
    fn insert_before(&mut self, parent: &str, id: &str, before: &str);

    /// Move `id` to the end of `parent`'s children.
    fn append_child(&mut self, parent: &str, id: &str);

    /// Live child order of a parent node.
    fn children(&self, parent: &str) -> Vec<String>;
}

// =============================================================================
// Mock Adapter (tests)
// =============================================================================

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;

    use super::{DomAdapter, Indicator};
    use crate::geometry::{Point, Rect};

    #[derive(Debug, Default, Clone)]
    struct MockNode {
        rect: Rect,
        transform: Point<f64>,
        attrs: HashMap<&'static str, String>,
    }

    /// In-memory host tree for tests. Tracks applied transforms, attribute
    /// state, child order per parent, and the number of node moves.
    #[derive(Debug, Default)]
    pub struct MockDom {
        nodes: HashMap<String, MockNode>,
        children: HashMap<String, Vec<String>>,
        pub moves: usize,
    }

    impl MockDom {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a node with its bounding box.
        pub fn add_node(&mut self, id: &str, rect: Rect) {
            self.nodes.insert(
                id.to_string(),
                MockNode {
                    rect,
                    ..Default::default()
                },
            );
        }

        /// Register a node and append it to a parent's child list.
        pub fn add_child(&mut self, parent: &str, id: &str, rect: Rect) {
            self.add_node(id, rect);
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(id.to_string());
        }

        pub fn transform_of(&self, id: &str) -> Point<f64> {
            self.nodes.get(id).map(|n| n.transform).unwrap_or_default()
        }

        pub fn attr(&self, id: &str, attr: Indicator) -> Option<&str> {
            self.nodes
                .get(id)
                .and_then(|n| n.attrs.get(attr.as_str()))
                .map(String::as_str)
        }

        pub fn set_rect(&mut self, id: &str, rect: Rect) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.rect = rect;
            }
        }

        fn detach(&mut self, id: &str) {
            for siblings in self.children.values_mut() {
                siblings.retain(|c| c != id);
            }
        }
    }

    impl DomAdapter for MockDom {
        fn rect(&self, id: &str) -> Option<Rect> {
            self.nodes.get(id).map(|n| n.rect)
        }

        fn transform(&mut self, id: &str, x: f64, y: f64) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.transform.set_axes(x, y);
            }
        }

        fn set_attribute(&mut self, id: &str, attr: Indicator, value: &str) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.attrs.insert(attr.as_str(), value.to_string());
            }
        }

        fn remove_attribute(&mut self, id: &str, attr: Indicator) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.attrs.remove(attr.as_str());
            }
        }

        fn insert_before(&mut self, parent: &str, id: &str, before: &str) {
            self.detach(id);
            let siblings = self.children.entry(parent.to_string()).or_default();
            let at = siblings.iter().position(|c| c == before).unwrap_or(siblings.len());
            siblings.insert(at, id.to_string());
            self.moves += 1;
        }

        fn append_child(&mut self, parent: &str, id: &str) {
            self.detach(id);
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(id.to_string());
            self.moves += 1;
        }

        fn children(&self, parent: &str) -> Vec<String> {
            self.children.get(parent).cloned().unwrap_or_default()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_insert_before_reorders() {
            let mut dom = MockDom::new();
            dom.add_child("p", "a", Rect::default());
            dom.add_child("p", "b", Rect::default());
            dom.add_child("p", "c", Rect::default());

            dom.insert_before("p", "c", "a");
            assert_eq!(dom.children("p"), vec!["c", "a", "b"]);
            assert_eq!(dom.moves, 1);

            dom.append_child("p", "c");
            assert_eq!(dom.children("p"), vec!["a", "b", "c"]);
            assert_eq!(dom.moves, 2);
        }
    }
}
