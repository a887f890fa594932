//! The document the drawer operates on.
//!
//! The controller never touches `web-sys` directly; it talks to a [`Dom`].
//! On `wasm32` that is the browser document, everywhere the in-memory
//! [`MemoryDom`] can stand in for it.

use std::fmt::Debug;

#[cfg(target_arch = "wasm32")]
mod browser;
mod memory;
mod selector;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserDom;
pub use memory::{MemoryDom, NodeId};

/// The DOM operations the drawer needs.
///
/// Mutations are infallible from the caller's point of view: a backend that
/// can fail (the browser) logs and carries on, matching how a page script
/// would ignore a rejected `classList.add`.
pub trait Dom {
    type Node: Clone + PartialEq + Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Descendants of `root` matching `selector`, in document order.
    fn query_all_within(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn matches(&self, node: &Self::Node, selector: &str) -> bool;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Sets or clears `overflow: hidden` on the document element.
    fn set_scroll_locked(&self, locked: bool);

    fn focus(&self, node: &Self::Node);

    fn active_element(&self) -> Option<Self::Node>;
}

/// Nearest inclusive ancestor of `start` matching `selector`.
///
/// Returns `None` for detached elements, like `Element.closest` in browsers
/// that had to have it polyfilled.
pub fn closest<D: Dom + ?Sized>(dom: &D, start: &D::Node, selector: &str) -> Option<D::Node> {
    if !dom.is_connected(start) {
        return None;
    }
    let mut cursor = Some(start.clone());
    while let Some(node) = cursor {
        if dom.matches(&node, selector) {
            return Some(node);
        }
        cursor = dom.parent(&node);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_finds_self_then_ancestors() {
        let dom = MemoryDom::new();
        let panel = dom.element(dom.body(), "div", &[("id", "p1"), ("data-drawer-target", "")]);
        let header = dom.element(panel, "div", &[]);
        let close = dom.element(header, "button", &[("data-drawer-close", "")]);

        assert_eq!(closest(&dom, &close, "[data-drawer-close]"), Some(close));
        assert_eq!(closest(&dom, &close, "[data-drawer-target]"), Some(panel));
        assert_eq!(closest(&dom, &header, "[data-drawer-trigger]"), None);
    }

    #[test]
    fn closest_reaches_document_element() {
        let dom = MemoryDom::new();
        let leaf = dom.element(dom.body(), "span", &[]);
        assert_eq!(closest(&dom, &leaf, "html"), Some(dom.document_element()));
    }

    #[test]
    fn closest_ignores_detached_elements() {
        let dom = MemoryDom::new();
        let orphan = dom.create_element("div", &[("data-drawer-target", "")]);
        assert_eq!(closest(&dom, &orphan, "[data-drawer-target]"), None);
    }
}
