use std::cell::RefCell;
use std::rc::Rc;

use dioxus::logger::tracing::warn;

use super::Dom;
use super::selector::{SelectorList, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Subject for ElementData {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<ElementData>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    scroll_locked: bool,
}

/// A small element tree with just enough DOM behaviour for the drawer.
///
/// Cloning is cheap and yields a handle to the same document, so a test can
/// keep one handle while the controller owns another.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document: `<html><body></body></html>`.
    pub fn new() -> Self {
        let html = ElementData {
            tag: "html".into(),
            attrs: vec![],
            parent: None,
            children: vec![NodeId(1)],
        };
        let body = ElementData {
            tag: "body".into(),
            attrs: vec![],
            parent: Some(NodeId(0)),
            children: vec![],
        };
        Self {
            tree: Rc::new(RefCell::new(Tree {
                nodes: vec![html, body],
                root: NodeId(0),
                body: NodeId(1),
                focused: None,
                scroll_locked: false,
            })),
        }
    }

    pub fn document_element(&self) -> NodeId {
        self.tree.borrow().root
    }

    pub fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.nodes.len());
        tree.nodes.push(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            parent: None,
            children: vec![],
        });
        id
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append(&self, parent: NodeId, child: NodeId) {
        self.remove(child);
        let mut tree = self.tree.borrow_mut();
        tree.nodes[child.0].parent = Some(parent);
        tree.nodes[parent.0].children.push(child);
    }

    /// Creates an element and appends it to `parent`.
    pub fn element(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.create_element(tag, attrs);
        self.append(parent, node);
        node
    }

    /// Detaches `node` (and its subtree) from its parent.
    pub fn remove(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        if let Some(parent) = tree.nodes[node.0].parent.take() {
            tree.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.attribute(&node, "class")
            .map(|c| c.split_ascii_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn scroll_locked(&self) -> bool {
        self.tree.borrow().scroll_locked
    }

    fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&ElementData) -> R) -> R {
        f(&self.tree.borrow().nodes[node.0])
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut out = vec![];
        let mut stack: Vec<NodeId> = tree.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(tree.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn selector(selector: &str) -> Option<SelectorList> {
        match SelectorList::parse(selector) {
            Ok(list) => Some(list),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    fn filter(&self, nodes: Vec<NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(list) = Self::selector(selector) else {
            return vec![];
        };
        let tree = self.tree.borrow();
        nodes
            .into_iter()
            .filter(|n| list.matches(&tree.nodes[n.0]))
            .collect()
    }

    fn edit_classes(&self, node: NodeId, edit: impl FnOnce(&mut Vec<String>)) {
        let mut classes = self.classes(node);
        edit(&mut classes);
        self.set_attribute(&node, "class", &classes.join(" "));
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.document_element();
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|n| self.with_element(*n, |e| e.attr("id") == Some(id)))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let root = self.document_element();
        let mut nodes = vec![root];
        nodes.extend(self.descendants(root));
        self.filter(nodes, selector)
    }

    fn query_all_within(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        self.filter(self.descendants(*root), selector)
    }

    fn matches(&self, node: &NodeId, selector: &str) -> bool {
        Self::selector(selector)
            .map(|list| self.with_element(*node, |e| list.matches(e)))
            .unwrap_or(false)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.with_element(*node, |e| e.parent)
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let root = self.document_element();
        let mut cursor = Some(*node);
        while let Some(n) = cursor {
            if n == root {
                return true;
            }
            cursor = self.parent(&n);
        }
        false
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut cursor = Some(*node);
        while let Some(n) = cursor {
            if n == *ancestor {
                return true;
            }
            cursor = self.parent(&n);
        }
        false
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_element(*node, |e| e.attr(&name.to_ascii_lowercase()).map(String::from))
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let mut tree = self.tree.borrow_mut();
        let attrs = &mut tree.nodes[node.0].attrs;
        match attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name, value.to_string())),
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        self.edit_classes(*node, |classes| classes.push(class.to_string()));
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        self.edit_classes(*node, |classes| classes.retain(|c| c != class));
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.tree.borrow_mut().scroll_locked = locked;
    }

    fn focus(&self, node: &NodeId) {
        if self.is_connected(node) {
            self.tree.borrow_mut().focused = Some(*node);
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        let focused = self.tree.borrow().focused;
        match focused {
            Some(n) if self.is_connected(&n) => Some(n),
            _ => Some(self.body()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_all_is_in_document_order() {
        let dom = MemoryDom::new();
        let a = dom.element(dom.body(), "div", &[("data-drawer-target", ""), ("id", "a")]);
        let inner = dom.element(a, "div", &[("data-drawer-target", ""), ("id", "inner")]);
        let b = dom.element(dom.body(), "div", &[("data-drawer-target", ""), ("id", "b")]);

        assert_eq!(dom.query_all("[data-drawer-target]"), vec![a, inner, b]);
        assert_eq!(dom.query_all_within(&a, "div"), vec![inner]);
        assert_eq!(dom.element_by_id("b"), Some(b));
        assert_eq!(dom.element_by_id("missing"), None);
    }

    #[test]
    fn detached_subtrees_are_invisible_to_queries() {
        let dom = MemoryDom::new();
        let panel = dom.element(dom.body(), "div", &[("id", "p1")]);
        dom.remove(panel);
        assert_eq!(dom.element_by_id("p1"), None);
        assert!(!dom.is_connected(&panel));
    }

    #[test]
    fn class_list_edits() {
        let dom = MemoryDom::new();
        let panel = dom.element(dom.body(), "div", &[("class", "drawer")]);
        dom.add_class(&panel, "is-active");
        dom.add_class(&panel, "is-active");
        assert_eq!(dom.classes(panel), vec!["drawer", "is-active"]);
        dom.remove_class(&panel, "drawer");
        assert_eq!(dom.classes(panel), vec!["is-active"]);
        assert!(dom.matches(&panel, ".is-active"));
    }

    #[test]
    fn focus_follows_connection() {
        let dom = MemoryDom::new();
        let button = dom.element(dom.body(), "button", &[]);
        dom.focus(&button);
        assert_eq!(dom.active_element(), Some(button));
        dom.remove(button);
        assert_eq!(dom.active_element(), Some(dom.body()));
    }

    #[test]
    fn bad_selector_matches_nothing() {
        let dom = MemoryDom::new();
        dom.element(dom.body(), "div", &[]);
        assert!(dom.query_all("div > span").is_empty());
    }
}
