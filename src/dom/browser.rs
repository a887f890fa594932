use dioxus::logger::tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

use super::Dom;
use crate::error::DrawerError;

/// The page's live document.
#[derive(Debug, Clone)]
pub struct BrowserDom {
    document: Document,
}

impl BrowserDom {
    pub fn new() -> Result<Self, DrawerError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DrawerError::Browser("no document".into()))?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn elements(list: NodeList) -> Vec<Element> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }
}

impl Dom for BrowserDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => Self::elements(list),
            Err(e) => {
                warn!("querySelectorAll({selector:?}) failed: {e:?}");
                vec![]
            }
        }
    }

    fn query_all_within(&self, root: &Element, selector: &str) -> Vec<Element> {
        match root.query_selector_all(selector) {
            Ok(list) => Self::elements(list),
            Err(e) => {
                warn!("querySelectorAll({selector:?}) failed: {e:?}");
                vec![]
            }
        }
    }

    fn matches(&self, node: &Element, selector: &str) -> bool {
        node.matches(selector).unwrap_or_else(|e| {
            warn!("matches({selector:?}) failed: {e:?}");
            false
        })
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            warn!("setAttribute({name:?}) failed: {e:?}");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            warn!("classList.add({class:?}) failed: {e:?}");
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().remove_1(class) {
            warn!("classList.remove({class:?}) failed: {e:?}");
        }
    }

    fn set_scroll_locked(&self, locked: bool) {
        let Some(root) = self
            .document
            .document_element()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let style = root.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(e) = result {
            warn!("could not update page scroll lock: {e:?}");
        }
    }

    fn focus(&self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            if let Err(e) = el.focus() {
                warn!("focus failed: {e:?}");
            }
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }
}
