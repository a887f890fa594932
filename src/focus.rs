use crate::dom::Dom;

/// Elements that take part in Tab cycling inside an open drawer.
pub const FOCUSABLE: &str = concat!(
    "a[href]:not([disabled]), ",
    "button:not([disabled]), ",
    "textarea:not([disabled]), ",
    r#"input[type="text"]:not([disabled]), "#,
    r#"input[type="radio"]:not([disabled]), "#,
    r#"input[type="checkbox"]:not([disabled]), "#,
    "select:not([disabled])",
);

/// Keeps Tab and Shift+Tab cycling inside a container.
///
/// The focusable set is captured when the trap is created, which happens when
/// a panel becomes visible.
#[derive(Debug, Clone)]
pub struct FocusTrap<N> {
    container: N,
    first: Option<N>,
    last: Option<N>,
}

impl<N: Clone + PartialEq> FocusTrap<N> {
    pub fn new<D: Dom<Node = N>>(dom: &D, container: &N) -> Self {
        let focusable = dom.query_all_within(container, FOCUSABLE);
        Self {
            container: container.clone(),
            first: focusable.first().cloned(),
            last: focusable.last().cloned(),
        }
    }

    pub fn container(&self) -> &N {
        &self.container
    }

    /// Handles a Tab press. Returns `true` when focus was wrapped and the
    /// browser's own focus move has to be suppressed.
    pub fn handle_tab<D: Dom<Node = N>>(&self, dom: &D, shift: bool) -> bool {
        let (Some(first), Some(last)) = (&self.first, &self.last) else {
            return false;
        };
        let active = dom.active_element();
        let (edge, wrap_to) = if shift { (first, last) } else { (last, first) };
        if active.as_ref() == Some(edge) {
            dom.focus(wrap_to);
            return true;
        }
        false
    }
}
