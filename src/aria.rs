use crate::dom::Dom;

pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const ARIA_CONTROLS: &str = "aria-controls";

/// The `aria-expanded` value after a toggle: `"true"` becomes `"false"`,
/// anything else (including a missing attribute) becomes `"true"`.
pub fn toggle_expanded(current: Option<&str>) -> &'static str {
    if current == Some("true") { "false" } else { "true" }
}

/// Writes the canonical `aria-expanded` value, leaving the attribute alone
/// when it already holds it.
pub fn set_expanded<D: Dom>(dom: &D, node: &D::Node, expanded: bool) {
    let value = if expanded { "true" } else { "false" };
    if dom.attribute(node, ARIA_EXPANDED).as_deref() != Some(value) {
        dom.set_attribute(node, ARIA_EXPANDED, value);
    }
}
