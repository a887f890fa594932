//! Demo page: the layout's navigation drawer on the left, a form drawer on
//! the right.

use dioxus::prelude::*;

use crate::ui::panel::{DrawerContext, DrawerPanel, DrawerTrigger};

#[component]
pub fn Home() -> Element {
    let drawers = use_context::<DrawerContext>();
    rsx! {
        main {
            class: "demo",
            h1 { "Drawers" }
            p {
                "Open a drawer, then close it with its button, the backdrop or Escape. "
                "Tab stays inside an open drawer."
            }
            div {
                class: "demo__actions",
                DrawerTrigger { controls: "drawer-nav", "Menu" }
                DrawerTrigger { controls: "drawer-profile", "Edit profile" }
                button {
                    r#type: "button",
                    onclick: move |_| drawers.toggle("drawer-profile"),
                    "Toggle profile from code"
                }
            }
        }
        DrawerPanel {
            id: "drawer-profile",
            title: "Profile",
            form {
                label { "Name" input { r#type: "text", name: "name" } }
                fieldset {
                    legend { "Plan" }
                    label { input { r#type: "radio", name: "plan", value: "free" } "Free" }
                    label { input { r#type: "radio", name: "plan", value: "team" } "Team" }
                }
                label { input { r#type: "checkbox", name: "newsletter" } "Newsletter" }
                label {
                    "Notes"
                    textarea { name: "notes" }
                }
                button { r#type: "button", "data-drawer-close": "true", "Save" }
            }
        }
    }
}
