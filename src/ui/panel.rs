use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use crate::settings::DrawerSettings;

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};

/// Shared with every component below a [`DrawerScope`].
#[derive(Clone)]
pub struct DrawerContext {
    #[cfg(target_arch = "wasm32")]
    handle: Rc<RefCell<Option<crate::mount::DrawerHandle>>>,
}

impl DrawerContext {
    #[cfg(target_arch = "wasm32")]
    fn mount(settings: DrawerSettings) -> Self {
        let handle = match crate::mount::mount(settings) {
            Ok(h) => Some(h),
            Err(e) => {
                warn!("drawer mount failed: {e}");
                None
            }
        };
        Self {
            handle: Rc::new(RefCell::new(handle)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn mount(_settings: DrawerSettings) -> Self {
        warn!("drawers need the web renderer; triggers will not respond");
        Self {}
    }

    fn unmount(&self) {
        #[cfg(target_arch = "wasm32")]
        self.handle.borrow_mut().take();
    }

    /// Opens or closes a panel from code, as if its trigger had been clicked.
    pub fn toggle(&self, panel_id: &str) {
        #[cfg(target_arch = "wasm32")]
        match self.handle.borrow().as_ref() {
            Some(handle) => {
                if let Err(e) = handle.toggle(panel_id) {
                    warn!("drawer: {e}");
                }
            }
            None => warn!("drawer {panel_id}: not mounted"),
        }
        #[cfg(not(target_arch = "wasm32"))]
        warn!("drawer {panel_id}: no browser document to drive");
    }
}

/// Mounts the drawer behaviour for as long as it is rendered. Triggers,
/// close buttons and panels anywhere on the page are picked up through the
/// document, they do not have to be children of the scope.
#[component]
pub fn DrawerScope(#[props(default)] settings: DrawerSettings, children: Element) -> Element {
    let ctx = use_context_provider(move || DrawerContext::mount(settings));
    use_drop(move || ctx.unmount());
    rsx! {
        {children}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    fn class(self) -> &'static str {
        match self {
            Side::Left => "drawer--left",
            Side::Right => "drawer--right",
        }
    }
}

#[component]
pub fn DrawerTrigger(
    controls: String,
    #[props(default)] class: String,
    children: Element,
) -> Element {
    rsx! {
        button {
            r#type: "button",
            class: "drawer-trigger {class}",
            "data-drawer-trigger": "true",
            "aria-controls": "{controls}",
            "aria-expanded": "false",
            {children}
        }
    }
}

#[component]
pub fn DrawerPanel(
    id: String,
    #[props(default)] title: String,
    #[props(default)] side: Side,
    children: Element,
) -> Element {
    let side = side.class();
    rsx! {
        section {
            id: "{id}",
            class: "drawer {side}",
            "data-drawer-target": "true",
            div {
                class: "drawer__overlay",
                tabindex: "-1",
                "data-drawer-close": "true",
            }
            div {
                class: "drawer__wrapper",
                div {
                    class: "drawer__header",
                    div { class: "drawer__title", "{title}" }
                    button {
                        r#type: "button",
                        class: "drawer__close",
                        "aria-label": "Close drawer",
                        "data-drawer-close": "true",
                    }
                }
                div {
                    class: "drawer__content",
                    {children}
                }
            }
        }
    }
}
