//! A slide-in drawer panel driven by delegated document events.
//!
//! Page markup opts in through data attributes (see [`ui`]); a mounted
//! [`Drawer`] opens panels from their triggers, closes them from close
//! elements and Escape, keeps Tab inside the open panel and mirrors the state
//! in `aria-expanded`.

use dioxus::prelude::*;

pub mod aria;
pub mod dom;
pub mod drawer;
pub mod error;
pub mod focus;
#[cfg(target_arch = "wasm32")]
pub mod mount;
pub mod settings;
pub mod timers;
pub mod ui;

pub use drawer::{Dispatch, Drawer, Key, KeyInput, Phase};
pub use error::DrawerError;
pub use settings::DrawerSettings;

use ui::home::Home;
use ui::panel::{DrawerPanel, DrawerScope, DrawerTrigger, Side};

const DRAWER_CSS: Asset = asset!("/assets/drawer.css");

#[component]
pub fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: DRAWER_CSS }
        Router::<Route> {}
    }
}

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Layout)]
    #[route("/")]
    Home {},
    #[route("/:..segments")]
    Missing { segments: Vec<String> },
}

/// Every page gets drawer behaviour and the navigation drawer.
#[component]
fn Layout() -> Element {
    rsx! {
        DrawerScope {
            Outlet::<Route> {}
            DrawerPanel {
                id: "drawer-nav",
                title: "Menu",
                side: Side::Left,
                nav {
                    ul {
                        li { Link { to: Route::Home {}, "Drawers" } }
                        li { a { href: "#overview", "Overview" } }
                        li { a { href: "#contact", "Contact" } }
                    }
                }
            }
        }
    }
}

#[component]
fn Missing(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        main {
            class: "demo",
            h1 { "Nothing at /{path}" }
            p { "The menu lists the pages that exist." }
            DrawerTrigger { controls: "drawer-nav", "Open menu" }
        }
    }
}
