//! Dioxus components emitting the drawer markup contract.
//!
//! Triggers carry `data-drawer-trigger` and `aria-controls`, panels carry
//! `data-drawer-target` and an id, close elements carry `data-drawer-close`.

pub mod home;      // Demo page (public for routing)
pub mod panel;     // Scope, trigger and panel components
