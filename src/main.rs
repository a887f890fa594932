//! Demo app. Drawers only respond under the web renderer, and no renderer is
//! enabled by default: serve with `dx serve --platform web`, or build with
//! `cargo build --target wasm32-unknown-unknown --features web`.

use dioxus::{logger::tracing::Level, prelude::*};

use drawer::App;

fn main() -> anyhow::Result<()> {
    dioxus::logger::init(Level::INFO)?;
    LaunchBuilder::new().launch(App);
    Ok(())
}
