//! # registry-client
//!
//! Leptos + WASM front-end for the student registry. Session handling, the
//! REST client and route gating come from the `registry` crate; this crate
//! supplies the browser seams (`fetch`, `localStorage`, `window.location`),
//! the reactive bridge and the pages.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

/// WASM entry point: install panic and console logging, then mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
