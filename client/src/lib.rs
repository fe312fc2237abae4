//! # hotelsocial-client
//!
//! Leptos + WASM front-end for HotelSocial: the sign-in/sign-up page, the
//! guest home page and the admin shell.
//!
//! Session logic (token codec, claims, token store, request layer, state
//! holder) lives in `hotelsocial-session`; this crate supplies the browser
//! adapters for it and the UI on top. Browser-only code is gated behind the
//! `csr` feature so pure helpers stay testable on the host.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: route `log` to the console and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
