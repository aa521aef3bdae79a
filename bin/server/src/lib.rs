//! Compliance console web server and UI.
//!
//! The server (`ssr`) runs the edge access filter in front of the Leptos
//! application. The browser build (`hydrate`) owns token storage, identity
//! hydration, token renewal and the role guard.

#![allow(non_snake_case)]

pub mod app;
pub mod pages;
pub mod session;
pub mod settings;

#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod edge;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
