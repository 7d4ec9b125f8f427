//! # tasktracker-client
//!
//! Leptos + WASM frontend for the task tracker.
//!
//! This crate contains pages, components, application state, and the REST
//! request client. The session lifecycle lives in `state::session`, admission
//! control for protected routes in `components::route_gate`, and the single
//! request path every page goes through in `net::request`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: installs logging + panic hooks and mounts the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
