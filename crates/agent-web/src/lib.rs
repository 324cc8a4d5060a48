//! ReAct agent Web Frontend
//!
//! Leptos-based WASM chat interface. Answers go to the main panel; the
//! agent's thoughts, actions and observations go to a side panel.

mod app;
mod pages;
mod components;
mod api;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
