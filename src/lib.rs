//! Quickdraw core crate.
//!
//! A casual sketching game: the player picks a mode, receives a prompt,
//! draws it on a raster canvas before the countdown runs out and collects a
//! score; finished drawings can be saved to a remote document store under a
//! username. The gameplay core (surface, stroke capture, round machine,
//! session, store contract) is pure Rust and tested on the host; the `web`
//! module binds it to the DOM and only exists on wasm targets.

pub mod game;
pub mod round;
pub mod session;
pub mod sketch;
pub mod store;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// Optional small allocator for size (feature gated, wasm only)
#[cfg(all(target_arch = "wasm32", feature = "wee_alloc"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_console_log();
}

/// Entry point called from JS. The prompt service URL and the document
/// store endpoint plus its credential are supplied here, at process start;
/// nothing else is configurable from the outside.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_game(prompt_url: String, store_url: String, store_key: String) -> Result<(), JsValue> {
    web::start(web::WebConfig { prompt_url, store_url, store_key })
}
