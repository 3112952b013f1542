//! # scrapeboard
//!
//! Leptos + WASM client for browsing scraped URLs and the links extracted
//! from them, behind a login/register flow.
//!
//! The session store and the paged list controller in `state` carry the
//! application logic; `net` holds the HTTP and storage collaborators they
//! are built from, and `pages`/`components` render them.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Browser entry point: logging, panic hook, then mount [`app::App`].
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = app::load_config().log_level.to_level().unwrap_or(log::Level::Info);
    let _ = console_log::init_with_level(level);
    leptos::mount::mount_to_body(app::App);
}
