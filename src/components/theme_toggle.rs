//! Floating light/dark switch pinned to the bottom-right corner.

#[cfg(test)]
#[path = "theme_toggle_test.rs"]
mod theme_toggle_test;

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::net::storage::BrowserStorage;
use crate::util::theme::{self, ThemeMode};

/// Tooltip naming the mode a click switches to.
pub fn toggle_title(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "Switch to dark mode",
        ThemeMode::Dark => "Switch to light mode",
    }
}

pub fn toggle_glyph(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "☾",
        ThemeMode::Dark => "☀",
    }
}

#[component]
pub fn FloatingThemeToggle() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let theme_mode = expect_context::<RwSignal<ThemeMode>>();

    let theme_key = config.theme_storage_key;
    let on_click = move |_| {
        let next = theme::toggle(&BrowserStorage, &theme_key, theme_mode.get_untracked());
        theme_mode.set(next);
    };

    view! {
        <button
            class="theme-fab"
            type="button"
            on:click=on_click
            title=move || toggle_title(theme_mode.get())
            aria-label=move || toggle_title(theme_mode.get())
        >
            {move || toggle_glyph(theme_mode.get())}
        </button>
    }
}
