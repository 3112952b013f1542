//! Light/dark theme preference.
//!
//! The preference lives in the key-value store under the configured theme
//! key and is applied as a `data-theme` attribute on `<html>`.
//!
//! TRADE-OFFS
//! ==========
//! Applying the attribute and reading the system preference need a browser;
//! outside the `csr` build both are no-ops so the read/toggle logic stays
//! testable on the host.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::net::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// `"dark"` is dark; anything else is light.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("dark") { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Stored preference, then the system preference, then `fallback`.
pub fn read_preference(store: &impl KeyValueStore, key: &str, fallback: ThemeMode) -> ThemeMode {
    match store.get(key).as_deref() {
        Some("dark") => ThemeMode::Dark,
        Some("light") => ThemeMode::Light,
        _ => system_preference().unwrap_or(fallback),
    }
}

fn system_preference() -> Option<ThemeMode> {
    #[cfg(feature = "csr")]
    {
        let query = web_sys::window()?.match_media("(prefers-color-scheme: dark)").ok().flatten()?;
        Some(if query.matches() { ThemeMode::Dark } else { ThemeMode::Light })
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Set the `data-theme` attribute on the `<html>` element.
pub fn apply(mode: ThemeMode) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) {
            if let Err(e) = el.set_attribute("data-theme", mode.as_str()) {
                log::warn!("failed to apply theme: {e:?}");
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = mode;
    }
}

/// Flip the theme, apply it, and persist the new value.
pub fn toggle(store: &impl KeyValueStore, key: &str, current: ThemeMode) -> ThemeMode {
    let next = current.toggled();
    apply(next);
    store.set(key, next.as_str());
    log::debug!("theme set to {}", next.as_str());
    next
}
