//! Development-only build panel: version, environment, API base URL, and
//! which feature flags are on. Renders nothing outside development.

#[cfg(test)]
#[path = "app_info_test.rs"]
mod app_info_test;

use leptos::prelude::*;

use crate::config::AppConfig;

/// Chip labels for the enabled feature flags, in display order.
pub fn feature_chips(config: &AppConfig) -> Vec<&'static str> {
    [
        (config.enable_registration, "Registration"),
        (config.enable_password_reset, "Password Reset"),
        (config.debug_mode, "Debug"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect()
}

pub fn environment_label(config: &AppConfig) -> String {
    config.environment.to_uppercase()
}

#[component]
pub fn AppInfo() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    if !config.is_development() {
        return ().into_any();
    }

    let chips = feature_chips(&config)
        .into_iter()
        .map(|label| view! { <span class="chip chip--outlined">{label}</span> })
        .collect_view();

    view! {
        <aside class="app-info">
            <h6 class="app-info__name">{config.app_name.clone()}</h6>
            <p class="app-info__line">{format!("Version: {}", config.app_version)}</p>
            <span class="chip chip--warning">{environment_label(&config)}</span>
            <p class="app-info__line">{format!("API: {}", config.api_base_url)}</p>
            <div class="app-info__chips">{chips}</div>
        </aside>
    }
    .into_any()
}
