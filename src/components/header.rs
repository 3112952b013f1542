//! Top bar with app name, current user, and logout.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::use_services;
use crate::config::AppConfig;
use crate::state::session::SessionState;

#[component]
pub fn Header() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let session = expect_context::<RwSignal<SessionState>>();
    let services = use_services();
    let navigate = use_navigate();

    let busy = RwSignal::new(false);
    let on_logout = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let store = services.get_value().session;
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            store.logout().await;
            busy.set(false);
            navigate("/auth", NavigateOptions::default());
        });
    };

    let username = move || session.get().user.map(|u| u.username).unwrap_or_default();

    view! {
        <header class="app-header toolbar">
            <span class="app-header__title">{config.app_name.clone()}</span>
            <span class="toolbar__spacer"></span>
            <span class="app-header__user">{username}</span>
            <button class="btn app-header__logout" on:click=on_logout disabled=move || busy.get() title="Logout">
                "Logout"
            </button>
        </header>
    }
}
