//! Dashboard page: scraped URL table plus the scrape-new-URL form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns one URL list controller for its lifetime. Selecting a row opens the
//! links page for that URL.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use leptos_router::location::Url;

use crate::app::use_services;
use crate::components::data_table::{Column, DataTable};
use crate::components::header::Header;
use crate::components::theme_toggle::FloatingThemeToggle;
use crate::config::AppConfig;
use crate::state::list::{CellValue, ListController, ListState, Row};
use crate::state::session::SessionState;
use crate::state::sources::{UrlsSource, scrape_and_reload};

pub const URL_COLUMNS: [Column; 4] = [
    Column::new("name", "Name"),
    Column::new("url", "URL"),
    Column::new("linksCount", "Total Links"),
    Column::new("createdAt", "Date"),
];

/// Query parameters that open the links page for a URL row, or `None` when
/// the row carries no URL.
pub fn links_query(row: &Row) -> Option<[(&'static str, String); 2]> {
    let url = row.get("url").map(CellValue::as_text).filter(|u| !u.is_empty())?;
    let name = row.get("name").map(CellValue::as_text).unwrap_or_default();
    Some([("url", url), ("name", name)])
}

/// `/links?url=..&name=..`, escaped the way the router's query map decodes it.
pub fn links_href(row: &Row) -> Option<String> {
    let query = links_query(row)?
        .iter()
        .map(|(key, value)| format!("{key}={}", Url::escape(value)))
        .collect::<Vec<_>>()
        .join("&");
    Some(format!("/links?{query}"))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let session = expect_context::<RwSignal<SessionState>>();
    let services = use_services();
    let navigate = use_navigate();

    let list_state = RwSignal::new(ListState::default());
    let controller = ListController::new(UrlsSource::new(services.get_value().scraping), config.urls_page_size);
    controller.subscribe(move |s| list_state.set(s.clone()));
    controller.on_row_selected(move |row| match links_href(row) {
        Some(href) => navigate(&href, NavigateOptions::default()),
        None => log::warn!("url row {} has no address to open", row.id),
    });
    let controller = StoredValue::new_local(Rc::new(controller));

    let go_to = move |page: u32| {
        let list = controller.get_value();
        leptos::task::spawn_local(async move {
            let _ = list.go_to_page(page).await;
        });
    };
    go_to(0);

    let scrape_input = RwSignal::new(String::new());
    let scrape_error = RwSignal::new(None::<String>);
    let scraping = RwSignal::new(false);
    let on_scrape = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if scraping.get_untracked() {
            return;
        }
        let raw = scrape_input.get_untracked();
        scraping.set(true);
        scrape_error.set(None);
        let remote = services.get_value().scraping;
        let list = controller.get_value();
        leptos::task::spawn_local(async move {
            match scrape_and_reload(remote.as_ref(), list.as_ref(), &raw).await {
                Ok(created) => {
                    log::info!("scraped {} ({} links)", created.url, created.links_count);
                    scrape_input.set(String::new());
                }
                Err(e) => scrape_error.set(Some(e.to_string())),
            }
            scraping.set(false);
        });
    };

    let welcome = move || {
        let username = session.with(|s| s.user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
        format!("Welcome back, {username}! Here's your URLs data overview.")
    };
    let enable_scrape = config.enable_scrape;

    view! {
        <div class="dashboard-page">
            <Header/>
            <main class="page-content">
                <h1 class="page-title">"Data Dashboard"</h1>
                <p class="page-subtitle">{welcome}</p>
                <div class="chips">
                    <span class="chip chip--primary">
                        {move || format!("{} Total URLs", list_state.with(ListState::total_items))}
                    </span>
                </div>

                <Show when=move || enable_scrape>
                    <form class="scrape-form" on:submit=on_scrape>
                        <input
                            class="scrape-form__input"
                            type="url"
                            placeholder="https://example.com"
                            prop:value=move || scrape_input.get()
                            on:input=move |ev| {
                                scrape_input.set(event_target_value(&ev));
                                scrape_error.set(None);
                            }
                        />
                        <button class="btn btn--primary" type="submit" disabled=move || scraping.get()>
                            {move || if scraping.get() { "Scraping..." } else { "Scrape URL" }}
                        </button>
                    </form>
                    <Show when=move || scrape_error.with(Option::is_some)>
                        <p class="scrape-form__error" role="alert">{move || scrape_error.get().unwrap_or_default()}</p>
                    </Show>
                </Show>

                <DataTable
                    state=list_state
                    columns=URL_COLUMNS.to_vec()
                    on_page_change=Callback::new(go_to)
                    on_row_click=Callback::new(move |row: Row| controller.with_value(|list| list.select_row(&row)))
                    empty_message="No URLs found"
                />
            </main>
            <FloatingThemeToggle/>
        </div>
    }
}
