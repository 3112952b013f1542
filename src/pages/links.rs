//! Links page: links extracted from one scraped URL.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `url` and `name` query parameters select the parent URL. A missing
//! `url` surfaces as the list's error without any request being made.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::app::use_services;
use crate::components::data_table::{Column, DataTable};
use crate::components::header::Header;
use crate::components::theme_toggle::FloatingThemeToggle;
use crate::config::AppConfig;
use crate::state::list::{ListController, ListState};
use crate::state::sources::LinksSource;

pub const LINK_COLUMNS: [Column; 3] =
    [Column::new("name", "Name"), Column::new("link", "Link"), Column::new("createdAt", "Date")];

#[component]
pub fn LinksPage() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let services = use_services();
    let navigate = use_navigate();
    let query = use_query_map();

    let url = Memo::new(move |_| query.with(|q| q.get("url")).filter(|u| !u.is_empty()));
    let name = move || query.with(|q| q.get("name")).filter(|n| !n.is_empty()).unwrap_or_else(|| "Unknown URL".to_owned());

    let list_state = RwSignal::new(ListState::default());
    let controller = ListController::new(LinksSource::new(services.get_value().scraping), config.links_page_size);
    controller.subscribe(move |s| list_state.set(s.clone()));
    let controller = StoredValue::new_local(Rc::new(controller));

    // Reload from the first page whenever the parent URL changes.
    Effect::new(move || {
        let filter = url.get();
        let list = controller.get_value();
        leptos::task::spawn_local(async move {
            let _ = list.set_filter(filter).await;
        });
    });

    let go_to = move |page: u32| {
        let list = controller.get_value();
        leptos::task::spawn_local(async move {
            let _ = list.go_to_page(page).await;
        });
    };

    let on_back = move |_| navigate("/dashboard", NavigateOptions::default());

    view! {
        <div class="links-page">
            <Header/>
            <main class="page-content">
                <button class="btn btn--ghost" on:click=on_back>
                    "← Back to Dashboard"
                </button>
                <h1 class="page-title">{move || format!("Links for {}", name())}</h1>
                <Show when=move || url.with(Option::is_some)>
                    <p class="page-subtitle">{move || format!("URL: {}", url.get().unwrap_or_default())}</p>
                </Show>
                <div class="chips">
                    <span class="chip chip--secondary">
                        {move || format!("{} Total Links", list_state.with(ListState::total_items))}
                    </span>
                </div>

                <DataTable
                    state=list_state
                    columns=LINK_COLUMNS.to_vec()
                    on_page_change=Callback::new(go_to)
                    empty_message="No links found for this URL"
                />
            </main>
            <FloatingThemeToggle/>
        </div>
    }
}
