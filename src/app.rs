//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the injected collaborators once, mirrors the session store
//! into a signal, and routes protected pages through [`Protected`], which
//! renders whatever the auth gate selects.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::app_info::AppInfo;
use crate::config::AppConfig;
use crate::net::api::{AuthApi, ScrapingApi};
use crate::net::http::{ApiClient, FetchTransport};
use crate::net::storage::BrowserStorage;
use crate::pages::{auth::AuthPage, dashboard::DashboardPage, links::LinksPage};
use crate::state::gate::{GateView, select_view};
use crate::state::session::{SessionState, SessionStore};
use crate::util::theme::{self, ThemeMode};

pub type Client = ApiClient<FetchTransport, BrowserStorage>;
pub type Session = SessionStore<AuthApi<FetchTransport, BrowserStorage>, BrowserStorage>;
pub type Scraping = ScrapingApi<FetchTransport, BrowserStorage>;

/// Browser-side collaborators shared by every page.
#[derive(Clone)]
pub struct Services {
    pub session: Rc<Session>,
    pub scraping: Rc<Scraping>,
}

impl Services {
    pub fn new(config: &AppConfig) -> Self {
        let storage = BrowserStorage;
        let client: Rc<Client> = Rc::new(ApiClient::new(
            FetchTransport { timeout_ms: config.api_timeout_ms },
            storage,
            config.api_base_url.clone(),
            config.storage_keys.token.clone(),
        ));
        let session = SessionStore::new(
            AuthApi::new(client.clone()),
            storage,
            config.storage_keys.clone(),
            config.register_policy,
        );
        Self { session: Rc::new(session), scraping: Rc::new(ScrapingApi::new(client)) }
    }
}

/// The services hold `Rc`s, so they live in local arena storage.
pub type ServicesContext = StoredValue<Services, LocalStorage>;

pub fn use_services() -> ServicesContext {
    expect_context::<ServicesContext>()
}

/// Load config, falling back to defaults when a baked-in value is unusable.
pub fn load_config() -> AppConfig {
    AppConfig::from_build_env().unwrap_or_else(|e| {
        log::error!("invalid configuration, using defaults: {e}");
        AppConfig::default()
    })
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_config();
    let services = Services::new(&config);

    let session = RwSignal::new(services.session.state());
    services.session.subscribe(move |s| session.set(s.clone()));

    let theme_mode = RwSignal::new(theme::read_preference(
        &BrowserStorage,
        &config.theme_storage_key,
        config.default_theme,
    ));
    theme::apply(theme_mode.get_untracked());

    let title = config.app_name.clone();
    provide_context(config);
    provide_context(session);
    provide_context::<RwSignal<ThemeMode>>(theme_mode);
    provide_context::<ServicesContext>(StoredValue::new_local(services.clone()));

    // Runs after the first render, so a pending restore shows the loading
    // placeholder before it resolves.
    let store = services.session;
    Effect::new(move || {
        store.restore_session();
    });

    view! {
        <Title text=title/>
        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("auth") view=AuthPage/>
                <Route
                    path=StaticSegment("dashboard")
                    view=|| view! { <Protected><DashboardPage/></Protected> }
                />
                <Route path=StaticSegment("links") view=|| view! { <Protected><LinksPage/></Protected> }/>
                <Route path=StaticSegment("") view=|| view! { <Redirect path="/dashboard"/> }/>
            </Routes>
        </Router>
        <AppInfo/>
    }
}

/// Render `children` only for an authenticated session.
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let gate = Memo::new(move |_| select_view(&session.get()));

    move || match gate.get() {
        GateView::Loading => view! {
            <div class="gate-loading" aria-busy="true">
                <div class="spinner"></div>
            </div>
        }
        .into_any(),
        GateView::Anonymous => view! { <Redirect path="/auth"/> }.into_any(),
        GateView::Authenticated => children().into_any(),
    }
}
