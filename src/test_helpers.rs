//! Shared test doubles for the async collaborator seams.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::net::api::{AuthRemote, ScrapingRemote};
use crate::net::error::ApiError;
use crate::net::http::{HttpRequest, HttpTransport};
use crate::net::types::{
    AuthResponse, LinksPage, LoginRequest, Pagination, RegisterRequest, ScrapedLink, ScrapedUrl, UrlsPage, User,
    parse_timestamp,
};

/// RFC 3339 literal as a UTC timestamp.
#[must_use]
pub fn timestamp(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap()
}

#[must_use]
pub fn user(id: &str, username: &str, email: &str) -> User {
    User {
        id: id.to_owned(),
        username: username.to_owned(),
        email: email.to_owned(),
        created_at: Some(timestamp("2025-08-01T00:00:00Z")),
        updated_at: Some(timestamp("2025-08-01T00:00:00Z")),
    }
}

#[must_use]
pub fn auth_response(username: &str, token: &str) -> AuthResponse {
    AuthResponse { user: user("1", username, &format!("{username}@test.com")), access_token: token.to_owned() }
}

// =========================================================================
// MockTransport
// =========================================================================

/// Replays canned results in order and records every request it receives.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<Value, ApiError>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<Value, ApiError>>) -> Self {
        Self { responses: RefCell::new(responses.into()), requests: RefCell::new(Vec::new()) }
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().unwrap()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }
}

// =========================================================================
// MockAuth
// =========================================================================

/// Auth remote with queued login/register outcomes and call counters.
#[derive(Default)]
pub struct MockAuth {
    logins: RefCell<VecDeque<Result<AuthResponse, ApiError>>>,
    registers: RefCell<VecDeque<Result<AuthResponse, ApiError>>>,
    logout_result: RefCell<Option<ApiError>>,
    pub login_calls: RefCell<Vec<LoginRequest>>,
    pub register_calls: RefCell<Vec<RegisterRequest>>,
    pub logout_calls: Cell<usize>,
}

impl MockAuth {
    pub fn with_logins(results: Vec<Result<AuthResponse, ApiError>>) -> Self {
        Self { logins: RefCell::new(results.into()), ..Self::default() }
    }

    pub fn with_registers(results: Vec<Result<AuthResponse, ApiError>>) -> Self {
        Self { registers: RefCell::new(results.into()), ..Self::default() }
    }

    pub fn failing_logout(self, err: ApiError) -> Self {
        *self.logout_result.borrow_mut() = Some(err);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.login_calls.borrow().len() + self.register_calls.borrow().len() + self.logout_calls.get()
    }
}

#[async_trait(?Send)]
impl AuthRemote for MockAuth {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.login_calls.borrow_mut().push(request.clone());
        self.logins.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.register_calls.borrow_mut().push(request.clone());
        self.registers.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.set(self.logout_calls.get() + 1);
        match self.logout_result.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// =========================================================================
// MockScraping
// =========================================================================

#[must_use]
pub fn scraped_url(id: &str, name: &str, links_count: u64) -> ScrapedUrl {
    ScrapedUrl {
        id: id.to_owned(),
        name: name.to_owned(),
        url: format!("https://{name}.example"),
        links_count,
        created_at: Some(timestamp("2025-08-07T10:00:00Z")),
        updated_at: Some(timestamp("2025-08-07T10:00:00Z")),
    }
}

#[must_use]
pub fn scraped_link(id: &str, name: &str) -> ScrapedLink {
    ScrapedLink {
        id: id.to_owned(),
        name: name.to_owned(),
        link: format!("https://example.com/{name}"),
        created_at: Some(timestamp("2025-08-07T10:00:00Z")),
    }
}

/// One-based backend pagination block with consistent edge flags.
#[must_use]
pub fn pagination(current_page: u32, total_items: u64, items_per_page: u32) -> Pagination {
    let total_pages = u32::try_from(total_items.div_ceil(u64::from(items_per_page.max(1)))).unwrap();
    Pagination {
        current_page,
        total_pages,
        total_items,
        items_per_page,
        has_next_page: current_page < total_pages,
        has_previous_page: current_page > 1,
    }
}

/// Scraping remote with queued pages; records `(page, limit, url)` per call.
#[derive(Default)]
pub struct MockScraping {
    urls: RefCell<VecDeque<Result<UrlsPage, ApiError>>>,
    links: RefCell<VecDeque<Result<LinksPage, ApiError>>>,
    scrapes: RefCell<VecDeque<Result<ScrapedUrl, ApiError>>>,
    pub url_calls: RefCell<Vec<(u32, u32)>>,
    pub link_calls: RefCell<Vec<(u32, u32, String)>>,
    pub scrape_calls: RefCell<Vec<String>>,
}

impl MockScraping {
    pub fn with_urls(results: Vec<Result<UrlsPage, ApiError>>) -> Self {
        Self { urls: RefCell::new(results.into()), ..Self::default() }
    }

    pub fn with_links(results: Vec<Result<LinksPage, ApiError>>) -> Self {
        Self { links: RefCell::new(results.into()), ..Self::default() }
    }

    pub fn with_scrapes(self, results: Vec<Result<ScrapedUrl, ApiError>>) -> Self {
        *self.scrapes.borrow_mut() = results.into();
        self
    }
}

#[async_trait(?Send)]
impl ScrapingRemote for MockScraping {
    async fn urls(&self, page: u32, limit: u32) -> Result<UrlsPage, ApiError> {
        self.url_calls.borrow_mut().push((page, limit));
        self.urls.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }

    async fn links(&self, page: u32, limit: u32, url: &str) -> Result<LinksPage, ApiError> {
        self.link_calls.borrow_mut().push((page, limit, url.to_owned()));
        self.links.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedUrl, ApiError> {
        self.scrape_calls.borrow_mut().push(url.to_owned());
        self.scrapes.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }
}
