//! Auth and scraping endpoints on top of [`ApiClient`].
//!
//! SYSTEM CONTEXT
//! ==============
//! State modules depend on the [`AuthRemote`] and [`ScrapingRemote`] traits,
//! never on the concrete wrappers, so tests drive them with mocks and the app
//! wires in [`AuthApi`] / [`ScrapingApi`] once at start-up.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use async_trait::async_trait;

use super::error::ApiError;
use super::http::{ApiClient, HttpTransport};
use super::storage::KeyValueStore;
use super::types::{
    AuthResponse, Envelope, LinksPage, LoginRequest, RegisterRequest, ScrapeRequest, ScrapedUrl, UrlsPage,
};

const AUTH_ENDPOINT: &str = "/auth";
const SCRAPING_ENDPOINT: &str = "/scraping";

/// Remote authentication operations consumed by the session store.
#[async_trait(?Send)]
pub trait AuthRemote {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    /// Best-effort server-side invalidation.
    async fn logout(&self) -> Result<(), ApiError>;
}

/// Remote list operations consumed by list sources.
#[async_trait(?Send)]
pub trait ScrapingRemote {
    /// `page` is one-based.
    async fn urls(&self, page: u32, limit: u32) -> Result<UrlsPage, ApiError>;
    /// `page` is one-based.
    async fn links(&self, page: u32, limit: u32, url: &str) -> Result<LinksPage, ApiError>;
    async fn scrape(&self, url: &str) -> Result<ScrapedUrl, ApiError>;
}

#[async_trait(?Send)]
impl<R: AuthRemote + ?Sized> AuthRemote for Rc<R> {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        (**self).login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        (**self).register(request).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        (**self).logout().await
    }
}

#[async_trait(?Send)]
impl<R: ScrapingRemote + ?Sized> ScrapingRemote for Rc<R> {
    async fn urls(&self, page: u32, limit: u32) -> Result<UrlsPage, ApiError> {
        (**self).urls(page, limit).await
    }

    async fn links(&self, page: u32, limit: u32, url: &str) -> Result<LinksPage, ApiError> {
        (**self).links(page, limit, url).await
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedUrl, ApiError> {
        (**self).scrape(url).await
    }
}

fn auth_path(action: &str) -> String {
    format!("{AUTH_ENDPOINT}/{action}")
}

fn scraping_path(resource: &str) -> String {
    format!("{SCRAPING_ENDPOINT}/{resource}")
}

fn page_query(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

/// `/auth/*` endpoints.
pub struct AuthApi<T, S> {
    client: Rc<ApiClient<T, S>>,
}

impl<T, S> AuthApi<T, S> {
    pub fn new(client: Rc<ApiClient<T, S>>) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport, S: KeyValueStore> AuthRemote for AuthApi<T, S> {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        log::info!("attempting login for {}", request.email);
        let result = self.client.post::<Envelope<AuthResponse>, _>(&auth_path("login"), request).await;
        match result {
            Ok(env) => {
                log::info!("login succeeded for {}", request.email);
                Ok(env.data)
            }
            Err(e) => {
                log::error!("login failed for {}: {e}", request.email);
                Err(e)
            }
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        log::info!("attempting registration for {}", request.email);
        let result = self.client.post::<Envelope<AuthResponse>, _>(&auth_path("register"), request).await;
        match result {
            Ok(env) => {
                log::info!("registration succeeded for {}: {}", request.email, env.message);
                Ok(env.data)
            }
            Err(e) => {
                log::error!("registration failed for {}: {e}", request.email);
                Err(e)
            }
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client.post_empty::<serde_json::Value>(&auth_path("logout")).await.map(|_| ())
    }
}

/// `/scraping/*` endpoints.
pub struct ScrapingApi<T, S> {
    client: Rc<ApiClient<T, S>>,
}

impl<T, S> ScrapingApi<T, S> {
    pub fn new(client: Rc<ApiClient<T, S>>) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport, S: KeyValueStore> ScrapingRemote for ScrapingApi<T, S> {
    async fn urls(&self, page: u32, limit: u32) -> Result<UrlsPage, ApiError> {
        log::info!("fetching urls page={page} limit={limit}");
        let env: Envelope<UrlsPage> = self.client.get(&scraping_path("urls"), &page_query(page, limit)).await?;
        Ok(env.data)
    }

    async fn links(&self, page: u32, limit: u32, url: &str) -> Result<LinksPage, ApiError> {
        log::info!("fetching links page={page} limit={limit} url={url}");
        let mut query = page_query(page, limit);
        query.push(("url", url.to_owned()));
        let env: Envelope<LinksPage> = self.client.get(&scraping_path("links"), &query).await?;
        Ok(env.data)
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedUrl, ApiError> {
        log::info!("requesting scrape of {url}");
        let body = ScrapeRequest { url: url.to_owned() };
        let env: Envelope<ScrapedUrl> = self.client.post(&scraping_path("urls"), &body).await?;
        Ok(env.data)
    }
}
