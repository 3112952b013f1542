//! Page sources for the two scraping tables and their row mappings.

#[cfg(test)]
#[path = "sources_test.rs"]
mod sources_test;

use async_trait::async_trait;

use super::list::{CellValue, ListController, PageMeta, PageRequest, PageResult, PageSource, Row, ToRow};
use crate::net::api::ScrapingRemote;
use crate::net::error::ApiError;
use crate::net::types::{ScrapedLink, ScrapedUrl};
use crate::util::validation::validate_scrape_url;

pub const NO_URL_MESSAGE: &str = "No URL specified";

impl ToRow for ScrapedUrl {
    fn to_row(&self) -> Row {
        let mut fields = vec![
            ("name", CellValue::Text(self.name.clone())),
            ("url", CellValue::Link(self.url.clone())),
            ("linksCount", CellValue::Count(self.links_count)),
        ];
        fields.extend(self.created_at.map(|ts| ("createdAt", CellValue::Date(ts))));
        Row { id: self.id.clone(), fields }
    }
}

impl ToRow for ScrapedLink {
    fn to_row(&self) -> Row {
        let mut fields =
            vec![("name", CellValue::Text(self.name.clone())), ("link", CellValue::Link(self.link.clone()))];
        fields.extend(self.created_at.map(|ts| ("createdAt", CellValue::Date(ts))));
        Row { id: self.id.clone(), fields }
    }
}

/// Scraped URLs for the dashboard. Takes no filter.
pub struct UrlsSource<R> {
    remote: R,
}

impl<R: ScrapingRemote> UrlsSource<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }
}

#[async_trait(?Send)]
impl<R: ScrapingRemote> PageSource for UrlsSource<R> {
    type Item = ScrapedUrl;
    type Filter = ();

    async fn fetch(&self, request: &PageRequest<()>) -> Result<PageResult<ScrapedUrl>, ApiError> {
        let page = self.remote.urls(request.page, request.page_size).await?;
        Ok(PageResult::new(page.urls, PageMeta::from_remote(&page.pagination)))
    }
}

/// Links found on one scraped URL; the filter is that URL.
pub struct LinksSource<R> {
    remote: R,
}

impl<R: ScrapingRemote> LinksSource<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }
}

#[async_trait(?Send)]
impl<R: ScrapingRemote> PageSource for LinksSource<R> {
    type Item = ScrapedLink;
    type Filter = String;

    /// Fails without a remote call when no URL filter is set.
    async fn fetch(&self, request: &PageRequest<String>) -> Result<PageResult<ScrapedLink>, ApiError> {
        let Some(url) = request.filter.as_deref().filter(|u| !u.is_empty()) else {
            return Err(ApiError::client(NO_URL_MESSAGE));
        };
        let page = self.remote.links(request.page, request.page_size, url).await?;
        Ok(PageResult::new(page.links, PageMeta::from_remote(&page.pagination)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScrapeError {
    /// Rejected before any request was made.
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Validate and submit a URL for scraping, then reload `list` from its first
/// page so the new record is visible.
///
/// A failed reload is left to the list's own error state; the scrape itself
/// still succeeded.
///
/// # Errors
///
/// [`ScrapeError::Invalid`] for bad input, [`ScrapeError::Api`] when the
/// scrape request fails.
pub async fn scrape_and_reload<R, S>(remote: &R, list: &ListController<S>, raw: &str) -> Result<ScrapedUrl, ScrapeError>
where
    R: ScrapingRemote + ?Sized,
    S: PageSource,
{
    let url = validate_scrape_url(raw).map_err(ScrapeError::Invalid)?;
    let created = remote.scrape(&url).await?;
    if let Err(e) = list.refresh_from_start().await {
        log::warn!("reload after scraping {url} failed: {e}");
    }
    Ok(created)
}
