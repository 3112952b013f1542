//! Paged remote-list state shared by the URL and link tables.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages build one [`ListController`] per table around a [`PageSource`] and
//! mirror its [`ListState`] into a signal via [`ListController::subscribe`].
//! The data table renders rows and reports page changes and row clicks back.
//!
//! DESIGN
//! ======
//! - Page indices are zero-based everywhere in the UI; the controller adds one
//!   when building a [`PageRequest`].
//! - Every fetch takes a generation number. A response whose generation is no
//!   longer current is dropped, so the most recently issued request wins.
//! - A failed fetch keeps the rows already on screen and layers the error on
//!   top of them.

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::net::error::ApiError;
use crate::net::types::Pagination;

/// One fetch of a bounded window. `page` is one-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page: u32,
    pub page_size: u32,
    pub filter: Option<F>,
}

/// Pagination metadata with a zero-based `current_page`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    /// Derive page counts and edge flags from totals.
    #[must_use]
    pub fn new(current_page: u32, total_items: u64, items_per_page: u32) -> Self {
        let total_pages = if items_per_page == 0 {
            0
        } else {
            u32::try_from(total_items.div_ceil(u64::from(items_per_page))).unwrap_or(u32::MAX)
        };
        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
            has_next_page: current_page.saturating_add(1) < total_pages,
            has_previous_page: current_page > 0,
        }
    }

    /// Convert the backend's one-based block, recomputing derived fields.
    #[must_use]
    pub fn from_remote(remote: &Pagination) -> Self {
        Self::new(remote.current_page.saturating_sub(1), remote.total_items, remote.items_per_page)
    }

    /// One-based inclusive item range shown on the current page.
    #[must_use]
    pub fn display_range(&self) -> Option<(u64, u64)> {
        if self.total_items == 0 || self.items_per_page == 0 {
            return None;
        }
        let per = u64::from(self.items_per_page);
        let start = u64::from(self.current_page) * per + 1;
        if start > self.total_items {
            return None;
        }
        let end = (start + per - 1).min(self.total_items);
        Some((start, end))
    }
}

/// Items for one page plus its metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PageResult<T> {
    /// Build a result, dropping any items beyond `items_per_page`.
    #[must_use]
    pub fn new(mut items: Vec<T>, meta: PageMeta) -> Self {
        let cap = meta.items_per_page as usize;
        if cap > 0 && items.len() > cap {
            log::warn!("page returned {} items for a page size of {cap}; truncating", items.len());
            items.truncate(cap);
        }
        Self { items, meta }
    }
}

/// Display-ready value of one table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Count(u64),
    Date(DateTime<Utc>),
    Link(String),
}

impl CellValue {
    /// Raw textual form, used for navigation parameters.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) | Self::Link(s) => s.clone(),
            Self::Count(n) => n.to_string(),
            Self::Date(ts) => ts.to_rfc3339(),
        }
    }
}

/// Uniform row handed to the display layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub fields: Vec<(&'static str, CellValue)>,
}

impl Row {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Mapping from a remote record to a [`Row`].
pub trait ToRow {
    fn to_row(&self) -> Row;
}

/// Fetch capability behind a list controller.
#[async_trait(?Send)]
pub trait PageSource {
    type Item: ToRow;
    type Filter: Clone;

    async fn fetch(&self, request: &PageRequest<Self::Filter>) -> Result<PageResult<Self::Item>, ApiError>;
}

#[async_trait(?Send)]
impl<P: PageSource + ?Sized> PageSource for Rc<P> {
    type Item = P::Item;
    type Filter = P::Filter;

    async fn fetch(&self, request: &PageRequest<Self::Filter>) -> Result<PageResult<Self::Item>, ApiError> {
        (**self).fetch(request).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Snapshot of one list view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListState {
    pub rows: Vec<Row>,
    pub pagination: Option<PageMeta>,
    pub loading: bool,
    pub error: Option<String>,
    /// Zero-based.
    pub current_page: u32,
}

impl ListState {
    #[must_use]
    pub fn status(&self) -> ListStatus {
        if self.loading {
            ListStatus::Loading
        } else if self.error.is_some() {
            ListStatus::Failed
        } else if self.pagination.is_some() {
            ListStatus::Loaded
        } else {
            ListStatus::Idle
        }
    }

    /// Loaded successfully with nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pagination.is_some() && self.rows.is_empty() && self.error.is_none()
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.pagination.map_or(0, |p| p.total_items)
    }
}

type Listener = Box<dyn Fn(&ListState)>;
type RowCallback = Box<dyn Fn(&Row)>;

/// Generic controller for a paged view of remote items.
pub struct ListController<S: PageSource> {
    source: S,
    page_size: u32,
    filter: RefCell<Option<S::Filter>>,
    state: RefCell<ListState>,
    generation: Cell<u64>,
    listener: RefCell<Option<Listener>>,
    on_row_selected: RefCell<Option<RowCallback>>,
}

impl<S: PageSource> ListController<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            filter: RefCell::new(None),
            state: RefCell::new(ListState::default()),
            generation: Cell::new(0),
            listener: RefCell::new(None),
            on_row_selected: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn with_filter(self, filter: S::Filter) -> Self {
        self.filter.replace(Some(filter));
        self
    }

    #[must_use]
    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn filter(&self) -> Option<S::Filter> {
        self.filter.borrow().clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&ListState) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Callback fired by [`ListController::select_row`]; navigation lives there.
    pub fn on_row_selected(&self, callback: impl Fn(&Row) + 'static) {
        *self.on_row_selected.borrow_mut() = Some(Box::new(callback));
    }

    /// Report a row interaction. No-op without a registered callback.
    pub fn select_row(&self, row: &Row) {
        if let Some(callback) = self.on_row_selected.borrow().as_ref() {
            callback(row);
        }
    }

    fn update(&self, f: impl FnOnce(&mut ListState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.clone()
        };
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(&snapshot);
        }
    }

    /// Show `page_index` (zero-based), keeping current rows visible until the
    /// response lands.
    ///
    /// A response superseded by a later request is discarded and reported as
    /// `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure after recording its message in `error`.
    pub async fn go_to_page(&self, page_index: u32) -> Result<(), ApiError> {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.update(|s| {
            s.current_page = page_index;
            s.loading = true;
            s.error = None;
        });

        let request = PageRequest {
            page: page_index.saturating_add(1),
            page_size: self.page_size,
            filter: self.filter.borrow().clone(),
        };
        let result = self.source.fetch(&request).await;

        if generation != self.generation.get() {
            log::debug!("discarding stale response for page index {page_index}");
            return Ok(());
        }

        match result {
            Ok(page) => {
                let rows: Vec<Row> = page.items.iter().map(ToRow::to_row).collect();
                self.update(|s| {
                    s.rows = rows;
                    s.pagination = Some(page.meta);
                    s.loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                log::error!("page {page_index} failed to load: {e}");
                let message = e.message_or("Failed to load data").to_owned();
                self.update(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }

    /// Refetch the current page.
    ///
    /// # Errors
    ///
    /// See [`ListController::go_to_page`].
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let page = self.state.borrow().current_page;
        self.go_to_page(page).await
    }

    /// Refetch from the first page, e.g. after creating an item.
    ///
    /// # Errors
    ///
    /// See [`ListController::go_to_page`].
    pub async fn refresh_from_start(&self) -> Result<(), ApiError> {
        self.go_to_page(0).await
    }

    /// Replace the filter and reload from the first page.
    ///
    /// # Errors
    ///
    /// See [`ListController::go_to_page`].
    pub async fn set_filter(&self, filter: Option<S::Filter>) -> Result<(), ApiError> {
        self.filter.replace(filter);
        self.go_to_page(0).await
    }
}
