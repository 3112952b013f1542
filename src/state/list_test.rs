use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tokio::sync::oneshot;

use super::*;

#[derive(Clone, Debug)]
struct Item {
    id: String,
    title: String,
}

impl ToRow for Item {
    fn to_row(&self) -> Row {
        Row { id: self.id.clone(), fields: vec![("title", CellValue::Text(self.title.clone()))] }
    }
}

fn items(prefix: &str, n: usize) -> Vec<Item> {
    (0..n).map(|i| Item { id: format!("{prefix}{i}"), title: format!("{prefix} #{i}") }).collect()
}

fn page(prefix: &str, n: usize, current: u32, total: u64, per_page: u32) -> PageResult<Item> {
    PageResult::new(items(prefix, n), PageMeta::new(current, total, per_page))
}

type Reply = Result<PageResult<Item>, ApiError>;

/// Answers each fetch immediately from a queue and records the requests.
struct QueuedSource {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<PageRequest<String>>>,
}

impl QueuedSource {
    fn new(replies: Vec<Reply>) -> Self {
        Self { replies: RefCell::new(replies.into()), requests: RefCell::new(Vec::new()) }
    }
}

#[async_trait(?Send)]
impl PageSource for QueuedSource {
    type Item = Item;
    type Filter = String;

    async fn fetch(&self, request: &PageRequest<String>) -> Result<PageResult<Item>, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies.borrow_mut().pop_front().unwrap_or_else(|| Err(ApiError::network()))
    }
}

/// Each fetch waits on the next gate; the test decides when and in what order
/// gates open.
struct GatedSource {
    gates: RefCell<VecDeque<oneshot::Receiver<Reply>>>,
}

impl GatedSource {
    fn new(gates: Vec<oneshot::Receiver<Reply>>) -> Self {
        Self { gates: RefCell::new(gates.into()) }
    }
}

#[async_trait(?Send)]
impl PageSource for GatedSource {
    type Item = Item;
    type Filter = String;

    async fn fetch(&self, _request: &PageRequest<String>) -> Result<PageResult<Item>, ApiError> {
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(ApiError::network())),
            None => Err(ApiError::network()),
        }
    }
}

fn titles(state: &ListState) -> Vec<String> {
    state.rows.iter().map(|r| r.get("title").map(CellValue::as_text).unwrap_or_default()).collect()
}

// =============================================================
// PageMeta
// =============================================================

#[test]
fn page_meta_derives_counts_and_edges() {
    let meta = PageMeta::new(2, 12, 5);
    assert_eq!(meta.total_pages, 3);
    assert!(!meta.has_next_page);
    assert!(meta.has_previous_page);

    let first = PageMeta::new(0, 12, 5);
    assert!(first.has_next_page);
    assert!(!first.has_previous_page);
}

#[test]
fn page_meta_handles_empty_and_zero_page_size() {
    let empty = PageMeta::new(0, 0, 5);
    assert_eq!(empty.total_pages, 0);
    assert!(!empty.has_next_page);
    assert_eq!(empty.display_range(), None);

    let degenerate = PageMeta::new(0, 10, 0);
    assert_eq!(degenerate.total_pages, 0);
}

#[test]
fn page_meta_from_remote_is_zero_based() {
    let remote = Pagination {
        current_page: 2,
        total_pages: 3,
        total_items: 12,
        items_per_page: 5,
        has_next_page: true,
        has_previous_page: true,
    };
    let meta = PageMeta::from_remote(&remote);
    assert_eq!(meta.current_page, 1);
    assert_eq!(meta.total_pages, 3);
    assert!(meta.has_next_page);
}

#[test]
fn display_range_clamps_last_page() {
    assert_eq!(PageMeta::new(0, 12, 5).display_range(), Some((1, 5)));
    assert_eq!(PageMeta::new(2, 12, 5).display_range(), Some((11, 12)));
    assert_eq!(PageMeta::new(5, 12, 5).display_range(), None);
}

#[test]
fn page_result_truncates_oversized_pages() {
    let result = PageResult::new(items("x", 7), PageMeta::new(0, 20, 5));
    assert_eq!(result.items.len(), 5);
}

// =============================================================
// Fetching
// =============================================================

#[tokio::test]
async fn first_page_requests_page_one() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("a", 5, 0, 12, 5))]));
    let list = ListController::new(source.clone(), 5);

    list.go_to_page(0).await.unwrap();

    let sent = source.requests.borrow();
    assert_eq!(sent[0].page, 1);
    assert_eq!(sent[0].page_size, 5);
    let state = list.state();
    assert_eq!(state.rows.len(), 5);
    assert_eq!(state.status(), ListStatus::Loaded);
    assert_eq!(state.pagination.map(|p| p.total_pages), Some(3));
}

#[tokio::test]
async fn page_index_two_requests_page_three() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("c", 2, 2, 12, 5))]));
    let list = ListController::new(source.clone(), 5);

    list.go_to_page(2).await.unwrap();

    assert_eq!(source.requests.borrow()[0].page, 3);
    let state = list.state();
    assert_eq!(state.current_page, 2);
    assert_eq!(state.pagination.map(|p| p.has_next_page), Some(false));
}

#[tokio::test]
async fn failure_keeps_previous_rows_and_sets_error() {
    let source = QueuedSource::new(vec![
        Ok(page("a", 3, 0, 3, 5)),
        Err(ApiError::new(500, "Database unavailable")),
    ]);
    let list = ListController::new(source, 5);

    list.go_to_page(0).await.unwrap();
    let err = list.go_to_page(1).await.unwrap_err();

    assert_eq!(err.status, 500);
    let state = list.state();
    assert_eq!(state.rows.len(), 3);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert_eq!(state.status(), ListStatus::Failed);
    assert!(!state.loading);
}

#[tokio::test]
async fn failure_without_message_uses_fallback() {
    let source = QueuedSource::new(vec![Err(ApiError::new(500, ""))]);
    let list = ListController::new(source, 5);

    let _ = list.go_to_page(0).await;

    assert_eq!(list.state().error.as_deref(), Some("Failed to load data"));
}

#[tokio::test]
async fn new_fetch_clears_previous_error() {
    let source = QueuedSource::new(vec![Err(ApiError::network()), Ok(page("a", 1, 0, 1, 5))]);
    let list = ListController::new(source, 5);

    let _ = list.go_to_page(0).await;
    list.refresh().await.unwrap();

    let state = list.state();
    assert_eq!(state.error, None);
    assert_eq!(state.rows.len(), 1);
}

#[tokio::test]
async fn empty_result_is_loaded_and_empty() {
    let source = QueuedSource::new(vec![Ok(page("a", 0, 0, 0, 5))]);
    let list = ListController::new(source, 5);

    list.go_to_page(0).await.unwrap();

    let state = list.state();
    assert!(state.is_empty());
    assert_eq!(state.total_items(), 0);
}

#[tokio::test]
async fn refresh_refetches_current_page() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("b", 5, 1, 12, 5)), Ok(page("b", 5, 1, 12, 5))]));
    let list = ListController::new(source.clone(), 5);

    list.go_to_page(1).await.unwrap();
    list.refresh().await.unwrap();

    let pages: Vec<u32> = source.requests.borrow().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![2, 2]);
}

#[tokio::test]
async fn refresh_from_start_goes_back_to_first_page() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("b", 5, 1, 12, 5)), Ok(page("a", 5, 0, 13, 5))]));
    let list = ListController::new(source.clone(), 5);

    list.go_to_page(1).await.unwrap();
    list.refresh_from_start().await.unwrap();

    assert_eq!(source.requests.borrow()[1].page, 1);
    let state = list.state();
    assert_eq!(state.current_page, 0);
    assert_eq!(state.total_items(), 13);
}

#[tokio::test]
async fn filter_is_passed_and_reset_to_first_page() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("l", 1, 0, 1, 10)), Ok(page("m", 1, 0, 1, 10))]));
    let list = ListController::new(source.clone(), 10).with_filter("https://a.example".to_owned());

    list.go_to_page(0).await.unwrap();
    list.set_filter(Some("https://b.example".to_owned())).await.unwrap();

    let sent = source.requests.borrow();
    assert_eq!(sent[0].filter.as_deref(), Some("https://a.example"));
    assert_eq!(sent[1].filter.as_deref(), Some("https://b.example"));
    assert_eq!(sent[1].page, 1);
}

#[tokio::test]
async fn changing_filter_on_a_later_page_resets_to_first_page() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("a", 5, 2, 25, 5)), Ok(page("b", 3, 0, 3, 5))]));
    let list = ListController::new(source.clone(), 5).with_filter("https://a.example".to_owned());

    list.go_to_page(2).await.unwrap();
    assert_eq!(list.state().current_page, 2);

    list.set_filter(Some("https://b.example".to_owned())).await.unwrap();

    let pages: Vec<u32> = source.requests.borrow().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![3, 1]);
    let state = list.state();
    assert_eq!(state.current_page, 0);
    assert_eq!(state.pagination.map(|p| p.current_page), Some(0));
    assert_eq!(titles(&state), vec!["b #0", "b #1", "b #2"]);
    assert_eq!(list.filter().as_deref(), Some("https://b.example"));
}

#[tokio::test]
async fn clearing_filter_also_resets_page() {
    let source = Rc::new(QueuedSource::new(vec![Ok(page("a", 5, 1, 10, 5)), Ok(page("b", 5, 0, 10, 5))]));
    let list = ListController::new(source.clone(), 5).with_filter("https://a.example".to_owned());

    list.go_to_page(1).await.unwrap();
    list.set_filter(None).await.unwrap();

    let sent = source.requests.borrow();
    assert_eq!(sent[1].page, 1);
    assert_eq!(sent[1].filter, None);
    assert_eq!(list.state().current_page, 0);
}

#[tokio::test]
async fn listener_sees_loading_then_loaded() {
    let source = QueuedSource::new(vec![Ok(page("a", 2, 0, 2, 5))]);
    let list = ListController::new(source, 5);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    list.subscribe(move |s| sink.borrow_mut().push(s.status()));

    list.go_to_page(0).await.unwrap();

    assert_eq!(*seen.borrow(), vec![ListStatus::Loading, ListStatus::Loaded]);
}

// =============================================================
// Concurrency
// =============================================================

#[tokio::test]
async fn rows_stay_visible_while_next_page_loads() {
    let (tx0, rx0) = oneshot::channel();
    let (tx1, rx1) = oneshot::channel();
    let list = ListController::new(GatedSource::new(vec![rx0, rx1]), 5);

    let _ = tx0.send(Ok(page("a", 5, 0, 12, 5)));
    list.go_to_page(0).await.unwrap();

    let next = list.go_to_page(1);
    let observe = async {
        tokio::task::yield_now().await;
        let during = list.state();
        let _ = tx1.send(Ok(page("b", 5, 1, 12, 5)));
        during
    };
    let (result, during) = tokio::join!(next, observe);

    result.unwrap();
    assert!(during.loading);
    assert_eq!(during.current_page, 1);
    assert_eq!(titles(&during)[0], "a #0");
    assert_eq!(titles(&list.state())[0], "b #0");
}

#[tokio::test]
async fn latest_request_wins_when_responses_arrive_out_of_order() {
    let (tx1, rx1) = oneshot::channel();
    let (tx2, rx2) = oneshot::channel();
    let list = ListController::new(GatedSource::new(vec![rx1, rx2]), 5);

    let slow = list.go_to_page(1);
    let fast = list.go_to_page(2);
    let driver = async {
        tokio::task::yield_now().await;
        let _ = tx2.send(Ok(page("page3-", 2, 2, 12, 5)));
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let _ = tx1.send(Ok(page("page2-", 5, 1, 12, 5)));
    };
    let (slow_result, fast_result, ()) = tokio::join!(slow, fast, driver);

    slow_result.unwrap();
    fast_result.unwrap();
    let state = list.state();
    assert_eq!(state.current_page, 2);
    assert_eq!(titles(&state), vec!["page3- #0", "page3- #1"]);
    assert!(!state.loading);
}

#[tokio::test]
async fn stale_failure_does_not_override_newer_success() {
    let (tx1, rx1) = oneshot::channel();
    let (tx2, rx2) = oneshot::channel();
    let list = ListController::new(GatedSource::new(vec![rx1, rx2]), 5);

    let stale = list.go_to_page(0);
    let fresh = list.go_to_page(1);
    let driver = async {
        tokio::task::yield_now().await;
        let _ = tx2.send(Ok(page("b", 5, 1, 12, 5)));
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        let _ = tx1.send(Err(ApiError::new(500, "boom")));
    };
    let (stale_result, fresh_result, ()) = tokio::join!(stale, fresh, driver);

    assert!(stale_result.is_ok());
    fresh_result.unwrap();
    let state = list.state();
    assert_eq!(state.error, None);
    assert_eq!(state.current_page, 1);
}

// =============================================================
// Row selection
// =============================================================

#[tokio::test]
async fn select_row_forwards_to_callback() {
    let source = QueuedSource::new(vec![Ok(page("a", 2, 0, 2, 5))]);
    let list = ListController::new(source, 5);
    let picked = Rc::new(RefCell::new(None));
    let sink = picked.clone();
    list.on_row_selected(move |row| *sink.borrow_mut() = Some(row.id.clone()));

    list.go_to_page(0).await.unwrap();
    let row = list.state().rows[1].clone();
    list.select_row(&row);

    assert_eq!(picked.borrow().as_deref(), Some("a1"));
}

#[test]
fn select_row_without_callback_is_noop() {
    let list = ListController::new(QueuedSource::new(Vec::new()), 5);
    list.select_row(&Row { id: "x".to_owned(), fields: Vec::new() });
}
