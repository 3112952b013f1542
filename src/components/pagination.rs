//! Page navigation strip under a data table.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;

use leptos::prelude::*;

use crate::state::list::PageMeta;

const SIBLINGS: i64 = 1;
const BOUNDARY: i64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    /// Zero-based page index.
    Page(u32),
    Ellipsis,
}

fn push_range(items: &mut Vec<PageItem>, start: i64, end: i64) {
    for page in start..=end {
        if let Ok(one_based) = u32::try_from(page) {
            items.push(PageItem::Page(one_based - 1));
        }
    }
}

/// Numbered buttons for `total_pages` pages around `current` (zero-based):
/// one boundary page at each end, one sibling on each side of the current
/// page, and an ellipsis for every gap.
pub fn page_items(current: u32, total_pages: u32) -> Vec<PageItem> {
    let count = i64::from(total_pages);
    let page = i64::from(current) + 1;

    let start_end = BOUNDARY.min(count);
    let end_start = (count - BOUNDARY + 1).max(BOUNDARY + 1);

    let siblings_start = (page - SIBLINGS).min(count - BOUNDARY - SIBLINGS * 2 - 1).max(BOUNDARY + 2);
    let siblings_end_cap = if end_start <= count { end_start - 2 } else { count - 1 };
    let siblings_end = (page + SIBLINGS).max(BOUNDARY + SIBLINGS * 2 + 2).min(siblings_end_cap);

    let mut items = Vec::new();
    push_range(&mut items, 1, start_end);

    if siblings_start > BOUNDARY + 2 {
        items.push(PageItem::Ellipsis);
    } else if BOUNDARY + 1 < count - BOUNDARY {
        push_range(&mut items, BOUNDARY + 1, BOUNDARY + 1);
    }

    push_range(&mut items, siblings_start, siblings_end);

    if siblings_end < count - BOUNDARY - 1 {
        items.push(PageItem::Ellipsis);
    } else if count - BOUNDARY > BOUNDARY {
        push_range(&mut items, count - BOUNDARY, count - BOUNDARY);
    }

    push_range(&mut items, end_start, count);
    items
}

/// `"Showing 6-10 of 12 items"`, or `None` when there is nothing to show.
pub fn summary_label(meta: &PageMeta) -> Option<String> {
    let (start, end) = meta.display_range()?;
    Some(format!("Showing {start}-{end} of {} items", meta.total_items))
}

#[component]
pub fn Paginator(
    #[prop(into)] meta: Signal<Option<PageMeta>>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] on_change: Callback<u32>,
) -> impl IntoView {
    let current = move || meta.get().map_or(0, |m| m.current_page);
    let total = move || meta.get().map_or(0, |m| m.total_pages);
    let at_start = move || loading.get() || current() == 0;
    let at_end = move || loading.get() || current() + 1 >= total();

    let buttons = move || {
        page_items(current(), total())
            .into_iter()
            .map(|item| match item {
                PageItem::Ellipsis => view! { <span class="paginator__ellipsis">"…"</span> }.into_any(),
                PageItem::Page(index) => view! {
                    <button
                        class="paginator__page"
                        class:paginator__page--active=move || current() == index
                        disabled=move || loading.get()
                        on:click=move |_| on_change.run(index)
                    >
                        {index + 1}
                    </button>
                }
                .into_any(),
            })
            .collect_view()
    };

    view! {
        <Show when=move || meta.get().is_some_and(|m| m.total_items > 0)>
            <nav class="paginator" aria-label="Pagination">
                <span class="paginator__summary">
                    {move || meta.get().as_ref().and_then(summary_label).unwrap_or_default()}
                </span>
                <Show when=move || { total() > 1 }>
                    <div class="paginator__controls">
                        <button class="paginator__nav" title="First page" disabled=at_start on:click=move |_| on_change.run(0)>
                            "«"
                        </button>
                        <button
                            class="paginator__nav"
                            title="Previous page"
                            disabled=at_start
                            on:click=move |_| on_change.run(current().saturating_sub(1))
                        >
                            "‹"
                        </button>
                        {buttons}
                        <button
                            class="paginator__nav"
                            title="Next page"
                            disabled=at_end
                            on:click=move |_| on_change.run(current() + 1)
                        >
                            "›"
                        </button>
                        <button
                            class="paginator__nav"
                            title="Last page"
                            disabled=at_end
                            on:click=move |_| on_change.run(total().saturating_sub(1))
                        >
                            "»"
                        </button>
                    </div>
                </Show>
            </nav>
        </Show>
    }
}
