//! Generic table over list-controller rows.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages hand this component a [`ListState`] signal plus column definitions.
//! Page changes and row clicks go back out through callbacks; the table never
//! fetches anything itself.

#[cfg(test)]
#[path = "data_table_test.rs"]
mod data_table_test;

use chrono::{DateTime, Utc};
use leptos::prelude::*;

use crate::components::pagination::Paginator;
use crate::state::list::{CellValue, ListState, Row};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Neutral,
}

impl BadgeTone {
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "badge badge--success",
            Self::Warning => "badge badge--warning",
            Self::Neutral => "badge",
        }
    }
}

/// Grade a count badge: above 200 is success, above 100 a warning.
pub fn badge_tone(count: u64) -> BadgeTone {
    if count > 200 {
        BadgeTone::Success
    } else if count > 100 {
        BadgeTone::Warning
    } else {
        BadgeTone::Neutral
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Mon D, YYYY`, in UTC.
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// What the table body shows for a given state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyView {
    /// First load still in flight.
    Loading,
    Empty,
    Rows,
    /// Failed before anything was loaded; only the banner shows.
    Nothing,
}

pub fn body_view(state: &ListState) -> BodyView {
    if !state.rows.is_empty() {
        BodyView::Rows
    } else if state.loading {
        BodyView::Loading
    } else if state.is_empty() {
        BodyView::Empty
    } else {
        BodyView::Nothing
    }
}

fn render_cell(value: Option<CellValue>) -> AnyView {
    match value {
        Some(CellValue::Text(text)) => view! { <span class="cell-text">{text}</span> }.into_any(),
        Some(CellValue::Count(n)) => {
            view! { <span class=badge_tone(n).class()>{format_count(n)}</span> }.into_any()
        }
        Some(CellValue::Date(ts)) => view! { <span class="cell-date">{format_date(&ts)}</span> }.into_any(),
        Some(CellValue::Link(href)) => {
            let text = href.clone();
            view! {
                <a
                    class="cell-link"
                    href=href
                    target="_blank"
                    rel="noopener noreferrer"
                    on:click=|ev| ev.stop_propagation()
                >
                    {text}
                </a>
            }
            .into_any()
        }
        None => view! { <span class="cell-empty">"-"</span> }.into_any(),
    }
}

#[component]
pub fn DataTable(
    #[prop(into)] state: Signal<ListState>,
    columns: Vec<Column>,
    #[prop(into)] on_page_change: Callback<u32>,
    #[prop(optional, into)] on_row_click: Option<Callback<Row>>,
    #[prop(default = "No data available")] empty_message: &'static str,
) -> impl IntoView {
    let span = columns.len();
    let header_cells = columns.iter().map(|c| view! { <th>{c.label}</th> }).collect_view();
    let clickable = on_row_click.is_some();

    let body = move || match body_view(&state.get()) {
        BodyView::Loading => view! {
            <tr>
                <td class="data-table__placeholder" colspan=span.to_string()>
                    "Loading data..."
                </td>
            </tr>
        }
        .into_any(),
        BodyView::Empty => view! {
            <tr>
                <td class="data-table__placeholder" colspan=span.to_string()>
                    {empty_message}
                </td>
            </tr>
        }
        .into_any(),
        BodyView::Nothing => ().into_any(),
        BodyView::Rows => state
            .get()
            .rows
            .into_iter()
            .map(|row| {
                let cells = columns
                    .iter()
                    .map(|c| view! { <td>{render_cell(row.get(c.key).cloned())}</td> })
                    .collect_view();
                let clicked = row.clone();
                view! {
                    <tr
                        class="data-table__row"
                        class:data-table__row--clickable=clickable
                        on:click=move |_| {
                            if let Some(cb) = on_row_click {
                                cb.run(clicked.clone());
                            }
                        }
                    >
                        {cells}
                    </tr>
                }
            })
            .collect_view()
            .into_any(),
    };

    let meta = Signal::derive(move || state.get().pagination);
    let loading = Signal::derive(move || state.get().loading);

    view! {
        <div class="data-table">
            <Show when=move || state.get().error.is_some()>
                <div class="banner banner--error" role="alert">
                    {move || state.get().error.unwrap_or_default()}
                </div>
            </Show>
            <div class="data-table__scroll" class:data-table__scroll--busy=move || state.get().loading>
                <table>
                    <thead>
                        <tr>{header_cells}</tr>
                    </thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
            <Paginator meta=meta loading=loading on_change=on_page_change/>
        </div>
    }
}
