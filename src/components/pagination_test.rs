use super::*;
use PageItem::{Ellipsis, Page};

/// One-based labels for readability: 0 marks an ellipsis.
fn labels(current: u32, total: u32) -> Vec<u32> {
    page_items(current, total)
        .into_iter()
        .map(|item| match item {
            Page(i) => i + 1,
            Ellipsis => 0,
        })
        .collect()
}

#[test]
fn no_pages_no_items() {
    assert!(page_items(0, 0).is_empty());
}

#[test]
fn small_counts_list_every_page() {
    assert_eq!(labels(0, 1), vec![1]);
    assert_eq!(labels(0, 2), vec![1, 2]);
    assert_eq!(labels(1, 3), vec![1, 2, 3]);
    assert_eq!(labels(3, 7), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn first_page_of_many() {
    assert_eq!(labels(0, 10), vec![1, 2, 3, 4, 5, 0, 10]);
}

#[test]
fn middle_page_has_gaps_on_both_sides() {
    assert_eq!(labels(4, 10), vec![1, 0, 4, 5, 6, 0, 10]);
}

#[test]
fn last_page_of_many() {
    assert_eq!(labels(9, 10), vec![1, 0, 6, 7, 8, 9, 10]);
}

#[test]
fn items_are_zero_based() {
    assert_eq!(page_items(0, 2), vec![Page(0), Page(1)]);
}

#[test]
fn summary_reports_range() {
    assert_eq!(summary_label(&PageMeta::new(1, 12, 5)).as_deref(), Some("Showing 6-10 of 12 items"));
    assert_eq!(summary_label(&PageMeta::new(2, 12, 5)).as_deref(), Some("Showing 11-12 of 12 items"));
    assert_eq!(summary_label(&PageMeta::new(0, 0, 5)), None);
}
