//! Presentation ordering — stable merge sort and the comparison contract.
//!
//! The directory is re-linked, not copied: sorting operates on the id
//! vector that defines presentation order. Textual keys compare
//! case-insensitively, so `Glowacki`, `kowalski`, `Nowicki` is a sorted
//! sequence; a shorter string that is a strict prefix of a longer one
//! sorts first.

use std::cmp::Ordering;

/// Which attribute orders the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    GivenName,
    Surname,
}

/// Case-insensitive lexicographic comparison.
pub fn cmp_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Classic top-down merge sort. Stable: on ties the left half wins, so
/// equal items keep their input order. Recursion depth is log₂(n).
pub(crate) fn merge_sort<T>(mut items: Vec<T>, cmp: &impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);
    merge(left, right, cmp)
}

fn merge<T>(left: Vec<T>, right: Vec<T>, cmp: &impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_left {
            merged.extend(left.next());
        } else {
            merged.extend(right.next());
        }
    }
    merged
}

// ============================================================================
// Tests
// ============================================================================
