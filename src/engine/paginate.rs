//! Pagination slicer

use crate::core::query::{Page, PageRequest};

/// Slice one page out of the filtered, ordered records.
///
/// A page past the end is empty; `total` is always the pre-slice count.
pub fn apply<T>(records: Vec<T>, page: PageRequest) -> Page<T> {
    let total = records.len();
    let items = records
        .into_iter()
        .skip(page.skip())
        .take(page.size)
        .collect();

    Page {
        items,
        total,
        number: page.number,
        size: page.size,
    }
}
