//! Pagination
//!
//! Resolves a limit/offset pair against the length of an insertion-ordered
//! sequence. Filtering happens first; the window is applied to the result.

use std::ops::Range;

/// Page size used when the client does not ask for one
pub const DEFAULT_LIMIT: usize = 10;

/// Concrete slice of the window `[start, end)` for `limit`/`offset`
///
/// A `limit` of zero means "everything from `offset` on".
pub fn resolve(limit: usize, offset: usize, total: usize) -> Range<usize> {
    if offset >= total {
        return total..total;
    }
    if limit == 0 {
        return offset..total;
    }
    let end = offset.saturating_add(limit).min(total);
    offset..end
}

/// Requested window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        resolve(self.limit, self.offset, total)
    }

    /// Keep the part of `items` inside the window
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let range = self.range(items.len());
        items
            .into_iter()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    }
}
