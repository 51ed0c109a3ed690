//! Fixed-size pagination over an ordered slice.
//!
//! The pager imposes no ordering of its own; it slices whatever order the
//! caller supplies. Pages are recomputed on every request and never cached.

use log::warn;

use crate::config::ConfigDefaults;

/// One page of items plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page (at most `page_size`).
    pub items: &'a [T],
    /// Page actually served (1-based; 0 only when there are no items).
    pub page: usize,
    /// Total number of pages.
    pub pages_count: usize,
    /// Total number of items across all pages.
    pub total_count: usize,
    /// True when the requested page was out of range and got clamped.
    pub clamped: bool,
}

/// Slices a sequence into pages of `page_size` items.
#[derive(Debug)]
pub struct Pager<'a, T> {
    items: &'a [T],
    page_size: usize,
}

impl<'a, T> Pager<'a, T> {
    /// Page size is clamped to at least 1.
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
        }
    }

    /// Pager with the default page size.
    pub fn with_default_size(items: &'a [T]) -> Self {
        Self::new(items, ConfigDefaults::PAGE_SIZE)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    /// `ceil(total_count / page_size)`
    pub fn pages_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Select the items for a 1-based page number.
    ///
    /// Requests past the last page are clamped to the last page and flagged
    /// in [`Page::clamped`]; an empty input always yields page 0 with no items.
    pub fn paginated(&self, requested: usize) -> Page<'a, T> {
        let pages_count = self.pages_count();
        let mut clamped = false;
        let page = if pages_count == 0 {
            clamped = requested > 1;
            0
        } else if requested > pages_count {
            clamped = true;
            pages_count
        } else if requested == 0 {
            clamped = true;
            1
        } else {
            requested
        };
        if clamped {
            warn!(
                "requested page {} of {}, serving page {}",
                requested, pages_count, page
            );
        }

        let items = if page == 0 {
            &self.items[..0]
        } else {
            let start = ((page - 1) * self.page_size).min(self.items.len());
            let end = (page * self.page_size).min(self.items.len());
            &self.items[start..end]
        };

        Page {
            items,
            page,
            pages_count,
            total_count: self.items.len(),
            clamped,
        }
    }
}
