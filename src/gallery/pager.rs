use std::ops::Range;

use crate::render::display::LoadMore;

/// Bags rendered per page.
pub const PAGE_SIZE: usize = 8;
/// Button label while more bags remain.
pub const LOAD_MORE_LABEL: &str = "Load more";
/// Button label once every bag is rendered.
pub const ALL_LOADED_LABEL: &str = "All bags loaded";

/// Cursor over a fetched bag list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    cursor: usize,
    page_size: usize,
}

impl Pager {
    /// Pager over `total` items; a zero page size is treated as 1.
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            total,
            cursor: 0,
            page_size: page_size.max(1),
        }
    }

    /// Take the next page and advance past it. Empty once exhausted.
    pub fn next_range(&mut self) -> Range<usize> {
        let start = self.cursor.min(self.total);
        let end = (start + self.page_size).min(self.total);
        self.cursor = end;
        start..end
    }

    /// Items handed out so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total items.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `true` when every item has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.total
    }

    /// Button state after the pages taken so far.
    pub fn load_more(&self) -> LoadMore {
        if self.is_exhausted() {
            LoadMore {
                enabled: false,
                label: ALL_LOADED_LABEL,
            }
        } else {
            LoadMore {
                enabled: true,
                label: LOAD_MORE_LABEL,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/pager.rs"]
mod tests;
