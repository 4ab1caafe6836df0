//! Client-side pagination over an in-memory list.

/// Page numbers to render, with `None` standing for an elided gap.
///
/// Always includes the first `edge` and last `edge` pages plus `around`
/// pages on each side of `current`.
pub fn page_links(total_pages: usize, current: usize, edge: usize, around: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + edge).min(total_pages + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current.saturating_sub(around));
    let mid_end = (current + around + 1).min(total_pages + 1);
    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(edge) + 1);
    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));

    pages
}

/// 1-indexed page cursor. The page is clamped to `1..=page_count` whenever
/// the item total changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.clamp(1, self.page_count().max(1));
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Index range of the current page, empty when there are no items.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.total > 0 && self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.total > 0 && self.page < self.page_count()
    }

    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, ignoring numbers outside `1..=page_count`.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.page_count() {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// "Showing a-b of n entries", or "Showing 0 entries" when empty.
    pub fn summary(&self) -> String {
        if self.total == 0 {
            return "Showing 0 entries".to_string();
        }
        let range = self.range();
        format!(
            "Showing {}-{} of {} entries",
            range.start + 1,
            range.end,
            self.total
        )
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn links(&self) -> Vec<Option<usize>> {
        page_links(self.page_count(), self.page, 1, 2)
    }
}
