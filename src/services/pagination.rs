//! Pagination controller.
//!
//! Tracks current page, page size and the last fetched total of a list view.

use crate::error::AppError;
use crate::models::{TotalCount, DEFAULT_PAGE_SIZE};
use serde::Serialize;

/// Page sizes offered by the rows-per-page selector.
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [10, 20, 30, 40, 50];

/// Page, page size and total of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationController {
    current_page: u32,
    page_size: u32,
    total: TotalCount,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: TotalCount::default(),
        }
    }
}

impl PaginationController {
    /// Create a controller on page 1 with the given page size.
    pub fn new(page_size: u32) -> Result<Self, AppError> {
        let mut controller = Self::default();
        controller.set_page_size(page_size)?;
        Ok(controller)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> TotalCount {
        self.total
    }

    /// Row count shown next to the pager.
    pub fn total_items(&self) -> u64 {
        self.total.estimate()
    }

    /// Number of pages, never less than 1.
    ///
    /// With an unknown total this is the last fetched page, plus one more
    /// when that page came back full.
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size);
        let pages = match self.total {
            TotalCount::Exact(total) => total.div_ceil(size),
            TotalCount::Unknown {
                lower_bound,
                has_more,
            } => lower_bound.div_ceil(size).max(1) + u64::from(has_more),
        };
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Move to page `page`, clamped to `[1, total_pages]`.
    ///
    /// # Returns
    /// The page actually selected.
    pub fn go_to_page(&mut self, page: u32) -> u32 {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), AppError> {
        if page_size == 0 {
            return Err(AppError::invalid_input_field(
                "page size must be greater than 0",
                "pageSize",
            ));
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(())
    }

    /// Select `page` without clamping, for when the total is not known yet.
    /// The next [`Self::apply_total`] moves it back into range.
    pub fn seek(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Return to page 1 without touching the page size.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn first(&mut self) -> u32 {
        self.go_to_page(1)
    }

    pub fn previous(&mut self) -> u32 {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn next(&mut self) -> u32 {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn last(&mut self) -> u32 {
        self.go_to_page(self.total_pages())
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Record the total of a fetched page.
    ///
    /// # Returns
    /// `true` when the current page no longer exists and was moved down to
    /// the last page; the caller should fetch again.
    pub fn apply_total(&mut self, total: TotalCount) -> bool {
        self.total = total;
        let last = self.total_pages();
        if self.current_page > last {
            log::debug!("Page {} out of range, clamping to {}", self.current_page, last);
            self.current_page = last;
            true
        } else {
            false
        }
    }

    /// Selectable page sizes.
    pub fn page_size_options(&self) -> &'static [u32] {
        &PAGE_SIZE_OPTIONS
    }

    /// Page numbers to render, with `None` standing for an ellipsis.
    pub fn page_window(&self) -> Vec<Option<u32>> {
        page_window(self.total_pages(), self.current_page, 2, 1, 1, 2)
    }

    /// `Página 3 de 4`.
    pub fn page_label(&self) -> String {
        format!("Página {} de {}", self.current_page, self.total_pages())
    }
}

/// Edge pages, pages around `current_page`, and gaps between them.
fn page_window(
    total_pages: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let current_page = current_page.clamp(1, last_page);
    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page.saturating_add(1));
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current)
        .saturating_add(1)
        .min(last_page.saturating_add(1));

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(total: TotalCount) -> PaginationController {
        let mut controller = PaginationController::default();
        controller.apply_total(total);
        controller
    }

    #[test]
    fn test_total_pages_exact() {
        assert_eq!(with_total(TotalCount::Exact(0)).total_pages(), 1);
        assert_eq!(with_total(TotalCount::Exact(10)).total_pages(), 1);
        assert_eq!(with_total(TotalCount::Exact(37)).total_pages(), 4);
    }

    #[test]
    fn test_total_pages_unknown() {
        let full = with_total(TotalCount::Unknown {
            lower_bound: 10,
            has_more: true,
        });
        assert_eq!(full.total_pages(), 2);
        assert!(full.can_go_next());

        let short = with_total(TotalCount::Unknown {
            lower_bound: 4,
            has_more: false,
        });
        assert_eq!(short.total_pages(), short.current_page());
        assert!(!short.can_go_next());
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut controller = with_total(TotalCount::Exact(37));
        assert_eq!(controller.go_to_page(9), 4);
        assert_eq!(controller.go_to_page(0), 1);
        assert_eq!(controller.go_to_page(3), 3);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut controller = with_total(TotalCount::Exact(100));
        controller.go_to_page(5);
        controller.set_page_size(20).unwrap();
        assert_eq!(controller.current_page(), 1);
        assert_eq!(controller.page_size(), 20);
        assert!(controller.set_page_size(0).is_err());
    }

    #[test]
    fn test_navigation_helpers() {
        let mut controller = with_total(TotalCount::Exact(37));
        assert!(!controller.can_go_previous());
        assert_eq!(controller.previous(), 1);
        assert_eq!(controller.last(), 4);
        assert!(!controller.can_go_next());
        assert_eq!(controller.next(), 4);
        assert_eq!(controller.first(), 1);
    }

    #[test]
    fn test_apply_total_clamps_down() {
        let mut controller = with_total(TotalCount::Exact(50));
        controller.go_to_page(5);
        assert!(!controller.apply_total(TotalCount::Exact(41)));
        assert_eq!(controller.current_page(), 5);

        assert!(controller.apply_total(TotalCount::Exact(25)));
        assert_eq!(controller.current_page(), 3);
        assert!(!controller.apply_total(TotalCount::Exact(30)));
    }

    #[test]
    fn test_seek_then_clamp() {
        let mut controller = PaginationController::default();
        controller.seek(6);
        assert_eq!(controller.current_page(), 6);
        assert!(controller.apply_total(TotalCount::Exact(25)));
        assert_eq!(controller.current_page(), 3);
    }

    #[test]
    fn test_page_window() {
        let mut controller = with_total(TotalCount::Exact(200));
        controller.go_to_page(8);
        assert_eq!(
            controller.page_window(),
            vec![
                Some(1),
                Some(2),
                None,
                Some(7),
                Some(8),
                Some(9),
                None,
                Some(19),
                Some(20)
            ]
        );
        assert_eq!(controller.page_label(), "Página 8 de 20");
    }

    #[test]
    fn test_page_window_unclamped_seek() {
        let mut controller = PaginationController::default();
        controller.seek(u32::MAX);
        assert_eq!(controller.page_window(), vec![Some(1)]);

        let mut controller = with_total(TotalCount::Exact(u64::MAX));
        controller.last();
        assert_eq!(controller.current_page(), u32::MAX);
        let window = controller.page_window();
        assert_eq!(window.last(), Some(&Some(u32::MAX)));
        assert_eq!(window[..3], [Some(1), Some(2), None]);
    }
}
