//! Page navigation state for the todo list

use super::models::Page;

/// Width of the page-number window
pub const MAX_PAGES_SHOWN: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 0,
            page_size,
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn update_from<T>(&mut self, page: &Page<T>) {
        self.total_pages = page.total_pages;
        self.total_elements = page.total_elements;
    }

    /// Returns true if the page changed
    pub fn next(&mut self) -> bool {
        if self
            .current_page
            .checked_add(1)
            .is_some_and(|n| n < self.total_pages)
        {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, page: u32) {
        self.current_page = page;
    }

    /// Page numbers to offer, centred on the current page where possible
    pub fn visible_pages(&self) -> Vec<u32> {
        if self.total_pages == 0 {
            return Vec::new();
        }
        let last = self.total_pages - 1;
        let current = self.current_page.min(last);
        let mut start = current.saturating_sub(MAX_PAGES_SHOWN / 2);
        let end = last.min(start + MAX_PAGES_SHOWN - 1);
        if end - start + 1 < MAX_PAGES_SHOWN {
            start = end.saturating_sub(MAX_PAGES_SHOWN - 1);
        }
        (start..=end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(current: u32, total: u32) -> Pager {
        Pager {
            current_page: current,
            page_size: 10,
            total_pages: total,
            total_elements: total as u64 * 10,
        }
    }

    #[test]
    fn test_next_and_previous_bounds() {
        let mut p = pager(0, 2);
        assert!(!p.previous());
        assert!(p.next());
        assert_eq!(p.current_page, 1);
        assert!(!p.next());
        assert!(p.previous());
        assert_eq!(p.current_page, 0);
    }

    #[test]
    fn test_next_at_max_page_does_not_overflow() {
        let mut p = pager(0, 3);
        p.go_to(u32::MAX);
        assert!(!p.next());
        assert_eq!(p.current_page, u32::MAX);
        assert_eq!(p.visible_pages(), vec![0, 1, 2]);
    }

    #[test]
    fn test_visible_window() {
        assert_eq!(pager(0, 10).visible_pages(), vec![0, 1, 2, 3, 4]);
        assert_eq!(pager(5, 10).visible_pages(), vec![3, 4, 5, 6, 7]);
        assert_eq!(pager(9, 10).visible_pages(), vec![5, 6, 7, 8, 9]);
        assert_eq!(pager(1, 3).visible_pages(), vec![0, 1, 2]);
        assert!(pager(0, 0).visible_pages().is_empty());
        // past the end
        assert_eq!(pager(12, 3).visible_pages(), vec![0, 1, 2]);
    }

    #[test]
    fn test_update_from_page() {
        let mut p = Pager::new(10);
        let page: Page<u8> = Page {
            content: vec![],
            total_pages: 4,
            total_elements: 37,
            number: 0,
            size: 10,
        };
        p.update_from(&page);
        assert_eq!(p.total_pages, 4);
        assert_eq!(p.total_elements, 37);
    }
}
