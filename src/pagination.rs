//! Page count and page-button window math

/// Maximum number of contiguous page buttons shown at once
pub const WINDOW_SIZE: u32 = 5;

/// Number of pages needed for `total_count` rows, never less than 1
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let page_size = page_size.max(1) as u64;
    let pages = (total_count + page_size - 1) / page_size;
    pages.clamp(1, u32::MAX as u64) as u32
}

/// Clamp a requested page into `[1, total_pages]`
pub fn clamp_page(page: i64, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1) as i64) as u32
}

/// One entry of the rendered page control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page buttons for the current position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: u32,
    pub total_pages: u32,
    /// Contiguous window around the current page
    pub pages: Vec<u32>,
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    pub show_last: bool,
}

impl PageWindow {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let total = total_pages.max(1);
        let current = current_page.clamp(1, total);

        // Shift the window left near the end so it stays WINDOW_SIZE wide
        let centered = current as i64 - 2;
        let latest_full_start = total as i64 - (WINDOW_SIZE as i64 - 1);
        let start = centered.min(latest_full_start).max(1) as u32;
        let end = total.min(start + WINDOW_SIZE - 1);

        Self {
            current_page: current,
            total_pages: total,
            pages: (start..=end).collect(),
            show_first: start > 1,
            leading_ellipsis: start > 2,
            trailing_ellipsis: end + 1 < total,
            show_last: end < total,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Flattened control: first, ellipsis, window, ellipsis, last
    pub fn items(&self) -> Vec<PageItem> {
        let mut items = Vec::with_capacity(self.pages.len() + 4);
        if self.show_first {
            items.push(PageItem::Page(1));
        }
        if self.leading_ellipsis {
            items.push(PageItem::Ellipsis);
        }
        items.extend(self.pages.iter().copied().map(PageItem::Page));
        if self.trailing_ellipsis {
            items.push(PageItem::Ellipsis);
        }
        if self.show_last {
            items.push(PageItem::Page(self.total_pages));
        }
        items
    }

    /// Compact text form, e.g. `1 … [6] 7 8 9 10`
    pub fn label(&self) -> String {
        self.items()
            .iter()
            .map(|item| match item {
                PageItem::Page(p) if *p == self.current_page => format!("[{}]", p),
                PageItem::Page(p) => p.to_string(),
                PageItem::Ellipsis => "…".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(-3, 5), 1);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(3, 0), 1);
    }

    #[test]
    fn test_window_at_first_page() {
        let window = PageWindow::new(1, 10);
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(!window.show_first);
        assert!(!window.leading_ellipsis);
        assert_eq!(
            window.items(),
            vec![
                PageItem::Page(1),
                PageItem::Page(2),
                PageItem::Page(3),
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Ellipsis,
                PageItem::Page(10),
            ]
        );
        assert!(!window.has_previous());
        assert!(window.has_next());
    }

    #[test]
    fn test_window_at_last_page() {
        let window = PageWindow::new(10, 10);
        assert_eq!(window.pages, vec![6, 7, 8, 9, 10]);
        assert_eq!(
            &window.items()[..2],
            &[PageItem::Page(1), PageItem::Ellipsis]
        );
        assert!(!window.show_last);
        assert!(window.has_previous());
        assert!(!window.has_next());
        assert_eq!(window.label(), "1 … 6 7 8 9 [10]");
    }

    #[test]
    fn test_window_in_middle() {
        let window = PageWindow::new(5, 10);
        assert_eq!(window.pages, vec![3, 4, 5, 6, 7]);
        assert_eq!(window.label(), "1 … 3 4 [5] 6 7 … 10");
    }

    #[test]
    fn test_no_ellipsis_next_to_adjacent_edge() {
        let window = PageWindow::new(4, 10);
        assert_eq!(window.pages, vec![2, 3, 4, 5, 6]);
        assert!(window.show_first);
        assert!(!window.leading_ellipsis);

        let window = PageWindow::new(6, 9);
        assert_eq!(window.pages, vec![4, 5, 6, 7, 8]);
        assert!(window.show_last);
        assert!(!window.trailing_ellipsis);
    }

    #[test]
    fn test_small_page_counts() {
        assert_eq!(PageWindow::new(1, 1).items(), vec![PageItem::Page(1)]);
        let window = PageWindow::new(2, 3);
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(!window.show_first && !window.show_last);
    }

    #[test]
    fn test_window_properties_hold_for_all_positions() {
        for total in 1..=40u32 {
            for current in 1..=total {
                let window = PageWindow::new(current, total);
                assert!(window.pages.len() <= WINDOW_SIZE as usize);
                assert!(window.pages.contains(&current));
                assert!(window.pages.windows(2).all(|w| w[1] == w[0] + 1));

                let numbers: Vec<u32> = window
                    .items()
                    .into_iter()
                    .filter_map(|item| match item {
                        PageItem::Page(p) => Some(p),
                        PageItem::Ellipsis => None,
                    })
                    .collect();
                assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{:?}", numbers);
                assert_eq!(numbers.first(), Some(&1));
                assert_eq!(numbers.last(), Some(&total));
            }
        }
    }
}
