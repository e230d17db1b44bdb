//! crates/signal_client_core/src/pagination.rs
//!
//! Page-window planning for paginated record browsing.

/// How many page numbers the controls show by default.
pub const DEFAULT_WINDOW_SIZE: u32 = 5;

/// Pages shown before the current one when there is room.
const LEADING_PAGES: u32 = 2;

/// Computes the contiguous page numbers to expose as clickable controls.
///
/// The window starts two pages before `current_page` and is shifted left near
/// the end so it stays `window_size` wide whenever enough pages exist.
/// Returns an empty vector when there are no pages.
pub fn compute_window(current_page: u32, total_pages: u32, window_size: u32) -> Vec<u32> {
    if window_size == 0 {
        return Vec::new();
    }

    let mut start = current_page.saturating_sub(LEADING_PAGES).max(1);
    let end = total_pages.min(start.saturating_add(window_size - 1));

    if end.saturating_sub(start) < window_size - 1 && total_pages > window_size - 1 {
        start = end.saturating_sub(window_size - 1).max(1);
    }

    (start..=end).collect()
}

/// The outcome of a page-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransition {
    Accepted(u32),
    Rejected,
}

impl PageTransition {
    pub fn accepted(self) -> Option<u32> {
        match self {
            PageTransition::Accepted(page) => Some(page),
            PageTransition::Rejected => None,
        }
    }
}

/// Accepts `requested_page` only if it lies within `1..=total_pages`.
pub fn validate_transition(requested_page: i64, total_pages: u32) -> PageTransition {
    if requested_page < 1 || requested_page > i64::from(total_pages) {
        return PageTransition::Rejected;
    }
    match u32::try_from(requested_page) {
        Ok(page) => PageTransition::Accepted(page),
        Err(_) => PageTransition::Rejected,
    }
}
