//! Pagination state for the list view.
//!
//! `PageState` is always valid: everything coming from outside (location
//! query parameters, the go-to-page input) is coerced into range by the
//! functions here. Transitions are pure; writing the result back to the
//! location is the caller's job (see `Location::with_page_state`).

/// Page sizes offered by the per-page selector
pub const PER_PAGE_OPTIONS: [u32; 4] = [12, 24, 48, 96];
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = PER_PAGE_OPTIONS[0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageState {
    pub page: u32,
    pub page_size: u32,
}

/// Cache/query key for one page of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PER_PAGE,
        }
    }
}

impl PageState {
    /// Build the initial state from raw query values.
    ///
    /// A missing, non-numeric or zero page becomes 1. A page size that is
    /// missing or not in `allowed` becomes the smallest allowed size.
    pub fn derive_initial(
        raw_page: Option<&str>,
        raw_page_size: Option<&str>,
        allowed: &[u32],
    ) -> Self {
        let page = raw_page
            .and_then(parse_leading_int)
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);

        let smallest = allowed.iter().copied().min().unwrap_or(DEFAULT_PER_PAGE);
        let page_size = raw_page_size
            .and_then(parse_leading_int)
            .filter(|size| allowed.contains(size))
            .unwrap_or(smallest);

        Self { page, page_size }
    }

    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn list_key(&self) -> ListKey {
        ListKey {
            limit: self.page_size,
            offset: self.offset(),
        }
    }

    /// Jump to `target`, clamped into `[1, total_pages]` (`[1, 1]` when the
    /// page count is unknown or zero).
    pub fn go_to(&self, target: u32, total_pages: u32) -> Self {
        let last = total_pages.max(1);
        Self {
            page: target.clamp(1, last),
            page_size: self.page_size,
        }
    }

    pub fn next(&self, total_pages: u32) -> Self {
        self.go_to(self.page.saturating_add(1), total_pages)
    }

    pub fn previous(&self, total_pages: u32) -> Self {
        self.go_to(self.page.saturating_sub(1), total_pages)
    }

    pub fn first(&self, total_pages: u32) -> Self {
        self.go_to(1, total_pages)
    }

    pub fn last(&self, total_pages: u32) -> Self {
        self.go_to(total_pages, total_pages)
    }

    /// Switch page size. Always returns to page 1, even when the current
    /// page would still exist under the new size.
    pub fn change_page_size(&self, page_size: u32) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total_pages: u32) -> bool {
        self.page < total_pages
    }
}

/// `ceil(total / page_size)`; zero items means zero pages.
pub fn total_pages(total: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Neighbouring entry of `options` relative to `current`, for stepping the
/// page size with +/-. Stays put at either end.
pub fn step_page_size(options: &[u32], current: u32, forward: bool) -> u32 {
    let Some(pos) = options.iter().position(|o| *o == current) else {
        return options.first().copied().unwrap_or(current);
    };
    let next = if forward {
        (pos + 1).min(options.len() - 1)
    } else {
        pos.saturating_sub(1)
    };
    options[next]
}

/// Integer parse that accepts trailing garbage after the digits
/// (`"3abc"` -> 3) and rejects anything without leading digits. Digit runs
/// too large for `u32` saturate rather than count as non-numeric.
fn parse_leading_int(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}
