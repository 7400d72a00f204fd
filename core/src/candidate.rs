//! Lookup table state for the host's candidate window.
//!
//! This module provides:
//! - `LookupPager`: the visible candidate window with intra-page cursor motion
//! - `LookupTable`: a read-only snapshot handed to the host for rendering
//!
//! Paging across windows belongs to the engine session. The pager only holds
//! the window the engine last reported and the highlighted entry within it.

/// Default number of candidates per window.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// The candidate window currently shown to the user.
#[derive(Debug, Clone)]
pub struct LookupPager {
    /// Candidates of the current window, at most `page_size` long
    items: Vec<String>,

    /// Maximum number of candidates per window
    page_size: usize,

    /// Highlighted position within `items` (0-based)
    cursor: usize,
}

/// Snapshot of the candidate window for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable<'a> {
    pub candidates: &'a [String],
    pub cursor: usize,
    pub page_size: usize,
}

impl LookupPager {
    /// Create an empty pager with the default page size.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create an empty pager with the given page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1), // Ensure at least 1
            cursor: 0,
        }
    }

    /// Set the page size, truncating the current window if needed.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.items.truncate(self.page_size);
        if self.cursor >= self.items.len() {
            self.cursor = 0;
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the window with the engine's latest candidates.
    ///
    /// Candidates beyond the page size are dropped and the cursor returns to
    /// the first entry. Returns the number of visible items; zero means the
    /// host should hide the lookup table.
    pub fn set_items<I, S>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.clear();
        self.items
            .extend(candidates.into_iter().take(self.page_size).map(Into::into));
        self.cursor = 0;
        self.items.len()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor position within the window (0-based).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The highlighted candidate, if any.
    pub fn selected(&self) -> Option<&str> {
        self.items.get(self.cursor).map(String::as_str)
    }

    /// Move cursor up (to previous candidate in the window).
    /// Returns true if the cursor moved.
    pub fn cursor_up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Move cursor down (to next candidate in the window).
    /// Returns true if the cursor moved.
    pub fn cursor_down(&mut self) -> bool {
        let len = self.items.len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Drop all candidates.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    pub fn table(&self) -> LookupTable<'_> {
        LookupTable {
            candidates: &self.items,
            cursor: self.cursor,
            page_size: self.page_size,
        }
    }
}

impl Default for LookupPager {
    fn default() -> Self {
        Self::new()
    }
}
