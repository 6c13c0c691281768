//! Infinite-scroll pagination state, independent of any UI framework.
//!
//! The owner drives it with events (`open`, `set_search`, `sentinel_visible`,
//! `retry`) and performs the returned [`PageRequest`]s itself, feeding results
//! back through [`PagedList::apply`]. Every context change bumps a generation
//! counter, so results that belong to an earlier panel session or search term
//! are dropped instead of being appended to the wrong list.

use storage::repository::Page;

/// A fetch the owner must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub search: Option<String>,
    generation: u64,
}

impl PageRequest {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    open: bool,
    page: u32,
    search: Option<String>,
    generation: u64,
    items: Vec<T>,
    has_more: bool,
    in_flight: Option<PageRequest>,
    error: Option<String>,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl<T> PagedList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: false,
            page: 1,
            search: None,
            generation: 0,
            items: Vec::new(),
            has_more: false,
            in_flight: None,
            error: None,
        }
    }

    /// Panel opened: forget everything and request page 1 without a search.
    pub fn open(&mut self) -> PageRequest {
        self.open = true;
        self.search = None;
        self.restart()
    }

    /// Panel closed: any response still on the way is ignored.
    pub fn close(&mut self) {
        self.open = false;
        self.generation += 1;
        self.in_flight = None;
    }

    /// Debounced search term changed.
    ///
    /// Returns a page-1 request for the new term, or `None` when closed or
    /// when the term did not actually change.
    pub fn set_search(&mut self, term: Option<&str>) -> Option<PageRequest> {
        let term = normalize(term);
        if !self.open || term == self.search {
            return None;
        }
        if let Some(stale) = &self.in_flight {
            log::debug!(
                "dropping page {} for search {:?}; search is now {term:?}",
                stale.page,
                stale.search
            );
        }
        self.search = term;
        Some(self.restart())
    }

    /// The sentinel after the last item scrolled into view.
    ///
    /// Advances one page only when more exist, nothing is loading and the last
    /// fetch did not fail.
    pub fn sentinel_visible(&mut self) -> Option<PageRequest> {
        if !self.open || !self.has_more || self.in_flight.is_some() || self.error.is_some() {
            return None;
        }
        self.page += 1;
        Some(self.issue())
    }

    /// Cached data went stale: start over from page 1, keeping the search.
    pub fn reload(&mut self) -> Option<PageRequest> {
        self.open.then(|| self.restart())
    }

    /// Re-request the page that failed.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if !self.open || self.error.is_none() || self.in_flight.is_some() {
            return None;
        }
        self.error = None;
        Some(self.issue())
    }

    /// Feed back the outcome of `request`.
    ///
    /// Returns `false` when the response is stale and was dropped.
    pub fn apply(&mut self, request: &PageRequest, result: Result<Page<T>, String>) -> bool {
        if self.in_flight.as_ref() != Some(request) {
            log::debug!(
                "ignoring stale page {} (generation {} vs {})",
                request.page,
                request.generation,
                self.generation
            );
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(page) => {
                if request.page == 1 {
                    self.items = page.items;
                } else {
                    self.items.extend(page.items);
                }
                self.has_more = page.has_more;
            }
            Err(message) => {
                log::warn!("page {} failed: {message}", request.page);
                self.error = Some(message);
            }
        }
        true
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Drop an item after a decision removed it server-side.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        self.items.retain(|item| !pred(item));
    }

    fn restart(&mut self) -> PageRequest {
        self.generation += 1;
        self.page = 1;
        self.items.clear();
        self.has_more = false;
        self.error = None;
        self.issue()
    }

    fn issue(&mut self) -> PageRequest {
        let request = PageRequest {
            page: self.page,
            search: self.search.clone(),
            generation: self.generation,
        };
        self.in_flight = Some(request.clone());
        request
    }
}
