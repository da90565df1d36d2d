//! Page cache, cursor and completion state for one paginated query.

use page_fetch::{FetchError, PageFetcher};
use tracing::{debug, info, warn};

use crate::cache::PageCache;
use crate::error::SessionError;
use crate::query::QueryBuilder;
use crate::record::{parse_page, ResultRecord};

/// Lifecycle of a [`PaginatedSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// A request is outstanding.
    Fetching,
    Ready,
    /// The last fetched page was short; no further requests are made.
    Exhausted,
    /// The last request failed; the next `next()` retries the same offset.
    Failed,
}

/// What a navigation call has to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView<'a> {
    /// `start()` was never called.
    NotStarted,
    /// Started, but no page has been cached yet.
    NoPages,
    Page {
        index: usize,
        records: &'a [ResultRecord],
    },
}

impl<'a> PageView<'a> {
    #[must_use]
    pub fn records(&self) -> Option<&'a [ResultRecord]> {
        match self {
            Self::Page { records, .. } => Some(records),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Page { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Fetches pages in order through `F` and keeps every page it has seen.
///
/// Forward navigation moves onto an already cached page when one exists and
/// fetches otherwise; backward navigation never fetches. Callers issue one
/// call at a time, so at most one request is ever outstanding.
pub struct PaginatedSession<F> {
    endpoint: String,
    query: QueryBuilder,
    fetcher: F,
    cache: PageCache,
    cursor: Option<usize>,
    state: SessionState,
}

impl<F: PageFetcher> PaginatedSession<F> {
    pub fn new(endpoint: impl Into<String>, query: QueryBuilder, fetcher: F) -> Self {
        Self {
            endpoint: endpoint.into(),
            query,
            fetcher,
            cache: PageCache::new(),
            cursor: None,
            state: SessionState::NotStarted,
        }
    }

    /// Fetches the first page. Calling it again is a no-op.
    pub fn start(&mut self) -> Result<PageView<'_>, SessionError> {
        if !self.has_started() {
            self.fetch_next_page()?;
        }
        Ok(self.current_page())
    }

    /// Moves to the following page, fetching it when it is not cached yet.
    ///
    /// Once exhausted, calls on the last page return it again without any
    /// request.
    pub fn next(&mut self) -> Result<PageView<'_>, SessionError> {
        if !self.has_started() {
            return Ok(PageView::NotStarted);
        }

        match self.cursor.map(|cursor| cursor + 1) {
            Some(following) if self.cache.contains(following) => {
                self.cursor = Some(following);
            }
            _ => self.fetch_next_page()?,
        }
        Ok(self.current_page())
    }

    /// Moves one page back, from cache only.
    pub fn retreat(&mut self) -> PageView<'_> {
        if let Some(previous) = self.cursor.and_then(|cursor| cursor.checked_sub(1)) {
            self.set_current_page(previous);
        }
        self.current_page()
    }

    #[must_use]
    pub fn current_page(&self) -> PageView<'_> {
        match self.cursor.and_then(|index| Some((index, self.cache.get(index)?))) {
            Some((index, records)) => PageView::Page { index, records },
            None if self.state == SessionState::NotStarted => PageView::NotStarted,
            None => PageView::NoPages,
        }
    }

    /// Moves the cursor to `index` if that page is cached; otherwise does
    /// nothing. Returns whether the cursor moved.
    pub fn set_current_page(&mut self, index: usize) -> bool {
        if !self.cache.contains(index) {
            return false;
        }
        self.cursor = Some(index);
        true
    }

    /// Replaces the query and drops every cached page. The session goes back
    /// to `NotStarted`; the next `start()` fetches page 0 of the new query.
    pub fn requery(&mut self, query: QueryBuilder) {
        info!(pages = self.cache.len(), "discarding cached pages for new query");
        self.query = query;
        self.cache = PageCache::new();
        self.cursor = None;
        self.state = SessionState::NotStarted;
    }

    /// URL the next fetch would request.
    #[must_use]
    pub fn request_url(&self) -> String {
        format!("{}?{}", self.endpoint, self.query.serialize())
    }

    fn fetch_next_page(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Exhausted {
            return Ok(());
        }

        let url = self.request_url();
        debug!(
            fetcher = self.fetcher.fetcher_id(),
            offset = self.query.offset(),
            %url,
            "fetching page"
        );
        self.state = SessionState::Fetching;

        let records = match self.fetcher.fetch(&url).and_then(|body| {
            parse_page(&body).map_err(|error| FetchError::malformed(error.to_string()))
        }) {
            Ok(records) => records,
            Err(source) => {
                warn!(%url, error = %source, "page fetch failed");
                self.state = SessionState::Failed;
                return Err(SessionError::fetch_failed(url, source));
            }
        };

        let count = records.len();
        let index = self.cache.push(records);
        self.cursor = Some(index);

        if count < self.query.batch_size() {
            info!(page = index, records = count, "result set exhausted");
            self.state = SessionState::Exhausted;
        } else {
            self.query.advance_page();
            self.state = SessionState::Ready;
        }
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.state != SessionState::NotStarted
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == SessionState::Exhausted
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    #[must_use]
    pub fn query(&self) -> &QueryBuilder {
        &self.query
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
